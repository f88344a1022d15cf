use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal, task::JoinHandle};
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod error;
pub mod routes;
pub mod state;

use crate::domain::ports::SessionStore;
use crate::utils::error::Result;
use routes::{
    analyze_cart_handler, chat_handler, get_combo_handler, health_handler, list_combos_handler,
    trending_handler,
};
pub use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/combos", get(list_combos_handler))
        .route("/api/combos/trending", get(trending_handler))
        .route("/api/combos/analyze-cart", post(analyze_cart_handler))
        .route("/api/combos/{id}", get(get_combo_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .with_state(state)
}

/// 定期清除過期 session
pub fn spawn_session_sweeper(sessions: Arc<dyn SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let removed = sessions.clear_old_sessions().await;
            if removed > 0 {
                info!("🧹 Cleared {} stale sessions", removed);
            }
        }
    })
}

pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let app = build_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

pub async fn start_server(address: &str, state: Arc<AppState>) -> Result<()> {
    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("🚀 Server running on {}", listener.local_addr()?);

    serve(listener, state).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::{InMemorySessionStore, SessionPolicy};
    use crate::domain::model::SessionPatch;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_clears_stale_sessions_each_interval() {
        let store = Arc::new(InMemorySessionStore::new(SessionPolicy {
            max_age: Duration::ZERO,
        }));
        store.update("u1", SessionPatch::default()).await;

        let sweeper = spawn_session_sweeper(store.clone(), Duration::from_secs(60));

        // 第一次 tick 立即觸發
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(store.is_empty().await);

        store.update("u2", SessionPatch::default()).await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(store.len().await, 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(store.is_empty().await);

        sweeper.abort();
    }
}
