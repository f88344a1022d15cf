use bluebliss::domain::ports::ConfigProvider;
use bluebliss::server::{self, AppState};
use bluebliss::utils::error::ErrorSeverity;
use bluebliss::utils::{logger, validation::Validate};
use bluebliss::ServerConfig;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();

    // 初始化日誌
    logger::init_server_logger(config.verbose, config.log_json);

    tracing::info!("Starting BlueBliss combo service");
    if config.verbose {
        tracing::debug!("Server config: {:?}", config);
    }

    // 載入並驗證配置
    let service_config = match config
        .load_service_config()
        .and_then(|c| c.validate().map(|_| c))
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let state = match AppState::from_config(&service_config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("❌ Failed to initialize state: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let sweeper = server::spawn_session_sweeper(
        state.sessions.clone(),
        service_config.session_sweep_interval(),
    );

    if let Err(e) = server::start_server(&config.bind_address(), state).await {
        tracing::error!(
            "❌ Server stopped with error: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    sweeper.abort();
    Ok(())
}
