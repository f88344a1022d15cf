use crate::domain::model::{SessionContext, SessionPatch};
use crate::domain::ports::SessionStore;
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

/// Session 保存策略
#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    pub max_age: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(30 * 60),
        }
    }
}

/// 以使用者 id 為鍵的記憶體內 session store，由呼叫端注入而非全域單例
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionContext>>,
    policy: SessionPolicy,
}

impl InMemorySessionStore {
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            policy,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(SessionPolicy::default())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: &str) -> Option<SessionContext> {
        self.sessions.read().await.get(user_id).cloned()
    }

    async fn update(&self, user_id: &str, patch: SessionPatch) -> SessionContext {
        let mut sessions = self.sessions.write().await;
        let context = sessions
            .entry(user_id.to_string())
            .or_insert_with(|| SessionContext::new(user_id));
        patch.apply(context);
        context.clone()
    }

    async fn clear_old_sessions(&self) -> usize {
        let max_age = TimeDelta::from_std(self.policy.max_age).unwrap_or(TimeDelta::MAX);
        let now = Utc::now();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, context| now - context.updated_at < max_age);
        let removed = before - sessions.len();

        if removed > 0 {
            tracing::debug!("Evicted {} stale sessions, {} remaining", removed, sessions.len());
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CartSummary;

    fn summary(count: usize) -> CartSummary {
        CartSummary {
            item_count: count,
            total_price: 100.0,
            categories: vec!["Pizza".to_string()],
        }
    }

    #[tokio::test]
    async fn test_update_creates_and_merges() {
        let store = InMemorySessionStore::default();
        assert!(store.get("u1").await.is_none());

        store
            .update(
                "u1",
                SessionPatch {
                    last_cart: Some(summary(2)),
                    last_suggested_combo: Some(Some("combo_001".to_string())),
                    ..Default::default()
                },
            )
            .await;

        let context = store
            .update(
                "u1",
                SessionPatch {
                    last_cart: Some(summary(3)),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(context.user_id, "u1");
        assert_eq!(context.last_cart.unwrap().item_count, 3);
        assert_eq!(context.last_suggested_combo.as_deref(), Some("combo_001"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_clear_old_sessions_respects_policy() {
        let fresh = InMemorySessionStore::new(SessionPolicy {
            max_age: Duration::from_secs(3600),
        });
        fresh.update("u1", SessionPatch::default()).await;
        assert_eq!(fresh.clear_old_sessions().await, 0);
        assert_eq!(fresh.len().await, 1);

        let expiring = InMemorySessionStore::new(SessionPolicy {
            max_age: Duration::ZERO,
        });
        expiring.update("u1", SessionPatch::default()).await;
        expiring.update("u2", SessionPatch::default()).await;
        assert_eq!(expiring.clear_old_sessions().await, 2);
        assert!(expiring.is_empty().await);
    }
}
