use crate::domain::model::{SessionContext, SessionPatch};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn catalog_path(&self) -> Option<&str>;
    fn trending_dishes(&self) -> &[String];
    fn llm_endpoint(&self) -> Option<&str>;
    fn llm_model(&self) -> &str;
    fn llm_timeout(&self) -> Duration;
    fn session_max_age(&self) -> Duration;
    fn session_sweep_interval(&self) -> Duration;
}

/// 自由文字生成（本地 LLM 推論伺服器）
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Option<SessionContext>;
    async fn update(&self, user_id: &str, patch: SessionPatch) -> SessionContext;
    /// 移除超過保存期限的 session，回傳移除數量
    async fn clear_old_sessions(&self) -> usize;
}
