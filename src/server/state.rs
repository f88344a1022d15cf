use std::sync::Arc;

use crate::adapters::{OllamaClient, TemplateGenerator};
use crate::core::analyzer::CartAnalyzer;
use crate::core::catalog::ComboCatalog;
use crate::core::chat::ChatAssistant;
use crate::core::session::{InMemorySessionStore, SessionPolicy};
use crate::domain::ports::{ConfigProvider, SessionStore, TextGenerator};
use crate::utils::error::Result;

pub struct AppState {
    pub catalog: Arc<ComboCatalog>,
    pub analyzer: CartAnalyzer,
    pub assistant: ChatAssistant,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(
        catalog: ComboCatalog,
        trending: Vec<String>,
        llm: Option<Arc<dyn TextGenerator>>,
        sessions: Arc<dyn SessionStore>,
    ) -> Arc<Self> {
        let catalog = Arc::new(catalog);
        let chat_generator: Arc<dyn TextGenerator> = match &llm {
            Some(generator) => generator.clone(),
            None => Arc::new(TemplateGenerator),
        };

        Arc::new(Self {
            analyzer: CartAnalyzer::new(
                catalog.clone(),
                trending,
                llm,
                sessions.clone(),
            ),
            assistant: ChatAssistant::new(catalog.clone(), chat_generator, sessions.clone()),
            catalog,
            sessions,
        })
    }

    /// 依配置載入目錄並選擇文字生成器
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Arc<Self>> {
        let catalog = match config.catalog_path() {
            Some(path) => {
                tracing::info!("📁 Loading combo catalog from: {}", path);
                ComboCatalog::from_file(path)?
            }
            None => ComboCatalog::sample(),
        };
        tracing::info!("Loaded {} combos", catalog.len());

        let llm: Option<Arc<dyn TextGenerator>> = match config.llm_endpoint() {
            Some(endpoint) => {
                tracing::info!("🤖 Using LLM server at {} ({})", endpoint, config.llm_model());
                let client =
                    OllamaClient::new(endpoint, config.llm_model(), config.llm_timeout())?;
                Some(Arc::new(client) as Arc<dyn TextGenerator>)
            }
            None => {
                tracing::warn!("No LLM endpoint configured, replies use fixed templates");
                None
            }
        };

        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(SessionPolicy {
            max_age: config.session_max_age(),
        }));

        Ok(Self::new(
            catalog,
            config.trending_dishes().to_vec(),
            llm,
            sessions,
        ))
    }
}
