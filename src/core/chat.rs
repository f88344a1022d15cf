use crate::core::catalog::ComboCatalog;
use crate::domain::model::SessionContext;
use crate::domain::ports::{SessionStore, TextGenerator};
use crate::utils::error::{BlueBlissError, Result};
use std::sync::Arc;

const MAX_MESSAGE_CHARS: usize = 1000;

/// 聊天助理：把使用者訊息與其 session 內容組成提示詞後交給 LLM
pub struct ChatAssistant {
    catalog: Arc<ComboCatalog>,
    generator: Arc<dyn TextGenerator>,
    sessions: Arc<dyn SessionStore>,
}

impl ChatAssistant {
    pub fn new(
        catalog: Arc<ComboCatalog>,
        generator: Arc<dyn TextGenerator>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            catalog,
            generator,
            sessions,
        }
    }

    pub async fn reply(&self, user_id: &str, message: &str) -> Result<String> {
        if user_id.trim().is_empty() {
            return Err(BlueBlissError::validation("userId must not be empty"));
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(BlueBlissError::validation("message must not be empty"));
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(BlueBlissError::validation(format!(
                "message must be at most {} characters",
                MAX_MESSAGE_CHARS
            )));
        }

        let context = self.sessions.get(user_id).await;
        let prompt = self.build_prompt(context.as_ref(), message);
        self.generator.generate(&prompt).await
    }

    fn build_prompt(&self, context: Option<&SessionContext>, message: &str) -> String {
        let mut prompt = String::from(
            "You are the assistant of BlueBliss, a food store with three kitchens: \
             Blue Oven (pizza), Wrapstar (wraps) and Bliss Bowls (bowls, desserts, drinks). \
             Answer briefly and only about food, combos and orders.\n",
        );

        let top: Vec<String> = self
            .catalog
            .combos()
            .iter()
            .take(5)
            .map(|c| format!("{} (₹{})", c.name, c.combo_price))
            .collect();
        prompt.push_str(&format!("Popular combos: {}.\n", top.join(", ")));

        if let Some(context) = context {
            if let Some(cart) = &context.last_cart {
                prompt.push_str(&format!(
                    "The customer's cart has {} items worth ₹{} ({}).\n",
                    cart.item_count,
                    cart.total_price,
                    cart.categories.join(", ")
                ));
            }
            if let Some(combo) = context
                .last_suggested_combo
                .as_deref()
                .and_then(|id| self.catalog.find(id).ok())
            {
                prompt.push_str(&format!(
                    "We already suggested the {} combo to them.\n",
                    combo.name
                ));
            }
            for (key, value) in &context.preferences {
                prompt.push_str(&format!("Preference {}: {}.\n", key, value));
            }
        }

        prompt.push_str(&format!("Customer: {}\nAssistant:", message));
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::InMemorySessionStore;
    use crate::domain::model::{CartSummary, SessionPatch};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 記錄收到的提示詞
    #[derive(Default)]
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("Try the Triple Delight Feast!".to_string())
        }
    }

    #[tokio::test]
    async fn test_reply_includes_session_context() {
        let generator = Arc::new(RecordingGenerator::default());
        let sessions = Arc::new(InMemorySessionStore::default());
        sessions
            .update(
                "u1",
                SessionPatch {
                    last_cart: Some(CartSummary {
                        item_count: 2,
                        total_price: 438.0,
                        categories: vec!["Pizza".to_string()],
                    }),
                    last_suggested_combo: Some(Some("combo_001".to_string())),
                    ..Default::default()
                },
            )
            .await;

        let assistant =
            ChatAssistant::new(Arc::new(ComboCatalog::sample()), generator.clone(), sessions);
        let reply = assistant.reply("u1", "what should I add?").await.unwrap();

        assert_eq!(reply, "Try the Triple Delight Feast!");
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("2 items worth ₹438"));
        assert!(prompts[0].contains("Triple Delight Feast combo"));
        assert!(prompts[0].ends_with("Customer: what should I add?\nAssistant:"));
    }

    #[tokio::test]
    async fn test_reply_rejects_empty_message() {
        let assistant = ChatAssistant::new(
            Arc::new(ComboCatalog::sample()),
            Arc::new(RecordingGenerator::default()),
            Arc::new(InMemorySessionStore::default()),
        );

        assert!(matches!(
            assistant.reply("u1", "   ").await,
            Err(BlueBlissError::ValidationError { .. })
        ));
        assert!(assistant.reply("", "hi").await.is_err());
    }
}
