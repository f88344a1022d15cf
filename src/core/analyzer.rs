use crate::core::catalog::ComboCatalog;
use crate::core::combo_matcher::{compute_cart_summary, match_combo, trending_overlap};
use crate::domain::model::{CartAnalysis, CartItem, ComboBundle, SessionPatch};
use crate::domain::ports::{SessionStore, TextGenerator};
use crate::utils::error::{BlueBlissError, Result};
use serde_json::Value;
use std::sync::Arc;

/// 購物車分析流程：驗證、摘要、套餐比對、熱門提示、推銷文案、寫入 session
pub struct CartAnalyzer {
    catalog: Arc<ComboCatalog>,
    trending: Vec<String>,
    generator: Option<Arc<dyn TextGenerator>>,
    sessions: Arc<dyn SessionStore>,
}

impl CartAnalyzer {
    pub fn new(
        catalog: Arc<ComboCatalog>,
        trending: Vec<String>,
        generator: Option<Arc<dyn TextGenerator>>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            catalog,
            trending,
            generator,
            sessions,
        }
    }

    pub fn catalog(&self) -> &ComboCatalog {
        &self.catalog
    }

    pub fn trending(&self) -> &[String] {
        &self.trending
    }

    /// 分析 `{cartItems, userId?}` 請求內容
    pub async fn analyze(&self, body: &Value) -> Result<CartAnalysis> {
        let cart = parse_cart(body)?;
        let user_id = body.get("userId").and_then(Value::as_str);

        let summary = compute_cart_summary(&cart);
        let suggested = match_combo(&cart, self.catalog.combos()).cloned();
        let trending_hint = trending_overlap(&cart, &self.trending).cloned();

        tracing::debug!(
            "Analyzed cart: {} items, total {}, suggested {:?}",
            summary.item_count,
            summary.total_price,
            suggested.as_ref().map(|c| c.id.as_str())
        );

        let message = match &suggested {
            Some(combo) => Some(self.upsell_message(combo).await),
            None => None,
        };

        if let Some(user_id) = user_id {
            self.sessions
                .update(
                    user_id,
                    SessionPatch {
                        last_cart: Some(summary.clone()),
                        last_suggested_combo: Some(suggested.as_ref().map(|c| c.id.clone())),
                        ..Default::default()
                    },
                )
                .await;
        }

        Ok(CartAnalysis {
            item_count: summary.item_count,
            total_price: summary.total_price,
            categories: summary.categories,
            savings_potential: suggested.as_ref().map(ComboBundle::savings_potential),
            suggested_combo: suggested,
            trending_hint,
            message,
        })
    }

    /// 未設定 LLM 或生成失敗時使用固定文案
    async fn upsell_message(&self, combo: &ComboBundle) -> String {
        let Some(generator) = &self.generator else {
            return upsell_template(combo);
        };

        match generator.generate(&upsell_prompt(combo)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("⚠️ Upsell generation failed, using template: {}", e);
                upsell_template(combo)
            }
        }
    }
}

/// 取出並驗證 `cartItems`；非陣列或品項缺少 name 時回傳 ValidationError
pub fn parse_cart(body: &Value) -> Result<Vec<CartItem>> {
    let items = body
        .get("cartItems")
        .and_then(Value::as_array)
        .ok_or_else(|| BlueBlissError::validation("cartItems must be an array"))?;

    items
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            if !raw.is_object() {
                return Err(BlueBlissError::validation(format!(
                    "cartItems[{}] must be an object",
                    index
                )));
            }
            if !raw.get("name").is_some_and(Value::is_string) {
                return Err(BlueBlissError::validation(format!(
                    "cartItems[{}].name must be a string",
                    index
                )));
            }

            let item: CartItem = serde_json::from_value(raw.clone()).map_err(|e| {
                BlueBlissError::validation(format!("cartItems[{}] is malformed: {}", index, e))
            })?;

            if item.qty == Some(0) {
                return Err(BlueBlissError::validation(format!(
                    "cartItems[{}].qty must be at least 1",
                    index
                )));
            }

            Ok(item)
        })
        .collect()
}

pub fn upsell_prompt(combo: &ComboBundle) -> String {
    let items: Vec<&str> = combo.items.iter().map(|i| i.name.as_str()).collect();
    format!(
        "You are the friendly assistant of the BlueBliss food store. In one short sentence, \
         invite the customer to switch to the \"{}\" combo ({}) for ₹{} instead of ₹{}, saving ₹{}. \
         Do not use more than 30 words.",
        combo.name,
        items.join(", "),
        combo.combo_price,
        combo.original_price,
        combo.savings_potential()
    )
}

pub fn upsell_template(combo: &ComboBundle) -> String {
    format!(
        "Upgrade to the {} for ₹{} and save ₹{}!",
        combo.name,
        combo.combo_price,
        combo.savings_potential()
    )
}
