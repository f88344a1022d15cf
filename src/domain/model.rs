use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// 購物車中的單一品項（每次請求傳入，不做持久化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<u32>,
}

impl CartItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            category: None,
            restaurant: None,
            qty: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// 價格寬鬆轉換：數字照用，數字字串解析，其餘（缺值、負數、非數字）一律視為 0
fn lenient_price<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_price(&value))
}

pub fn coerce_price(value: &serde_json::Value) -> f64 {
    let raw = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    if raw.is_finite() && raw >= 0.0 {
        raw
    } else {
        0.0
    }
}

/// 套餐中的一行品項
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboItem {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub restaurant: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboBundle {
    pub id: String,
    pub name: String,
    pub items: Vec<ComboItem>,
    pub original_price: f64,
    pub combo_price: f64,
    pub savings: f64,
    pub tag: String,
    pub rating: f64,
    #[serde(default)]
    pub restaurants: Vec<String>,
}

impl ComboBundle {
    /// originalPrice − comboPrice，不採用資料中的 savings 欄位
    pub fn savings_potential(&self) -> f64 {
        self.original_price - self.combo_price
    }

    /// 依品項出現順序取得不重複的餐廳名稱
    pub fn derive_restaurants(&self) -> Vec<String> {
        let mut restaurants: Vec<String> = Vec::new();
        for item in &self.items {
            if !restaurants.contains(&item.restaurant) {
                restaurants.push(item.restaurant.clone());
            }
        }
        restaurants
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub item_count: usize,
    pub total_price: f64,
    pub categories: Vec<String>,
}

/// `/analyze-cart` 的回應內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAnalysis {
    pub item_count: usize,
    pub total_price: f64,
    pub categories: Vec<String>,
    pub suggested_combo: Option<ComboBundle>,
    pub savings_potential: Option<f64>,
    pub trending_hint: Option<CartItem>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub user_id: String,
    pub last_cart: Option<CartSummary>,
    pub last_suggested_combo: Option<String>,
    #[serde(default)]
    pub preferences: HashMap<String, String>,
    pub updated_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            last_cart: None,
            last_suggested_combo: None,
            preferences: HashMap::new(),
            updated_at: Utc::now(),
        }
    }
}

/// 對 session 的部分更新；`None` 代表不變動
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub last_cart: Option<CartSummary>,
    pub last_suggested_combo: Option<Option<String>>,
    pub preferences: HashMap<String, String>,
}

impl SessionPatch {
    pub fn apply(self, context: &mut SessionContext) {
        if let Some(cart) = self.last_cart {
            context.last_cart = Some(cart);
        }
        if let Some(combo) = self.last_suggested_combo {
            context.last_suggested_combo = combo;
        }
        context.preferences.extend(self.preferences);
        context.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Diet {
    Veg,
    NonVeg,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cart_item_price_coercion() {
        let item: CartItem = serde_json::from_value(json!({"name": "A", "price": "129"})).unwrap();
        assert_eq!(item.price, 129.0);

        let item: CartItem = serde_json::from_value(json!({"name": "A"})).unwrap();
        assert_eq!(item.price, 0.0);

        let item: CartItem = serde_json::from_value(json!({"name": "A", "price": "free"})).unwrap();
        assert_eq!(item.price, 0.0);

        let item: CartItem = serde_json::from_value(json!({"name": "A", "price": -20})).unwrap();
        assert_eq!(item.price, 0.0);

        let item: CartItem = serde_json::from_value(json!({"name": "A", "price": null})).unwrap();
        assert_eq!(item.price, 0.0);
    }

    #[test]
    fn test_combo_bundle_uses_camel_case() {
        let bundle = ComboBundle {
            id: "combo_x".to_string(),
            name: "Test".to_string(),
            items: vec![],
            original_price: 300.0,
            combo_price: 250.0,
            savings: 50.0,
            tag: "Test".to_string(),
            rating: 4.0,
            restaurants: vec![],
        };

        let value = serde_json::to_value(&bundle).unwrap();
        assert_eq!(value["originalPrice"], json!(300.0));
        assert_eq!(value["comboPrice"], json!(250.0));
        assert_eq!(bundle.savings_potential(), 50.0);
    }

    #[test]
    fn test_session_patch_keeps_untouched_fields() {
        let mut context = SessionContext::new("u1");
        context.last_suggested_combo = Some("combo_001".to_string());

        let mut preferences = HashMap::new();
        preferences.insert("diet".to_string(), "veg".to_string());
        SessionPatch {
            preferences,
            ..Default::default()
        }
        .apply(&mut context);

        assert_eq!(context.last_suggested_combo.as_deref(), Some("combo_001"));
        assert_eq!(context.preferences.get("diet").map(String::as_str), Some("veg"));
    }
}
