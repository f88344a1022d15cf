use crate::domain::model::{CartItem, CartSummary, ComboBundle};
use std::collections::HashSet;

/// 至少需要幾個購物車品項與套餐重疊才會推薦
pub const MATCH_THRESHOLD: usize = 2;

pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// 依目錄順序找出第一個與購物車重疊至少兩個品項的套餐。
///
/// 不依省下金額或評分排序，第一個符合者即回傳。購物車中的重複品項各自計數，
/// 因此同名品項出現兩次也可以達到門檻。
pub fn match_combo<'a>(cart: &[CartItem], catalog: &'a [ComboBundle]) -> Option<&'a ComboBundle> {
    if cart.len() < MATCH_THRESHOLD {
        return None;
    }

    let cart_names: Vec<String> = cart.iter().map(|item| item.name.to_lowercase()).collect();

    catalog.iter().find(|bundle| {
        let bundle_names: HashSet<String> = bundle
            .items
            .iter()
            .map(|item| item.name.to_lowercase())
            .collect();

        let match_count = cart_names
            .iter()
            .filter(|name| bundle_names.contains(name.as_str()))
            .count();

        match_count >= MATCH_THRESHOLD
    })
}

pub fn compute_cart_summary(cart: &[CartItem]) -> CartSummary {
    let mut categories: Vec<String> = Vec::new();
    for item in cart {
        let category = item.category.as_deref().unwrap_or(UNKNOWN_CATEGORY);
        if !categories.iter().any(|c| c == category) {
            categories.push(category.to_string());
        }
    }

    CartSummary {
        item_count: cart.len(),
        total_price: cart.iter().map(|item| item.price).sum(),
        categories,
    }
}

/// 第一個名稱與熱門菜色相同（不分大小寫）的購物車品項
pub fn trending_overlap<'a, S: AsRef<str>>(
    cart: &'a [CartItem],
    trending: &[S],
) -> Option<&'a CartItem> {
    let trending: HashSet<String> = trending
        .iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect();

    cart.iter()
        .find(|item| trending.contains(&item.name.to_lowercase()))
}
