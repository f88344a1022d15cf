use crate::domain::model::ComboBundle;
use crate::utils::error::{BlueBlissError, Result};
use regex::Regex;
use std::sync::LazyLock;

pub use crate::domain::model::Diet;

static NON_VEG_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"chicken|mutton|lamb|egg|omelette|fish|prawn|shrimp|keema|meat|pepperoni|bacon|ham|tuna|sausage",
    )
    .expect("non-veg keyword pattern is valid")
});

/// 含 "egg" 卻是素食的字，比對前先移除
static VEG_EXCEPTIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"veggies?").expect("veg exception pattern is valid"));

/// 小寫菜名只要包含任一關鍵字即為葷食（MEATBALL、EGGS、CHICKEN65 皆算）
pub fn classify(name: &str) -> Diet {
    let lowered = name.to_lowercase();
    let scrubbed = VEG_EXCEPTIONS.replace_all(&lowered, " ");
    if NON_VEG_KEYWORDS.is_match(&scrubbed) {
        Diet::NonVeg
    } else {
        Diet::Veg
    }
}

/// 所有品項都是素食時套餐才算素食
pub fn bundle_diet(bundle: &ComboBundle) -> Diet {
    if bundle.items.iter().all(|item| classify(&item.name) == Diet::Veg) {
        Diet::Veg
    } else {
        Diet::NonVeg
    }
}

/// 解析查詢參數中的飲食類別
pub fn parse_diet(value: &str) -> Result<Diet> {
    match value.trim().to_lowercase().as_str() {
        "veg" | "vegetarian" => Ok(Diet::Veg),
        "non-veg" | "nonveg" | "non_veg" => Ok(Diet::NonVeg),
        other => Err(BlueBlissError::validation(format!(
            "unknown diet '{}', expected 'veg' or 'non-veg'",
            other
        ))),
    }
}
