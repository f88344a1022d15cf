use crate::config::toml_config::substitute_env_vars;
use crate::core::diet::{bundle_diet, Diet};
use crate::domain::model::{ComboBundle, ComboItem};
use crate::utils::error::{BlueBlissError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const PRICE_TOLERANCE: f64 = 0.01;

pub const PIZZA_BRAND: &str = "Blue Oven";
pub const WRAP_BRAND: &str = "Wrapstar";
pub const BOWL_BRAND: &str = "Bliss Bowls";

/// 啟動時載入、之後唯讀的套餐目錄
#[derive(Debug, Clone)]
pub struct ComboCatalog {
    combos: Vec<ComboBundle>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    combos: Vec<ComboBundle>,
}

impl ComboCatalog {
    /// 建立目錄並驗證；缺少 restaurants 的套餐會由品項推導
    pub fn new(mut combos: Vec<ComboBundle>) -> Result<Self> {
        for combo in &mut combos {
            if combo.restaurants.is_empty() {
                combo.restaurants = combo.derive_restaurants();
            }
        }

        let catalog = Self { combos };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        let file: CatalogFile = toml::from_str(&processed)?;
        Self::new(file.combos)
    }

    pub fn validate(&self) -> Result<()> {
        if self.combos.is_empty() {
            return Err(BlueBlissError::catalog("catalog contains no combos"));
        }

        let mut seen = HashSet::new();
        for combo in &self.combos {
            if !seen.insert(combo.id.as_str()) {
                return Err(BlueBlissError::catalog(format!("duplicate combo id '{}'", combo.id)));
            }

            if combo.items.len() < 2 {
                return Err(BlueBlissError::catalog(format!(
                    "combo '{}' must contain at least 2 items",
                    combo.id
                )));
            }

            if combo.combo_price >= combo.original_price {
                return Err(BlueBlissError::catalog(format!(
                    "combo '{}' comboPrice {} is not below originalPrice {}",
                    combo.id, combo.combo_price, combo.original_price
                )));
            }

            let expected = combo.original_price - combo.combo_price;
            if (combo.savings - expected).abs() > PRICE_TOLERANCE {
                return Err(BlueBlissError::catalog(format!(
                    "combo '{}' savings {} does not equal originalPrice - comboPrice ({})",
                    combo.id, combo.savings, expected
                )));
            }
        }

        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<&ComboBundle> {
        self.combos
            .iter()
            .find(|combo| combo.id == id)
            .ok_or_else(|| BlueBlissError::not_found("Combo", id))
    }

    pub fn combos(&self) -> &[ComboBundle] {
        &self.combos
    }

    pub fn filter_by_diet(&self, diet: Diet) -> Vec<&ComboBundle> {
        self.combos
            .iter()
            .filter(|combo| bundle_diet(combo) == diet)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    /// 內建的三品牌套餐目錄
    pub fn sample() -> Self {
        let combos = vec![
            bundle("combo_001", "Triple Delight Feast", 806.0, 649.0, 157.0, "Bestseller", 4.6, vec![
                item("CHEEZY 7 PIZZA", "Pizza", 229.0, PIZZA_BRAND),
                item("PERI PERI PANEER", "Starters", 209.0, PIZZA_BRAND),
                item("PERI PERI PANEER WRAP", "Wraps", 209.0, WRAP_BRAND),
                item("CHOCO LAVA CAKE", "Desserts", 159.0, BOWL_BRAND),
            ]),
            bundle("combo_002", "Chicken Lovers Combo", 538.0, 449.0, 89.0, "Non-Veg Favourite", 4.4, vec![
                item("CHICKEN TIKKA PIZZA", "Pizza", 259.0, PIZZA_BRAND),
                item("CHICKEN SEEKH WRAP", "Wraps", 219.0, WRAP_BRAND),
                item("COKE", "Beverages", 60.0, BOWL_BRAND),
            ]),
            bundle("combo_003", "Veggie Bowl Duo", 457.0, 379.0, 78.0, "Healthy Pick", 4.3, vec![
                item("PANEER TIKKA BOWL", "Bowls", 199.0, BOWL_BRAND),
                item("RAJMA RICE BOWL", "Bowls", 179.0, BOWL_BRAND),
                item("MASALA LEMONADE", "Beverages", 79.0, BOWL_BRAND),
            ]),
            bundle("combo_004", "Pizza Party Pack", 627.0, 499.0, 128.0, "Family Favourite", 4.5, vec![
                item("MARGHERITA PIZZA", "Pizza", 199.0, PIZZA_BRAND),
                item("FARMHOUSE PIZZA", "Pizza", 249.0, PIZZA_BRAND),
                item("GARLIC BREADSTICKS", "Sides", 119.0, PIZZA_BRAND),
                item("COKE", "Beverages", 60.0, BOWL_BRAND),
            ]),
            bundle("combo_005", "Wrap & Roll", 457.0, 369.0, 88.0, "Value Deal", 4.2, vec![
                item("PERI PERI PANEER WRAP", "Wraps", 209.0, WRAP_BRAND),
                item("ALOO TIKKI WRAP", "Wraps", 149.0, WRAP_BRAND),
                item("FRENCH FRIES", "Sides", 99.0, WRAP_BRAND),
            ]),
            bundle("combo_006", "Egg-cellent Breakfast", 447.0, 359.0, 88.0, "Morning Special", 4.1, vec![
                item("EGG BHURJI WRAP", "Wraps", 159.0, WRAP_BRAND),
                item("MASALA OMELETTE BOWL", "Bowls", 169.0, BOWL_BRAND),
                item("COLD COFFEE", "Beverages", 119.0, BOWL_BRAND),
            ]),
            bundle("combo_007", "Sweet Endings", 457.0, 379.0, 78.0, "Dessert Combo", 4.7, vec![
                item("CHOCO LAVA CAKE", "Desserts", 159.0, BOWL_BRAND),
                item("BROWNIE SUNDAE", "Desserts", 179.0, BOWL_BRAND),
                item("COLD COFFEE", "Beverages", 119.0, BOWL_BRAND),
            ]),
            bundle("combo_008", "Butter Chicken Bonanza", 627.0, 519.0, 108.0, "Chef's Special", 4.6, vec![
                item("BUTTER CHICKEN BOWL", "Bowls", 249.0, BOWL_BRAND),
                item("CHICKEN TIKKA PIZZA", "Pizza", 259.0, PIZZA_BRAND),
                item("GARLIC BREADSTICKS", "Sides", 119.0, PIZZA_BRAND),
            ]),
            bundle("combo_009", "Fish Fiesta", 607.0, 499.0, 108.0, "Coastal", 4.0, vec![
                item("FISH TIKKA WRAP", "Wraps", 239.0, WRAP_BRAND),
                item("PRAWN PERI PERI BOWL", "Bowls", 289.0, BOWL_BRAND),
                item("MASALA LEMONADE", "Beverages", 79.0, BOWL_BRAND),
            ]),
            bundle("combo_010", "Student Saver", 408.0, 329.0, 79.0, "Budget", 4.2, vec![
                item("ALOO TIKKI WRAP", "Wraps", 149.0, WRAP_BRAND),
                item("MARGHERITA PIZZA", "Pizza", 199.0, PIZZA_BRAND),
                item("COKE", "Beverages", 60.0, BOWL_BRAND),
            ]),
            bundle("combo_011", "Keema Kingdom", 548.0, 449.0, 99.0, "Spicy", 4.4, vec![
                item("KEEMA PAV BOWL", "Bowls", 229.0, BOWL_BRAND),
                item("MUTTON SEEKH WRAP", "Wraps", 259.0, WRAP_BRAND),
                item("COKE", "Beverages", 60.0, BOWL_BRAND),
            ]),
            bundle("combo_012", "Pepperoni Punch", 597.0, 489.0, 108.0, "New", 4.3, vec![
                item("PEPPERONI PIZZA", "Pizza", 279.0, PIZZA_BRAND),
                item("CHICKEN SEEKH WRAP", "Wraps", 219.0, WRAP_BRAND),
                item("FRENCH FRIES", "Sides", 99.0, WRAP_BRAND),
            ]),
            bundle("combo_013", "Green Goodness", 527.0, 429.0, 98.0, "Veg Delight", 4.4, vec![
                item("FARMHOUSE PIZZA", "Pizza", 249.0, PIZZA_BRAND),
                item("PANEER TIKKA BOWL", "Bowls", 199.0, BOWL_BRAND),
                item("MASALA LEMONADE", "Beverages", 79.0, BOWL_BRAND),
            ]),
            bundle("combo_014", "Double Cheese Duo", 428.0, 349.0, 79.0, "Cheese Lovers", 4.5, vec![
                item("CHEEZY 7 PIZZA", "Pizza", 229.0, PIZZA_BRAND),
                item("MARGHERITA PIZZA", "Pizza", 199.0, PIZZA_BRAND),
            ]),
            bundle("combo_015", "Midnight Munchies", 516.0, 419.0, 97.0, "Late Night", 4.3, vec![
                item("FRENCH FRIES", "Sides", 99.0, WRAP_BRAND),
                item("GARLIC BREADSTICKS", "Sides", 119.0, PIZZA_BRAND),
                item("BROWNIE SUNDAE", "Desserts", 179.0, BOWL_BRAND),
                item("COLD COFFEE", "Beverages", 119.0, BOWL_BRAND),
            ]),
        ];

        let combos = combos
            .into_iter()
            .map(|mut combo| {
                combo.restaurants = combo.derive_restaurants();
                combo
            })
            .collect();

        Self { combos }
    }
}

impl Default for ComboCatalog {
    fn default() -> Self {
        Self::sample()
    }
}

fn item(name: &str, category: &str, price: f64, restaurant: &str) -> ComboItem {
    ComboItem {
        name: name.to_string(),
        category: category.to_string(),
        price,
        restaurant: restaurant.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn bundle(
    id: &str,
    name: &str,
    original_price: f64,
    combo_price: f64,
    savings: f64,
    tag: &str,
    rating: f64,
    items: Vec<ComboItem>,
) -> ComboBundle {
    ComboBundle {
        id: id.to_string(),
        name: name.to_string(),
        items,
        original_price,
        combo_price,
        savings,
        tag: tag.to_string(),
        rating,
        restaurants: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TWO_COMBOS: &str = r#"
[[combos]]
id = "combo_a"
name = "Lunch Pair"
originalPrice = 300
comboPrice = 250
savings = 50
tag = "Lunch"
rating = 4.2

[[combos.items]]
name = "MARGHERITA PIZZA"
category = "Pizza"
price = 199
restaurant = "Blue Oven"

[[combos.items]]
name = "COKE"
category = "Beverages"
price = 101
restaurant = "Bliss Bowls"

[[combos]]
id = "combo_b"
name = "Wrap Pair"
originalPrice = 358
comboPrice = 299
savings = 59
tag = "Value"
rating = 4.0
restaurants = ["Wrapstar"]

[[combos.items]]
name = "ALOO TIKKI WRAP"
category = "Wraps"
price = 149
restaurant = "Wrapstar"

[[combos.items]]
name = "PERI PERI PANEER WRAP"
category = "Wraps"
price = 209
restaurant = "Wrapstar"
"#;

    #[test]
    fn test_sample_catalog_is_valid() {
        let catalog = ComboCatalog::sample();
        assert_eq!(catalog.len(), 15);
        assert!(catalog.validate().is_ok());

        for combo in catalog.combos() {
            let item_total: f64 = combo.items.iter().map(|i| i.price).sum();
            assert_eq!(item_total, combo.original_price, "{}", combo.id);
            assert!(!combo.restaurants.is_empty());
        }
    }

    #[test]
    fn test_sample_restaurants_derived_from_items() {
        let catalog = ComboCatalog::sample();
        let feast = catalog.find("combo_001").unwrap();
        assert_eq!(feast.restaurants, vec![PIZZA_BRAND, WRAP_BRAND, BOWL_BRAND]);
    }

    #[test]
    fn test_find_unknown_id_is_not_found() {
        let catalog = ComboCatalog::sample();
        assert!(matches!(
            catalog.find("combo_999"),
            Err(BlueBlissError::NotFoundError { .. })
        ));
    }

    #[test]
    fn test_parse_catalog_from_toml() {
        let catalog = ComboCatalog::from_toml_str(TWO_COMBOS).unwrap();

        assert_eq!(catalog.len(), 2);
        let lunch = catalog.find("combo_a").unwrap();
        assert_eq!(lunch.original_price, 300.0);
        assert_eq!(lunch.restaurants, vec!["Blue Oven", "Bliss Bowls"]);
        assert_eq!(catalog.combos()[1].id, "combo_b");
    }

    #[test]
    fn test_catalog_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(TWO_COMBOS.as_bytes()).unwrap();

        let catalog = ComboCatalog::from_file(temp_file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_inconsistent_savings_rejected() {
        let content = TWO_COMBOS.replace("savings = 50", "savings = 40");
        let err = ComboCatalog::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, BlueBlissError::CatalogError { .. }));
        assert!(err.to_string().contains("combo_a"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let content = TWO_COMBOS.replace("combo_b", "combo_a");
        assert!(matches!(
            ComboCatalog::from_toml_str(&content),
            Err(BlueBlissError::CatalogError { .. })
        ));
    }

    #[test]
    fn test_combo_price_must_be_discounted() {
        let mut combos = ComboCatalog::sample().combos().to_vec();
        combos[0].combo_price = combos[0].original_price;
        combos[0].savings = 0.0;
        assert!(ComboCatalog::new(combos).is_err());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(ComboCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn test_filter_by_diet() {
        let catalog = ComboCatalog::sample();
        let non_veg: Vec<&str> = catalog
            .filter_by_diet(Diet::NonVeg)
            .iter()
            .map(|c| c.id.as_str())
            .collect();

        assert_eq!(
            non_veg,
            vec!["combo_002", "combo_006", "combo_008", "combo_009", "combo_011", "combo_012"]
        );
        assert_eq!(catalog.filter_by_diet(Diet::Veg).len(), 9);
    }
}
