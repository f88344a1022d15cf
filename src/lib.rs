pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::ServerConfig;
pub use config::ServiceConfig;

pub use crate::core::{analyzer::CartAnalyzer, catalog::ComboCatalog};
pub use crate::core::combo_matcher::{compute_cart_summary, match_combo, trending_overlap};
pub use domain::model::{CartAnalysis, CartItem, CartSummary, ComboBundle, ComboItem};
pub use server::AppState;
pub use utils::error::{BlueBlissError, Result};
