pub mod analyzer;
pub mod catalog;
pub mod chat;
pub mod combo_matcher;
pub mod diet;
pub mod session;

pub use crate::domain::model::{CartAnalysis, CartItem, CartSummary, ComboBundle, ComboItem};
pub use crate::domain::ports::{ConfigProvider, SessionStore, TextGenerator};
pub use crate::utils::error::Result;
