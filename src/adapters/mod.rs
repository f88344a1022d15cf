// Adapters layer: concrete implementations for external systems.

pub mod llm;

pub use llm::{OllamaClient, TemplateGenerator};
