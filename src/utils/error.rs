use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlueBlissError {
    #[error("Upstream request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid combo catalog: {message}")]
    CatalogError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("{entity} '{id}' not found")]
    NotFoundError { entity: String, id: String },

    #[error("Text generation service error: {message}")]
    UpstreamError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Upstream,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BlueBlissError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFoundError {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        Self::CatalogError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::NotFoundError { .. } => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::CatalogError { .. }
            | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::ApiError(_) | Self::UpstreamError { .. } => ErrorCategory::Upstream,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. } | Self::NotFoundError { .. } => ErrorSeverity::Low,
            Self::ApiError(_) | Self::UpstreamError { .. } => ErrorSeverity::Medium,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::CatalogError { .. }
            | Self::TomlError(_)
            | Self::SerializationError(_) => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => {
                "Send a JSON body whose cartItems field is an array of {name, price} objects"
            }
            Self::NotFoundError { .. } => "List available combos with GET /api/combos",
            Self::ApiError(_) | Self::UpstreamError { .. } => {
                "Check that the LLM server is running and reachable from this host"
            }
            Self::CatalogError { .. } => {
                "Fix the combo catalog file: ids must be unique and savings must equal originalPrice - comboPrice"
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::TomlError(_) => "Review the service configuration file and environment variables",
            Self::IoError(_) => "Check file paths and permissions",
            Self::SerializationError(_) => "Make sure the input is valid JSON",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Request rejected: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Upstream => format!("External service unavailable: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BlueBlissError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_low_severity() {
        let err = BlueBlissError::validation("cartItems must be an array");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().starts_with("Request rejected"));

        let err = BlueBlissError::not_found("Combo", "combo_999");
        assert_eq!(err.to_string(), "Combo 'combo_999' not found");
    }

    #[test]
    fn test_catalog_error_is_configuration() {
        let err = BlueBlissError::catalog("duplicate id combo_001");
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_invalid_config_value_is_configuration() {
        let err = crate::utils::validation::validate_non_empty_string("llm.model", "  ").unwrap_err();
        assert!(matches!(err, BlueBlissError::InvalidConfigValueError { .. }));
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().starts_with("Configuration problem"));
    }
}
