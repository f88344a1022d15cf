use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BlueBlissError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_LLM_MODEL: &str = "llama3";
pub const DEFAULT_LLM_TIMEOUT_SECONDS: u64 = 20;
pub const DEFAULT_SESSION_MAX_AGE_MINUTES: u64 = 30;
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 300;

pub fn default_trending_dishes() -> Vec<String> {
    ["CHEEZY 7 PIZZA", "PERI PERI PANEER WRAP", "BUTTER CHICKEN BOWL", "CHOCO LAVA CAKE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub catalog: Option<CatalogConfig>,
    pub trending: Option<TrendingConfig>,
    pub llm: Option<LlmConfig>,
    pub session: Option<SessionConfig>,
    /// 解析後補上的預設熱門清單，不參與序列化
    #[serde(skip)]
    default_trending: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingConfig {
    pub dishes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub max_age_minutes: Option<u64>,
    pub sweep_interval_seconds: Option<u64>,
}

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// 替換環境變數 (例如 ${LLM_ENDPOINT})；未設定的變數保持原樣
pub fn substitute_env_vars(content: &str) -> String {
    ENV_VAR_PATTERN
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
}

impl ServiceConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        let mut config: Self = toml::from_str(&processed_content).map_err(|e| {
            BlueBlissError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            }
        })?;
        config.default_trending = default_trending_dishes();
        Ok(config)
    }

    pub fn with_defaults() -> Self {
        Self {
            default_trending: default_trending_dishes(),
            ..Default::default()
        }
    }

    pub fn set_llm_endpoint(&mut self, endpoint: String) {
        match &mut self.llm {
            Some(llm) => llm.endpoint = Some(endpoint),
            None => {
                self.llm = Some(LlmConfig {
                    endpoint: Some(endpoint),
                    model: None,
                    timeout_seconds: None,
                })
            }
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(path) = self.catalog.as_ref().and_then(|c| c.path.as_deref()) {
            validate_non_empty_string("catalog.path", path)?;
        }

        if let Some(llm) = &self.llm {
            if let Some(endpoint) = &llm.endpoint {
                validate_url("llm.endpoint", endpoint)?;
            }
            if let Some(model) = &llm.model {
                validate_non_empty_string("llm.model", model)?;
            }
            if let Some(timeout) = llm.timeout_seconds {
                validate_positive_number("llm.timeout_seconds", timeout, 1)?;
            }
        }

        if let Some(session) = &self.session {
            if let Some(minutes) = session.max_age_minutes {
                validate_positive_number("session.max_age_minutes", minutes, 1)?;
            }
            if let Some(seconds) = session.sweep_interval_seconds {
                validate_positive_number("session.sweep_interval_seconds", seconds, 1)?;
            }
        }

        if let Some(trending) = &self.trending {
            for dish in &trending.dishes {
                validate_non_empty_string("trending.dishes", dish)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for ServiceConfig {
    fn catalog_path(&self) -> Option<&str> {
        self.catalog.as_ref().and_then(|c| c.path.as_deref())
    }

    fn trending_dishes(&self) -> &[String] {
        match &self.trending {
            Some(trending) => &trending.dishes,
            None => &self.default_trending,
        }
    }

    fn llm_endpoint(&self) -> Option<&str> {
        self.llm.as_ref().and_then(|l| l.endpoint.as_deref())
    }

    fn llm_model(&self) -> &str {
        self.llm
            .as_ref()
            .and_then(|l| l.model.as_deref())
            .unwrap_or(DEFAULT_LLM_MODEL)
    }

    fn llm_timeout(&self) -> Duration {
        Duration::from_secs(
            self.llm
                .as_ref()
                .and_then(|l| l.timeout_seconds)
                .unwrap_or(DEFAULT_LLM_TIMEOUT_SECONDS),
        )
    }

    fn session_max_age(&self) -> Duration {
        let minutes = self
            .session
            .as_ref()
            .and_then(|s| s.max_age_minutes)
            .unwrap_or(DEFAULT_SESSION_MAX_AGE_MINUTES);
        Duration::from_secs(minutes * 60)
    }

    fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(
            self.session
                .as_ref()
                .and_then(|s| s.sweep_interval_seconds)
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECONDS),
        )
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
