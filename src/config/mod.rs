pub mod toml_config;

pub use toml_config::ServiceConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "bluebliss")]
#[command(about = "BlueBliss combo suggestion service")]
pub struct ServerConfig {
    #[arg(long, env = "BLUEBLISS_PORT", default_value = "5000")]
    pub port: u16,

    #[arg(long, env = "BLUEBLISS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Path to the service TOML configuration
    #[arg(short, long, env = "BLUEBLISS_CONFIG")]
    pub config: Option<String>,

    /// Overrides [llm].endpoint from the config file
    #[arg(long, env = "BLUEBLISS_LLM_ENDPOINT")]
    pub llm_endpoint: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 讀取 TOML 配置並套用命令列覆蓋
    pub fn load_service_config(&self) -> crate::Result<ServiceConfig> {
        let mut service = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::with_defaults(),
        };

        if let Some(endpoint) = &self.llm_endpoint {
            service.set_llm_endpoint(endpoint.clone());
        }

        Ok(service)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;

    #[test]
    fn test_parse_server_args() {
        let config = ServerConfig::parse_from([
            "bluebliss",
            "--port",
            "8080",
            "--llm-endpoint",
            "http://localhost:11434",
            "-v",
        ]);

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.verbose);

        let service = config.load_service_config().unwrap();
        assert_eq!(service.llm_endpoint(), Some("http://localhost:11434"));
    }
}
