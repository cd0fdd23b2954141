#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::DEFAULT_UPSTREAM_BASE_URL;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_url, Validate,
};

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const LOG_FORMATS: &[&str] = &["compact", "json"];

/// Settings after merging the config file with command-line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upstream_base_url: String,
    pub user_agent: Option<String>,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            user_agent: None,
            log_level: None,
            json_logs: false,
        }
    }
}

impl AppConfig {
    pub fn from_provider<C: ConfigProvider + ?Sized>(provider: &C) -> Self {
        Self {
            host: provider.bind_host().to_string(),
            port: provider.bind_port(),
            upstream_base_url: provider.upstream_base_url().to_string(),
            user_agent: provider.user_agent().map(str::to_string),
            log_level: provider.log_level().map(str::to_string),
            json_logs: provider.json_logs(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ConfigProvider for AppConfig {
    fn bind_host(&self) -> &str {
        &self.host
    }

    fn bind_port(&self) -> u16 {
        self.port
    }

    fn upstream_base_url(&self) -> &str {
        &self.upstream_base_url
    }

    fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    fn json_logs(&self) -> bool {
        self.json_logs
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.host)?;
        validate_range("server.port", self.port, 1, u16::MAX)?;
        validate_url("upstream.base_url", &self.upstream_base_url)?;
        Ok(())
    }
}
