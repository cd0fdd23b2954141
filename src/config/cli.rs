use crate::config::{AppConfig, TomlConfig, DEFAULT_HOST, DEFAULT_PORT, LOG_FORMATS};
use crate::core::ConfigProvider;
use crate::domain::model::DEFAULT_UPSTREAM_BASE_URL;
use crate::utils::error::Result;
use crate::utils::validation::{validate_one_of, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "covid-tracker-api")]
#[command(about = "Proxy API in front of the COVID Tracking Project data service")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Bind host (default 127.0.0.1)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (default 5000)
    #[arg(long)]
    pub port: Option<u16>,

    /// Upstream base URL (default https://api.covidtracking.com/v2)
    #[arg(long)]
    pub upstream_base_url: Option<String>,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 先載入設定檔 (若有)，再套用命令列覆蓋，最後驗證
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut resolved = match &self.config {
            Some(path) => {
                let file_config = TomlConfig::from_file(path)?;
                // 其餘欄位可被命令列覆蓋，合併後再一起驗證
                validate_one_of("logging.format", file_config.log_format(), LOG_FORMATS)?;
                AppConfig::from_provider(&file_config)
            }
            None => AppConfig::from_provider(self),
        };

        if let Some(host) = &self.host {
            resolved.host = host.clone();
        }
        if let Some(port) = self.port {
            resolved.port = port;
        }
        if let Some(url) = &self.upstream_base_url {
            resolved.upstream_base_url = url.clone();
        }
        if self.json_logs {
            resolved.json_logs = true;
        }

        resolved.validate()?;
        Ok(resolved)
    }
}

impl ConfigProvider for CliConfig {
    fn bind_host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    fn bind_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    fn upstream_base_url(&self) -> &str {
        self.upstream_base_url
            .as_deref()
            .unwrap_or(DEFAULT_UPSTREAM_BASE_URL)
    }

    fn user_agent(&self) -> Option<&str> {
        None
    }

    fn log_level(&self) -> Option<&str> {
        None
    }

    fn json_logs(&self) -> bool {
        self.json_logs
    }
}
