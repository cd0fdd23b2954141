use crate::config::{DEFAULT_HOST, DEFAULT_PORT, LOG_FORMATS};
use crate::core::ConfigProvider;
use crate::domain::model::DEFAULT_UPSTREAM_BASE_URL;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COVID_UPSTREAM_URL})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn log_format(&self) -> &str {
        self.logging.format.as_deref().unwrap_or("compact")
    }
}

impl ConfigProvider for TomlConfig {
    fn bind_host(&self) -> &str {
        self.server.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    fn bind_port(&self) -> u16 {
        self.server.port.unwrap_or(DEFAULT_PORT)
    }

    fn upstream_base_url(&self) -> &str {
        self.upstream
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_UPSTREAM_BASE_URL)
    }

    fn user_agent(&self) -> Option<&str> {
        self.upstream.user_agent.as_deref()
    }

    fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }

    fn json_logs(&self) -> bool {
        self.log_format() == "json"
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", self.bind_host())?;
        validate_range("server.port", self.bind_port(), 1, u16::MAX)?;
        validate_url("upstream.base_url", self.upstream_base_url())?;
        validate_one_of("logging.format", self.log_format(), LOG_FORMATS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
host = "0.0.0.0"
port = 8080

[upstream]
base_url = "http://localhost:9000/v2"
user_agent = "covid-dashboard"

[logging]
level = "debug"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.bind_host(), "0.0.0.0");
        assert_eq!(config.bind_port(), 8080);
        assert_eq!(config.upstream_base_url(), "http://localhost:9000/v2");
        assert_eq!(config.user_agent(), Some("covid-dashboard"));
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.bind_host(), DEFAULT_HOST);
        assert_eq!(config.bind_port(), DEFAULT_PORT);
        assert_eq!(config.upstream_base_url(), DEFAULT_UPSTREAM_BASE_URL);
        assert!(!config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("COVID_TEST_UPSTREAM_URL", "https://mirror.example.com/v2");

        let toml_content = r#"
[upstream]
base_url = "${COVID_TEST_UPSTREAM_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.upstream_base_url(), "https://mirror.example.com/v2");

        std::env::remove_var("COVID_TEST_UPSTREAM_URL");
    }

    #[test]
    fn test_unknown_env_var_is_left_as_is() {
        let toml_content = r#"
[upstream]
user_agent = "${COVID_TEST_DOES_NOT_EXIST}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.user_agent(), Some("${COVID_TEST_DOES_NOT_EXIST}"));
    }

    #[test]
    fn test_config_validation() {
        let bad_url = TomlConfig::from_toml_str("[upstream]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_port = TomlConfig::from_toml_str("[server]\nport = 0\n").unwrap();
        assert!(bad_port.validate().is_err());

        let bad_format = TomlConfig::from_toml_str("[logging]\nformat = \"pretty\"\n").unwrap();
        assert!(bad_format.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[server\nport = 1").unwrap_err();
        assert!(matches!(err, AppError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 5050\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.bind_port(), 5050);
    }
}
