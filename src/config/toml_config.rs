use crate::adapters::geolocation::DEFAULT_GEOLOCATION_ENDPOINT;
use crate::adapters::ip_lookup::DEFAULT_IP_ENDPOINT;
use crate::adapters::pass_prediction::DEFAULT_PASS_PREDICTION_ENDPOINT;
use crate::config::{MAX_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::utils::error::{PassError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    pub http: Option<HttpConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_ip_lookup")]
    pub ip_lookup: String,
    #[serde(default = "default_geolocation")]
    pub geolocation: String,
    #[serde(default = "default_pass_prediction")]
    pub pass_prediction: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            ip_lookup: default_ip_lookup(),
            geolocation: default_geolocation(),
            pass_prediction: default_pass_prediction(),
        }
    }
}

fn default_ip_lookup() -> String {
    DEFAULT_IP_ENDPOINT.to_string()
}

fn default_geolocation() -> String {
    DEFAULT_GEOLOCATION_ENDPOINT.to_string()
}

fn default_pass_prediction() -> String {
    DEFAULT_PASS_PREDICTION_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// 每個請求的逾時秒數；0 與 CLI 相同表示不設逾時
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PassError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PassError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ISS_ENDPOINT})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| PassError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.http.as_ref().and_then(|h| h.timeout_seconds)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoints.ip_lookup", &self.endpoints.ip_lookup)?;
        validate_url("endpoints.geolocation", &self.endpoints.geolocation)?;
        validate_url("endpoints.pass_prediction", &self.endpoints.pass_prediction)?;

        if let Some(timeout) = self.timeout_seconds().filter(|t| *t != 0) {
            validate_range(
                "http.timeout_seconds",
                timeout,
                MIN_TIMEOUT_SECONDS,
                MAX_TIMEOUT_SECONDS,
            )?;
        }

        if let Some(agent) = self.http.as_ref().and_then(|h| h.user_agent.as_deref()) {
            validate_non_empty_string("http.user_agent", agent)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn ip_endpoint(&self) -> &str {
        &self.endpoints.ip_lookup
    }

    fn geolocation_endpoint(&self) -> &str {
        &self.endpoints.geolocation
    }

    fn pass_prediction_endpoint(&self) -> &str {
        &self.endpoints.pass_prediction
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds()
            .filter(|t| *t > 0)
            .map(Duration::from_secs)
    }

    fn user_agent(&self) -> Option<&str> {
        self.http.as_ref().and_then(|h| h.user_agent.as_deref())
    }
}
