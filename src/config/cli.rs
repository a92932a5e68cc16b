use crate::adapters::geolocation::DEFAULT_GEOLOCATION_ENDPOINT;
use crate::adapters::ip_lookup::DEFAULT_IP_ENDPOINT;
use crate::adapters::pass_prediction::DEFAULT_PASS_PREDICTION_ENDPOINT;
use crate::config::{MAX_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// 兩種呼叫方式，對應同一條查詢流程
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CallStyle {
    Promise,
    Callback,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "iss-passes")]
#[command(about = "Print the next ISS passes over your current location")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_IP_ENDPOINT)]
    pub ip_endpoint: String,

    #[arg(long, default_value = DEFAULT_GEOLOCATION_ENDPOINT)]
    pub geolocation_endpoint: String,

    #[arg(long, default_value = DEFAULT_PASS_PREDICTION_ENDPOINT)]
    pub pass_endpoint: String,

    #[arg(long, default_value = "10", help = "Per-request timeout, 0 disables it")]
    pub timeout_seconds: u64,

    #[arg(long)]
    pub user_agent: Option<String>,

    #[arg(long, help = "Load endpoints from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value = "promise")]
    pub style: CallStyle,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("ip_endpoint", &self.ip_endpoint)?;
        validate_url("geolocation_endpoint", &self.geolocation_endpoint)?;
        validate_url("pass_endpoint", &self.pass_endpoint)?;

        if self.timeout_seconds != 0 {
            validate_range(
                "timeout_seconds",
                self.timeout_seconds,
                MIN_TIMEOUT_SECONDS,
                MAX_TIMEOUT_SECONDS,
            )?;
        }

        if let Some(agent) = &self.user_agent {
            validate_non_empty_string("user_agent", agent)?;
        }

        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn ip_endpoint(&self) -> &str {
        &self.ip_endpoint
    }

    fn geolocation_endpoint(&self) -> &str {
        &self.geolocation_endpoint
    }

    fn pass_prediction_endpoint(&self) -> &str {
        &self.pass_endpoint
    }

    fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }

    fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}
