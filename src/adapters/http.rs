use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PassError, Result, Service};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!("iss-passes/", env!("CARGO_PKG_VERSION"));

/// 三個階段共用的 HTTP 取得邏輯：傳輸錯誤與非 2xx 狀態在此分類
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| PassError::ConfigError {
            message: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self { client })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config.request_timeout(), config.user_agent())
    }

    /// 發出 GET，成功時回傳狀態碼與原始 body
    pub async fn get_text(&self, service: Service, url: Url) -> Result<(u16, String)> {
        tracing::debug!("📡 Fetching {} from: {}", service, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| PassError::Network { service, source })?;

        let status = response.status();
        tracing::debug!("{} response status: {}", service, status);

        let body = response
            .text()
            .await
            .map_err(|source| PassError::Network { service, source })?;

        if !status.is_success() {
            return Err(PassError::UpstreamStatus {
                service,
                status: status.as_u16(),
                body,
            });
        }

        Ok((status.as_u16(), body))
    }
}

pub fn parse_json<T: DeserializeOwned>(service: Service, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| PassError::parse(service, "body", e.to_string()))
}
