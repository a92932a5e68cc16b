use crate::adapters::http::{parse_json, HttpFetcher};
use crate::domain::model::IpAddress;
use crate::domain::ports::IpResolver;
use crate::utils::error::{PassError, Result, Service};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_IP_ENDPOINT: &str = "https://api.ipify.org?format=json";

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: Option<serde_json::Value>,
}

/// 向固定端點查詢呼叫端的公開 IP
#[derive(Debug, Clone)]
pub struct IpLookupClient {
    fetcher: HttpFetcher,
    endpoint: Url,
}

impl IpLookupClient {
    pub fn new(fetcher: HttpFetcher, endpoint: Url) -> Self {
        Self { fetcher, endpoint }
    }
}

#[async_trait]
impl IpResolver for IpLookupClient {
    async fn fetch_my_ip(&self) -> Result<IpAddress> {
        let (_, body) = self
            .fetcher
            .get_text(Service::IpLookup, self.endpoint.clone())
            .await?;

        let parsed: IpResponse = parse_json(Service::IpLookup, &body)?;
        match parsed.ip {
            Some(serde_json::Value::String(ip)) if !ip.trim().is_empty() => {
                tracing::info!("🌐 Public IP: {}", ip);
                Ok(IpAddress::new(ip))
            }
            Some(serde_json::Value::String(_)) => Err(PassError::parse(
                Service::IpLookup,
                "ip",
                "field is empty",
            )),
            Some(other) => Err(PassError::parse(
                Service::IpLookup,
                "ip",
                format!("expected a string, got {}", other),
            )),
            None => Err(PassError::parse(Service::IpLookup, "ip", "field is missing")),
        }
    }
}
