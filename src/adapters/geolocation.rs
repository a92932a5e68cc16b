use crate::adapters::http::{parse_json, HttpFetcher};
use crate::domain::model::{CoordinateValue, Coordinates, IpAddress};
use crate::domain::ports::GeoResolver;
use crate::utils::error::{PassError, Result, Service};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_GEOLOCATION_ENDPOINT: &str = "http://ipwho.is";

#[derive(Debug, Deserialize)]
struct GeolocationResponse {
    // 區分「缺少」與「明確的 null」
    #[serde(default, deserialize_with = "deserialize_present")]
    success: Option<serde_json::Value>,
    message: Option<serde_json::Value>,
    ip: Option<serde_json::Value>,
    latitude: Option<CoordinateValue>,
    longitude: Option<CoordinateValue>,
}

/// 以 IP 查詢經緯度；回應內的 success 旗標獨立於 HTTP 狀態
#[derive(Debug, Clone)]
pub struct GeolocationClient {
    fetcher: HttpFetcher,
    base_url: Url,
}

impl GeolocationClient {
    pub fn new(fetcher: HttpFetcher, base_url: Url) -> Self {
        Self { fetcher, base_url }
    }

    /// `<base>/<ip>`，IP 作為單一路徑片段編碼
    fn lookup_url(&self, ip: &IpAddress) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PassError::InvalidConfigValueError {
                field: "geolocation_endpoint".to_string(),
                value: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .push(ip.as_str());
        Ok(url)
    }
}

fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// 旗標原樣呈現：缺少為 `undefined`，其餘照服務送出的值
fn flag_text(flag: Option<&serde_json::Value>) -> String {
    match flag {
        None => "undefined".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn echo_text(ip: Option<serde_json::Value>) -> Option<String> {
    match ip {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Null) | Some(serde_json::Value::String(_)) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

fn message_text(message: Option<serde_json::Value>) -> String {
    match message {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Null) | None => "undefined".to_string(),
        Some(other) => other.to_string(),
    }
}

#[async_trait]
impl GeoResolver for GeolocationClient {
    async fn fetch_coords_by_ip(&self, ip: &IpAddress) -> Result<Coordinates> {
        let url = self.lookup_url(ip)?;
        // HTTP 500 這類錯誤在這一步就會回傳
        let (status, body) = self.fetcher.get_text(Service::Geolocation, url).await?;
        let parsed: GeolocationResponse = parse_json(Service::Geolocation, &body)?;

        if !parsed.success.as_ref().is_some_and(is_truthy) {
            let message = message_text(parsed.message);
            let echoed_ip = echo_text(parsed.ip);
            tracing::warn!(
                "🚫 Geolocation rejected IP {} (echoed {:?}): {}",
                ip,
                echoed_ip,
                message
            );
            return Err(PassError::GeolocationRejected {
                queried_ip: ip.to_string(),
                echoed_ip,
                success: flag_text(parsed.success.as_ref()),
                message,
                status,
            });
        }

        let latitude = parsed
            .latitude
            .ok_or_else(|| PassError::parse(Service::Geolocation, "latitude", "field is missing"))?;
        let longitude = parsed
            .longitude
            .ok_or_else(|| PassError::parse(Service::Geolocation, "longitude", "field is missing"))?;

        tracing::info!("📍 Coordinates for {}: ({}, {})", ip, latitude, longitude);
        Ok(Coordinates {
            latitude,
            longitude,
        })
    }
}
