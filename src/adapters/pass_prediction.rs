use crate::adapters::http::{parse_json, HttpFetcher};
use crate::domain::model::{Coordinates, PassList, PassWindow};
use crate::domain::ports::PassPredictor;
use crate::utils::error::{PassError, Result, Service};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_PASS_PREDICTION_ENDPOINT: &str = "https://iss-flyover.herokuapp.com/json/";

#[derive(Debug, Deserialize)]
struct PassEnvelope {
    response: Option<serde_json::Value>,
}

/// 以經緯度查詢 ISS 過境時間
#[derive(Debug, Clone)]
pub struct PassPredictionClient {
    fetcher: HttpFetcher,
    endpoint: Url,
}

impl PassPredictionClient {
    pub fn new(fetcher: HttpFetcher, endpoint: Url) -> Self {
        Self { fetcher, endpoint }
    }

    fn prediction_url(&self, coords: &Coordinates) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lat", &coords.latitude.to_string())
            .append_pair("lon", &coords.longitude.to_string());
        url
    }
}

#[async_trait]
impl PassPredictor for PassPredictionClient {
    async fn fetch_flyover_times(&self, coords: &Coordinates) -> Result<PassList> {
        let url = self.prediction_url(coords);
        let (_, body) = self.fetcher.get_text(Service::PassPrediction, url).await?;
        let envelope: PassEnvelope = parse_json(Service::PassPrediction, &body)?;

        // 缺少 response 欄位時不可默默回傳空列表
        let response = match envelope.response {
            Some(serde_json::Value::Null) | None => {
                return Err(PassError::parse(
                    Service::PassPrediction,
                    "response",
                    "field is missing",
                ))
            }
            Some(value) => value,
        };

        let passes: Vec<PassWindow> = serde_json::from_value(response)
            .map_err(|e| PassError::parse(Service::PassPrediction, "response", e.to_string()))?;

        tracing::info!("🛰️ Received {} upcoming passes", passes.len());
        Ok(passes)
    }
}
