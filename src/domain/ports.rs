use crate::domain::model::{Coordinates, IpAddress, PassList};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 取得呼叫端的公開 IP
#[async_trait]
pub trait IpResolver: Send + Sync {
    async fn fetch_my_ip(&self) -> Result<IpAddress>;
}

/// IP 轉經緯度
#[async_trait]
pub trait GeoResolver: Send + Sync {
    async fn fetch_coords_by_ip(&self, ip: &IpAddress) -> Result<Coordinates>;
}

/// 經緯度轉過境時間列表
#[async_trait]
pub trait PassPredictor: Send + Sync {
    async fn fetch_flyover_times(&self, coords: &Coordinates) -> Result<PassList>;
}

pub trait ConfigProvider: Send + Sync {
    fn ip_endpoint(&self) -> &str;
    fn geolocation_endpoint(&self) -> &str;
    fn pass_prediction_endpoint(&self) -> &str;

    /// 每個請求的逾時；None 表示不限制
    fn request_timeout(&self) -> Option<Duration>;

    fn user_agent(&self) -> Option<&str> {
        None
    }
}
