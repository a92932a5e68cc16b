use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 公開 IP，僅保存文字，不做格式驗證
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IpAddress(pub String);

impl IpAddress {
    pub fn new(ip: impl Into<String>) -> Self {
        Self(ip.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 經緯度值：服務可能回傳數字或數字字串，原樣保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for CoordinateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateValue::Number(n) => write!(f, "{}", n),
            CoordinateValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CoordinateValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(CoordinateValue::Number)
            .unwrap_or_else(|| CoordinateValue::Text(value.to_string()))
    }
}

impl From<&str> for CoordinateValue {
    fn from(value: &str) -> Self {
        CoordinateValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: CoordinateValue,
    pub longitude: CoordinateValue,
}

impl Coordinates {
    pub fn new(latitude: impl Into<CoordinateValue>, longitude: impl Into<CoordinateValue>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

/// 單次過境：risetime 為 Unix 秒 (UTC)，duration 為秒
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PassWindow {
    #[serde(deserialize_with = "deserialize_whole_i64")]
    pub risetime: i64,
    #[serde(deserialize_with = "deserialize_whole_u64")]
    pub duration: u64,
}

// 接受 1445931146.0 這類整數值的浮點數，小數或非數字則拒絕
fn whole_number(number: &serde_json::Number) -> Option<f64> {
    number.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0)
}

fn deserialize_whole_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    whole_number(&number)
        .filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f as i64)
        .ok_or_else(|| D::Error::custom(format!("expected a whole number of seconds, got {}", number)))
}

fn deserialize_whole_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = number.as_u64() {
        return Ok(n);
    }
    whole_number(&number)
        .filter(|f| *f >= 0.0 && *f < u64::MAX as f64)
        .map(|f| f as u64)
        .ok_or_else(|| {
            D::Error::custom(format!("expected a non-negative whole number of seconds, got {}", number))
        })
}

/// 依服務回傳順序保存，不重新排序
pub type PassList = Vec<PassWindow>;
