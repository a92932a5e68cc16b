use std::fmt;
use thiserror::Error;

/// 外部服務識別，用於錯誤訊息與日誌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    IpLookup,
    Geolocation,
    PassPrediction,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::IpLookup => "IP",
            Service::Geolocation => "coordinates",
            Service::PassPrediction => "ISS pass times",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 封閉的錯誤分類，方便測試與呼叫端判斷
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    UpstreamStatus,
    Parse,
    Config,
}

#[derive(Error, Debug)]
pub enum PassError {
    #[error("Network error when fetching {service}: {source}")]
    Network {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    #[error("Status Code {status} when fetching {service}. Response: {body}")]
    UpstreamStatus {
        service: Service,
        status: u16,
        body: String,
    },

    #[error(
        "Success status was {success}. Server message says: {message} when fetching for IP {}",
        reported_ip(.echoed_ip, .queried_ip)
    )]
    GeolocationRejected {
        queried_ip: String,
        /// 服務回應中回傳的 `ip`，可能與查詢值不同
        echoed_ip: Option<String>,
        /// 原樣的 success 旗標；缺少時為 `undefined`
        success: String,
        message: String,
        status: u16,
    },

    #[error("Failed to parse {service} response field '{field}': {reason}")]
    Parse {
        service: Service,
        field: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl PassError {
    pub fn parse(service: Service, field: impl Into<String>, reason: impl Into<String>) -> Self {
        PassError::Parse {
            service,
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PassError::Network { .. } => ErrorKind::Network,
            // success=false 與非 2xx 同屬上游拒絕
            PassError::UpstreamStatus { .. } | PassError::GeolocationRejected { .. } => {
                ErrorKind::UpstreamStatus
            }
            PassError::Parse { .. } => ErrorKind::Parse,
            PassError::IoError(_)
            | PassError::ConfigError { .. }
            | PassError::InvalidConfigValueError { .. } => ErrorKind::Config,
        }
    }

    /// 發生錯誤的階段；設定錯誤沒有對應階段
    pub fn service(&self) -> Option<Service> {
        match self {
            PassError::Network { service, .. }
            | PassError::UpstreamStatus { service, .. }
            | PassError::Parse { service, .. } => Some(*service),
            PassError::GeolocationRejected { .. } => Some(Service::Geolocation),
            _ => None,
        }
    }

    /// HTTP 狀態碼（若有）
    pub fn status(&self) -> Option<u16> {
        match self {
            PassError::UpstreamStatus { status, .. }
            | PassError::GeolocationRejected { status, .. } => Some(*status),
            PassError::Network { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Network => "Check your network connection and that the service endpoint is reachable",
            ErrorKind::UpstreamStatus => "The upstream service refused the request; try again later or use another endpoint",
            ErrorKind::Parse => "The service answered in an unexpected format; verify the configured endpoint",
            ErrorKind::Config => "Fix the configuration values and run again",
        }
    }
}

pub type Result<T> = std::result::Result<T, PassError>;

// 訊息以服務回傳的 IP 為準，沒有回傳時才用查詢值
fn reported_ip<'a>(echoed_ip: &'a Option<String>, queried_ip: &'a str) -> &'a str {
    echoed_ip.as_deref().unwrap_or(queried_ip)
}
