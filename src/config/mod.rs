#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CallStyle, CliConfig};
pub use toml_config::TomlConfig;

/// 每個請求逾時的允許範圍（秒）
pub const MIN_TIMEOUT_SECONDS: u64 = 1;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;
