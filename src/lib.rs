pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CallStyle, CliConfig};
pub use crate::config::TomlConfig;

pub use crate::core::pass_finder::{HttpPassFinder, PassFinder};
pub use crate::domain::model::{CoordinateValue, Coordinates, IpAddress, PassList, PassWindow};
pub use crate::utils::error::{ErrorKind, PassError, Result, Service};
