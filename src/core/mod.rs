pub mod pass_finder;
pub mod state;

pub use crate::domain::model::{Coordinates, IpAddress, PassList, PassWindow};
pub use crate::domain::ports::{ConfigProvider, GeoResolver, IpResolver, PassPredictor};
pub use crate::utils::error::Result;
