// Adapters layer: HTTP clients for the three upstream services.

pub mod geolocation;
pub mod http;
pub mod ip_lookup;
pub mod pass_prediction;

pub use geolocation::GeolocationClient;
pub use http::HttpFetcher;
pub use ip_lookup::IpLookupClient;
pub use pass_prediction::PassPredictionClient;
