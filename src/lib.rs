pub mod api;
pub mod client;
pub mod config;
pub mod convert;
pub mod models;
pub mod nominatim;
pub mod query;
pub mod response;

pub use api::Api;
pub use client::{RawResponse, Transport};
pub use config::Config;
pub use convert::{as_geojson, Conversion};
pub use models::{Coordinate, Element, Member, ResponseFormat, Verbosity};
pub use nominatim::Nominatim;
pub use query::{build_query, MapQuery, WayQuery};
pub use response::Response;

/// Common result type used throughout the crate
pub type Result<T> = std::result::Result<T, OverpassError>;

/// Everything that can go wrong between building a query and handing back
/// a decoded response. None of these are retried internally; retry policy
/// belongs to the caller.
#[derive(thiserror::Error, Debug)]
pub enum OverpassError {
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("the server rejected the query as malformed: {0}")]
    Syntax(String),

    #[error("too many concurrent requests")]
    TooManyRequests,

    #[error("the server is overloaded, gave up after {0:?}")]
    ServerOverloaded(std::time::Duration),

    #[error("the request returned status code {0}")]
    UnknownServerError(u16),

    #[error("received an invalid answer from the server: {0}")]
    InvalidResponse(String),

    #[error("the server reported a runtime error: {0}")]
    ServerRuntime(String),

    #[error("geocoding lookup failed: {0}")]
    Geocode(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
