use tracing::{debug, info};

use crate::client::Transport;
use crate::config::Config;
use crate::convert::{as_geojson, elements_from_document};
use crate::models::{ResponseFormat, Verbosity};
use crate::query::build_query;
use crate::response::{decode, Response};
use crate::Result;

/// Synchronous Overpass API client.
///
/// Owns its transport and query settings; every call is one blocking
/// round trip with no shared mutable state between calls.
///
/// ```no_run
/// use overpass_client::{Api, Config, MapQuery};
///
/// let api = Api::new(Config::default())?;
/// let response = api.get(&MapQuery::new(41.730, -71.586, 41.736, -71.576).to_string())?;
/// # Ok::<(), overpass_client::OverpassError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Api {
    transport: Transport,
    format: ResponseFormat,
    verbosity: Verbosity,
    area_id: Option<u64>,
}

impl Api {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
            format: ResponseFormat::default(),
            verbosity: Verbosity::default(),
            area_id: None,
        })
    }

    /// Response format for subsequent queries, GeoJSON by default
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Verbosity of the closing `out` statement
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Scope all selector statements to this Overpass area
    pub fn with_area_id(mut self, area_id: u64) -> Self {
        self.area_id = Some(area_id);
        self
    }

    /// Build a full query from a QL fragment, run it, and decode the
    /// answer. With the GeoJSON format the response elements are converted
    /// into a feature collection.
    pub fn get(&self, fragment: &str) -> Result<Response> {
        let query = build_query(fragment, self.format, self.verbosity, self.area_id);
        debug!("built query: {query}");

        let raw = self.transport.send(&query)?;
        let response = decode(&raw, true)?;

        match response {
            Response::Json(document) if self.format == ResponseFormat::GeoJson => {
                let elements = elements_from_document(&document);
                let conversion = as_geojson(&elements);
                info!(
                    "converted {} element(s) into {} feature(s)",
                    elements.len(),
                    conversion.collection.features.len()
                );
                Ok(Response::GeoJson(conversion.collection))
            }
            other => Ok(other),
        }
    }

    /// Send a caller-built query verbatim, skipping query construction and
    /// structural validation. The parsed document comes back as-is.
    pub fn get_raw(&self, query: &str) -> Result<Response> {
        let raw = self.transport.send(query)?;
        decode(&raw, false)
    }
}
