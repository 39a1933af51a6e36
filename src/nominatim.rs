use serde::Deserialize;
use tracing::debug;

use crate::{OverpassError, Result};

/// Public Nominatim search endpoint used by default.
pub const DEFAULT_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Results below this importance are treated as no match.
const MIN_IMPORTANCE: f64 = 0.8;

const WAY_AREA_OFFSET: u64 = 2_400_000_000;
const RELATION_AREA_OFFSET: u64 = 3_600_000_000;

/// One result row from the Nominatim search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub osm_type: String,
    pub osm_id: u64,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub importance: f64,
}

/// Lookup helper that resolves place names to Overpass area ids
#[derive(Debug, Clone)]
pub struct Nominatim {
    url: String,
    min_importance: f64,
    client: reqwest::blocking::Client,
}

impl Default for Nominatim {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_URL)
    }
}

impl Nominatim {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            min_importance: MIN_IMPORTANCE,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Look up a place by name, returning the first result that clears the
    /// importance threshold.
    pub fn lookup(&self, name: &str) -> Result<Place> {
        let places: Vec<Place> = self
            .client
            .get(&self.url)
            .query(&[("format", "json"), ("q", name)])
            .send()
            .map_err(|e| OverpassError::Geocode(e.to_string()))?
            .json()
            .map_err(|e| OverpassError::Geocode(e.to_string()))?;

        debug!("nominatim returned {} result(s) for {name:?}", places.len());

        places
            .into_iter()
            .find(|place| place.importance >= self.min_importance)
            .ok_or_else(|| OverpassError::Geocode(format!("no high-confidence match for {name:?}")))
    }

    /// Resolve a place name straight to an Overpass area id.
    pub fn area_id(&self, name: &str) -> Result<u64> {
        let place = self.lookup(name)?;
        area_id_for(&place.osm_type, place.osm_id).ok_or_else(|| {
            OverpassError::Geocode(format!(
                "{} is a {}, not an area",
                place.display_name, place.osm_type
            ))
        })
    }
}

/// Derive the Overpass area id for an OSM way or relation. Other object
/// types have no area representation.
pub fn area_id_for(osm_type: &str, osm_id: u64) -> Option<u64> {
    match osm_type {
        "way" => Some(osm_id + WAY_AREA_OFFSET),
        "relation" => Some(osm_id + RELATION_AREA_OFFSET),
        _ => None,
    }
}
