use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::OverpassError;

/// One coordinate pair as returned by `out geom`, longitude first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

/// One member of a relation: its role and the way segment it contributes.
/// Roles other than `outer` and `inner` take no part in ring assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub geometry: Vec<Coordinate>,
}

/// One raw unit of an Overpass JSON response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node {
        id: i64,
        lon: f64,
        lat: f64,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    Way {
        id: i64,
        #[serde(default)]
        geometry: Vec<Coordinate>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    Relation {
        id: i64,
        #[serde(default)]
        members: Vec<Member>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
}

/// Response formats accepted by the client. GeoJSON is synthesized from a
/// JSON response since Overpass has no native GeoJSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    GeoJson,
    Json,
    Xml,
    Csv,
}

impl ResponseFormat {
    /// Wire format declared in the `[out:..]` query header
    pub fn wire_format(&self) -> &'static str {
        match self {
            ResponseFormat::GeoJson | ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
            ResponseFormat::Csv => "csv",
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = OverpassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "geojson" => Ok(ResponseFormat::GeoJson),
            "json" => Ok(ResponseFormat::Json),
            "xml" => Ok(ResponseFormat::Xml),
            "csv" => Ok(ResponseFormat::Csv),
            other => Err(OverpassError::Config(format!(
                "unsupported response format: {other}"
            ))),
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseFormat::GeoJson => "geojson",
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
            ResponseFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// Output verbosity of the closing `out` statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Ids,
    Skel,
    #[default]
    Body,
    Tags,
    Meta,
}

impl FromStr for Verbosity {
    type Err = OverpassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ids" => Ok(Verbosity::Ids),
            "skel" => Ok(Verbosity::Skel),
            "body" => Ok(Verbosity::Body),
            "tags" => Ok(Verbosity::Tags),
            "meta" => Ok(Verbosity::Meta),
            other => Err(OverpassError::Config(format!(
                "unsupported verbosity: {other}"
            ))),
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verbosity::Ids => "ids",
            Verbosity::Skel => "skel",
            Verbosity::Body => "body",
            Verbosity::Tags => "tags",
            Verbosity::Meta => "meta",
        };
        f.write_str(name)
    }
}
