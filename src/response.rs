use geojson::FeatureCollection;
use serde_json::Value;

use crate::client::RawResponse;
use crate::{OverpassError, Result};

/// Decoded Overpass payload, shaped by the declared content type
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Tab-delimited rows from a `[out:csv]` query
    Csv(Vec<Vec<String>>),
    /// Raw XML text, passed through unmodified
    Xml(String),
    /// Parsed JSON document
    Json(Value),
    /// Feature collection synthesized from a JSON response
    GeoJson(FeatureCollection),
}

/// Parse a raw payload per its declared content type. JSON documents are
/// structurally validated unless `validate` is false (raw-query bypass).
pub fn decode(raw: &RawResponse, validate: bool) -> Result<Response> {
    match media_type(&raw.content_type) {
        "text/csv" => Ok(Response::Csv(parse_csv(&raw.body))),
        "text/xml" | "application/xml" | "application/osm3s+xml" => {
            Ok(Response::Xml(raw.body.clone()))
        }
        "application/json" => {
            let document: Value = serde_json::from_str(&raw.body)
                .map_err(|e| OverpassError::InvalidResponse(e.to_string()))?;
            if validate {
                validate_document(&document)?;
            }
            Ok(Response::Json(document))
        }
        other => Err(OverpassError::InvalidResponse(format!(
            "unexpected content type: {other}"
        ))),
    }
}

/// A well-formed Overpass answer carries an `elements` array at the root.
/// A `remark` starting with "runtime error" means the query died on the
/// server after returning 200.
pub fn validate_document(document: &Value) -> Result<()> {
    if document.get("elements").is_none() {
        return Err(OverpassError::InvalidResponse(
            "missing top-level elements key".to_string(),
        ));
    }

    if let Some(remark) = document.get("remark").and_then(Value::as_str) {
        if remark.starts_with("runtime error") {
            return Err(OverpassError::ServerRuntime(remark.to_string()));
        }
    }

    Ok(())
}

fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or("").trim()
}

fn parse_csv(body: &str) -> Vec<Vec<String>> {
    body.lines()
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}
