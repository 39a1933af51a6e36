use std::collections::HashMap;

use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value as GeoValue};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{Coordinate, Element, Member};

/// A closed ring of GeoJSON positions, `[lon, lat]` each
type Ring = Vec<Vec<f64>>;
/// One polygon group: an outer ring followed by its holes
type PolygonGroup = Vec<Ring>;

/// Outcome of converting one batch of elements
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub collection: FeatureCollection,
    /// Relation member segments that could not be stitched onto any ring
    pub unmatched_segments: usize,
}

/// Pull the `elements` array out of a parsed Overpass document, skipping
/// entries that are not nodes, ways or relations.
pub fn elements_from_document(document: &Value) -> Vec<Element> {
    let Some(items) = document.get("elements").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(element) => Some(element),
            Err(err) => {
                debug!("skipping element: {err}");
                None
            }
        })
        .collect()
}

/// Convert a validated `elements` array into a GeoJSON feature collection.
///
/// Nodes become Points and ways LineStrings, both keyed by element id.
/// Relations go through ring assembly and emit one MultiPolygon feature
/// per polygon group, sharing the relation's tags with the id injected as
/// a property. A relation that yields no rings contributes nothing; it
/// never fails the batch.
pub fn as_geojson(elements: &[Element]) -> Conversion {
    let mut features = Vec::new();
    let mut unmatched_segments = 0;

    for element in elements {
        match element {
            Element::Node { id, lon, lat, tags } => {
                features.push(feature(*id, GeoValue::Point(vec![*lon, *lat]), tags));
            }
            Element::Way { id, geometry, tags } => {
                let line = geometry.iter().map(|c| vec![c.lon, c.lat]).collect();
                features.push(feature(*id, GeoValue::LineString(line), tags));
            }
            Element::Relation { id, members, tags } => {
                let assembly = assemble_rings(members);
                unmatched_segments += assembly.unmatched;
                for group in assembly.polygons {
                    features.push(relation_feature(*id, group, tags));
                }
            }
        }
    }

    if unmatched_segments > 0 {
        warn!("{unmatched_segments} relation member segment(s) could not be stitched");
    }

    Conversion {
        collection: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        unmatched_segments,
    }
}

fn feature(id: i64, value: GeoValue, tags: &HashMap<String, String>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: Some(Id::Number(id.into())),
        properties: Some(properties(tags)),
        foreign_members: None,
    }
}

fn relation_feature(id: i64, group: PolygonGroup, tags: &HashMap<String, String>) -> Feature {
    let mut properties = properties(tags);
    properties.insert("id".to_string(), Value::from(id));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoValue::MultiPolygon(vec![group]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn properties(tags: &HashMap<String, String>) -> JsonObject {
    tags.iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

#[derive(Debug, PartialEq)]
enum Role {
    Outer,
    Inner,
}

struct Assembly {
    polygons: Vec<PolygonGroup>,
    unmatched: usize,
}

/// Stitch a relation's way segments into closed rings.
///
/// Overpass guarantees neither member order nor segment direction, so each
/// segment is oriented against the ring in progress by endpoint
/// coincidence: flip the segment, flip the accumulated ring, or scan the
/// remaining members for one that connects and swap it forward. A segment
/// matching nothing is counted and skipped. Consecutive outer rings open a
/// new polygon group; inner rings become holes of the current group.
fn assemble_rings(members: &[Member]) -> Assembly {
    // Local working copy: segments get reversed and reordered while
    // stitching, which must not leak into the decoded response. Members
    // in other roles or without geometry take no part.
    let mut members: Vec<Member> = members
        .iter()
        .filter(|m| (m.role == "outer" || m.role == "inner") && !m.geometry.is_empty())
        .cloned()
        .collect();

    let mut polygons: Vec<PolygonGroup> = Vec::new();
    let mut poly: PolygonGroup = Vec::new();
    let mut points: Ring = Vec::new();
    let mut prev_role = Role::Inner;
    let mut started = false;
    let mut unmatched = 0usize;

    let count = members.len();
    for pos in 0..count {
        if !points.is_empty() {
            let tail = points[points.len() - 1].clone();
            let seg_first = members[pos].geometry[0];
            let seg_last = members[pos].geometry[members[pos].geometry.len() - 1];

            if sq_dist(&tail, seg_first) == 0.0 {
                // already aligned
            } else if sq_dist(&tail, seg_last) == 0.0 {
                members[pos].geometry.reverse();
            } else {
                // neither end meets the tail; try the head of the
                // accumulated ring instead
                let head = points[0].clone();
                if sq_dist(&head, seg_first) == 0.0 {
                    points.reverse();
                } else if sq_dist(&head, seg_last) == 0.0 {
                    points.reverse();
                    members[pos].geometry.reverse();
                } else {
                    // out-of-order input: scan the rest for a segment
                    // that continues the ring and swap it forward
                    let mut found = None;
                    for i in pos + 1..count {
                        let other_first = members[i].geometry[0];
                        let other_last = members[i].geometry[members[i].geometry.len() - 1];
                        let at_start = sq_dist(&tail, other_first) == 0.0;
                        let at_end = sq_dist(&tail, other_last) == 0.0;
                        if at_start || at_end {
                            // a last-point match wins, so a candidate that
                            // meets the tail on both ends gets reversed
                            found = Some((i, at_end));
                            break;
                        }
                    }
                    match found {
                        Some((i, reverse)) => {
                            members.swap(pos, i);
                            if reverse {
                                members[pos].geometry.reverse();
                            }
                        }
                        None => {
                            unmatched += 1;
                            continue;
                        }
                    }
                }
            }
        }

        let member = &members[pos];
        match member.role.as_str() {
            "outer" => {
                if prev_role == Role::Inner {
                    // start a new outer ring
                    points.clear();
                }
                if points.is_empty() && started {
                    // previous outer plus its holes is complete
                    polygons.push(std::mem::take(&mut poly));
                }
                extend_ring(&mut points, &member.geometry);
                if ring_closed(&points) {
                    poly.push(std::mem::take(&mut points));
                }
                prev_role = Role::Outer;
            }
            "inner" => {
                extend_ring(&mut points, &member.geometry);
                if ring_closed(&points) {
                    poly.push(std::mem::take(&mut points));
                }
                prev_role = Role::Inner;
            }
            _ => {}
        }
        started = true;
    }

    polygons.push(poly);

    // a relation with no stitchable members contributes nothing
    if polygons.len() == 1 && polygons[0].is_empty() {
        return Assembly {
            polygons: Vec::new(),
            unmatched,
        };
    }

    Assembly {
        polygons,
        unmatched,
    }
}

fn extend_ring(points: &mut Ring, geometry: &[Coordinate]) {
    points.extend(geometry.iter().map(|c| vec![c.lon, c.lat]));
}

fn ring_closed(points: &Ring) -> bool {
    !points.is_empty() && points[0] == points[points.len() - 1]
}

fn sq_dist(point: &[f64], coordinate: Coordinate) -> f64 {
    (point[0] - coordinate.lon).powi(2) + (point[1] - coordinate.lat).powi(2)
}
