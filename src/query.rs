use std::fmt;

use crate::models::{ResponseFormat, Verbosity};

/// Turn a user-supplied QL fragment into a complete, ready-to-send query.
///
/// The fragment is trimmed and terminated, scoped to `area_id` when one is
/// given, then wrapped with the format header and the closing `out`
/// statement. GeoJSON responses are synthesized client-side, so that format
/// declares `json` on the wire and asks for geometry-inclusive output.
/// Malformed fragments are passed through untouched; the server is the
/// only QL validator.
pub fn build_query(
    fragment: &str,
    format: ResponseFormat,
    verbosity: Verbosity,
    area_id: Option<u64>,
) -> String {
    let mut raw = fragment.trim_end().to_string();
    if !raw.ends_with(';') {
        raw.push(';');
    }

    if let Some(area_id) = area_id {
        raw = inject_area(&raw, area_id);
    }

    match format {
        ResponseFormat::GeoJson => format!("[out:json];{raw}out {verbosity} geom;"),
        other => format!("[out:{}];{raw}out {verbosity};", other.wire_format()),
    }
}

/// Scope every top-level `node`/`way`/`relation` selector statement in the
/// fragment to the given area by appending `(area:<id>)` before its
/// terminator. Other statements (`out`, `>`, unions) pass through as-is.
pub(crate) fn inject_area(fragment: &str, area_id: u64) -> String {
    let mut out = String::with_capacity(fragment.len() + 24);
    let mut rest = fragment;

    while !rest.is_empty() {
        let trimmed = rest.trim_start();
        let ws_len = rest.len() - trimmed.len();
        out.push_str(&rest[..ws_len]);
        rest = trimmed;
        if rest.is_empty() {
            break;
        }

        let (statement, terminated) = split_statement(rest);
        out.push_str(statement);
        if is_selector(statement) {
            out.push_str(&format!("(area:{area_id})"));
        }
        rest = &rest[statement.len()..];
        if terminated {
            out.push(';');
            rest = &rest[1..];
        }
    }

    out
}

/// Split off the first statement. Semicolons inside quoted strings or
/// bracketed filters do not terminate a statement.
fn split_statement(input: &str) -> (&str, bool) {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in input.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => return (&input[..idx], true),
            _ => {}
        }
    }

    (input, false)
}

fn is_selector(statement: &str) -> bool {
    let keyword = statement
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or("");
    matches!(keyword, "node" | "way" | "relation")
}

/// Convenience query for everything inside a bounding box, completed with
/// the parents referencing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapQuery {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl MapQuery {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }
}

impl fmt::Display for MapQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(node({},{},{},{});<;);",
            self.south, self.west, self.north, self.east
        )
    }
}

/// Convenience query for ways matching a filter expression, completed with
/// their member nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct WayQuery {
    parameters: String,
}

impl WayQuery {
    /// `parameters` is a raw QL filter expression, e.g. `["highway"]`.
    pub fn new(parameters: impl Into<String>) -> Self {
        Self {
            parameters: parameters.into(),
        }
    }
}

impl fmt::Display for WayQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "way{};(._;>;);", self.parameters)
    }
}
