use std::str::FromStr;

use overpass_client::{build_query, MapQuery, OverpassError, ResponseFormat, Verbosity, WayQuery};

const TEST_AREA_ID: u64 = 3_600_392_915;

#[test]
fn test_build_query_geojson() {
    let query = build_query(
        "node[shop=retail]",
        ResponseFormat::GeoJson,
        Verbosity::Body,
        None,
    );
    assert_eq!(query, "[out:json];node[shop=retail];out body geom;");
}

#[test]
fn test_build_query_json() {
    let query = build_query(
        "node[shop=retail]",
        ResponseFormat::Json,
        Verbosity::Body,
        None,
    );
    assert_eq!(query, "[out:json];node[shop=retail];out body;");
}

#[test]
fn test_build_query_xml() {
    let query = build_query(
        "node[shop=retail]",
        ResponseFormat::Xml,
        Verbosity::Body,
        None,
    );
    assert_eq!(query, "[out:xml];node[shop=retail];out body;");
}

#[test]
fn test_build_query_verbosity() {
    let query = build_query(
        "way[highway]",
        ResponseFormat::Json,
        Verbosity::Meta,
        None,
    );
    assert_eq!(query, "[out:json];way[highway];out meta;");
}

#[test]
fn test_build_query_trims_and_terminates() {
    let query = build_query(
        "node[shop=retail];  \n",
        ResponseFormat::Json,
        Verbosity::Body,
        None,
    );
    assert_eq!(query, "[out:json];node[shop=retail];out body;");
}

#[test]
fn test_build_query_with_area() {
    let query = build_query(
        "node[shop=retail]",
        ResponseFormat::GeoJson,
        Verbosity::Body,
        Some(TEST_AREA_ID),
    );
    assert_eq!(
        query,
        format!("[out:json];node[shop=retail](area:{TEST_AREA_ID});out body geom;")
    );
}

#[test]
fn test_build_query_area_scopes_every_selector() {
    let fragment = concat!(
        "node[\"type\"=\"restriction\"];",
        "way[\"type\"=\"restriction\"];",
        "relation[\"type\"=\"restriction\"];",
        "out body;>;"
    );
    let query = build_query(
        fragment,
        ResponseFormat::GeoJson,
        Verbosity::Body,
        Some(TEST_AREA_ID),
    );
    let expected = format!(
        concat!(
            "[out:json];",
            "node[\"type\"=\"restriction\"](area:{id});",
            "way[\"type\"=\"restriction\"](area:{id});",
            "relation[\"type\"=\"restriction\"](area:{id});",
            "out body;>;out body geom;"
        ),
        id = TEST_AREA_ID
    );
    assert_eq!(query, expected);
}

#[test]
fn test_area_injection_ignores_quoted_semicolons() {
    let query = build_query(
        "node[\"name\"=\"foo;bar\"]",
        ResponseFormat::Json,
        Verbosity::Body,
        Some(42),
    );
    assert_eq!(
        query,
        "[out:json];node[\"name\"=\"foo;bar\"](area:42);out body;"
    );
}

#[test]
fn test_area_injection_skips_non_selector_statements() {
    let query = build_query(
        "out skel;>;",
        ResponseFormat::Json,
        Verbosity::Body,
        Some(42),
    );
    assert_eq!(query, "[out:json];out skel;>;out body;");
}

#[test]
fn test_map_query_display() {
    let bbox = MapQuery::new(41.73007, -71.58598, 41.73599, -71.57661);
    assert_eq!(
        bbox.to_string(),
        "(node(41.73007,-71.58598,41.73599,-71.57661);<;);"
    );
}

#[test]
fn test_way_query_display() {
    let query = WayQuery::new("[\"highway\"=\"primary\"]");
    assert_eq!(query.to_string(), "way[\"highway\"=\"primary\"];(._;>;);");
}

#[test]
fn test_response_format_parsing() {
    assert_eq!(
        ResponseFormat::from_str("geojson").unwrap(),
        ResponseFormat::GeoJson
    );
    assert_eq!(
        ResponseFormat::from_str("csv").unwrap(),
        ResponseFormat::Csv
    );
    assert!(matches!(
        ResponseFormat::from_str("yaml"),
        Err(OverpassError::Config(_))
    ));
}

#[test]
fn test_verbosity_parsing() {
    assert_eq!(Verbosity::from_str("meta").unwrap(), Verbosity::Meta);
    assert!(matches!(
        Verbosity::from_str("chatty"),
        Err(OverpassError::Config(_))
    ));
}
