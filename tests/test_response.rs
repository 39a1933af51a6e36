use overpass_client::response::{decode, validate_document};
use overpass_client::{OverpassError, RawResponse, Response};
use serde_json::json;

fn raw(body: &str, content_type: &str) -> RawResponse {
    RawResponse {
        body: body.to_string(),
        content_type: content_type.to_string(),
    }
}

#[test]
fn test_decode_csv_rows() {
    let payload = raw("name\tcount\nMain Street\t2", "text/csv");
    let response = decode(&payload, true).unwrap();
    assert_eq!(
        response,
        Response::Csv(vec![
            vec!["name".to_string(), "count".to_string()],
            vec!["Main Street".to_string(), "2".to_string()],
        ])
    );
}

#[test]
fn test_decode_xml_passthrough() {
    let body = "<?xml version=\"1.0\"?><osm></osm>";
    for content_type in ["text/xml", "application/xml", "application/osm3s+xml"] {
        let response = decode(&raw(body, content_type), true).unwrap();
        assert_eq!(response, Response::Xml(body.to_string()));
    }
}

#[test]
fn test_decode_json_document() {
    let payload = raw("{\"elements\": []}", "application/json");
    let response = decode(&payload, true).unwrap();
    assert_eq!(response, Response::Json(json!({"elements": []})));
}

#[test]
fn test_decode_json_with_charset_parameter() {
    let payload = raw("{\"elements\": []}", "application/json; charset=utf-8");
    assert!(decode(&payload, true).is_ok());
}

#[test]
fn test_decode_rejects_missing_elements() {
    let payload = raw("{\"version\": 0.6}", "application/json");
    assert!(matches!(
        decode(&payload, true),
        Err(OverpassError::InvalidResponse(_))
    ));
}

#[test]
fn test_decode_skips_validation_when_disabled() {
    let payload = raw("{\"version\": 0.6}", "application/json");
    assert!(decode(&payload, false).is_ok());
}

#[test]
fn test_decode_rejects_unknown_content_type() {
    let payload = raw("hello", "text/plain");
    assert!(matches!(
        decode(&payload, true),
        Err(OverpassError::InvalidResponse(_))
    ));
}

#[test]
fn test_runtime_error_remark_fails_validation() {
    let document = json!({
        "elements": [],
        "remark": "runtime error: Query timed out in \"query\" at line 1."
    });
    match validate_document(&document) {
        Err(OverpassError::ServerRuntime(remark)) => {
            assert!(remark.starts_with("runtime error"));
        }
        other => panic!("expected ServerRuntime, got {other:?}"),
    }
}

#[test]
fn test_benign_remark_passes_validation() {
    let document = json!({
        "elements": [],
        "remark": "note: some areas are out of date"
    });
    assert!(validate_document(&document).is_ok());
}
