// Resource accumulator tests
//
// Fragments arrive in the order a browser emits them: a request fragment
// carrying the URL, then response, length and timing fragments, then a
// completion fragment.

use super::*;
use crate::headers::HeaderMap;
use crate::record::{Record, RecordData, ResourceFinish, ResourceResponse, ResourceStart};
use crate::record_type::RecordType;
use crate::resource_type::ResourceType;

fn request_fragment(id: &str, url: &str) -> ResourceUpdate {
    ResourceUpdate {
        url: Some(url.to_string()),
        host: Some("example.com".to_string()),
        path: Some("/static/app.css".to_string()),
        last_path_component: Some("app.css".to_string()),
        request_method: Some("GET".to_string()),
        did_request_change: true,
        ..ResourceUpdate::new(id)
    }
}

fn response_fragment(id: &str, pairs: &[(&str, &str)]) -> ResourceUpdate {
    ResourceUpdate {
        response_headers: Some(pairs.iter().map(|(k, v)| (*k, *v)).collect()),
        status_code: Some(200),
        mime_type: Some("text/css".to_string()),
        did_response_change: true,
        ..ResourceUpdate::new(id)
    }
}

fn completion_fragment(id: &str) -> ResourceUpdate {
    ResourceUpdate {
        did_completion_change: true,
        finished: true,
        ..ResourceUpdate::new(id)
    }
}

#[test]
fn test_first_fragment_without_url_is_dropped() {
    let mut store = ResourceStore::new();
    let outcome = store.apply_update(&ResourceUpdate {
        did_length_change: true,
        content_length: Some(10),
        ..ResourceUpdate::new("X")
    });

    assert_eq!(outcome, UpdateOutcome::Dropped);
    assert!(store.get("X").is_none());
    assert!(store.is_empty());
}

#[test]
fn test_first_fragment_creates_snapshot() {
    let mut store = ResourceStore::new();
    let outcome = store.apply_update(&request_fragment("1", "http://example.com/static/app.css"));

    assert_eq!(outcome, UpdateOutcome::Created);
    let state = store.get("1").unwrap();
    assert_eq!(state.url, "http://example.com/static/app.css");
    assert_eq!(state.domain.as_deref(), Some("example.com"));
    assert_eq!(state.last_path_component.as_deref(), Some("app.css"));
    assert!(state.response_headers.is_none());
}

#[test]
fn test_merge_only_flagged_groups() {
    let mut store = ResourceStore::new();
    store.apply_update(&request_fragment("1", "http://example.com/static/app.css"));

    // Request fields in an unflagged fragment must not clobber the snapshot
    let mut response = response_fragment("1", &[("Content-Type", "text/css")]);
    response.host = Some("evil.example".to_string());
    response.content_length = Some(999);
    assert_eq!(store.apply_update(&response), UpdateOutcome::Merged);

    let state = store.get("1").unwrap();
    assert_eq!(state.domain.as_deref(), Some("example.com"));
    assert_eq!(state.content_length, None);
    assert_eq!(state.status_code, Some(200));
    assert_eq!(state.resource_type(), ResourceType::Stylesheet);

    store.apply_update(&ResourceUpdate {
        did_length_change: true,
        content_length: Some(4096),
        ..ResourceUpdate::new("1")
    });
    assert_eq!(store.get("1").unwrap().content_length, Some(4096));
}

#[test]
fn test_timing_only_overwritten_by_positive_values() {
    let mut store = ResourceStore::new();
    store.apply_update(&request_fragment("1", "http://example.com/a.js"));
    store.apply_update(&ResourceUpdate {
        did_timing_change: true,
        start_time: Some(10.0),
        response_received_time: Some(20.0),
        end_time: Some(30.0),
        ..ResourceUpdate::new("1")
    });
    store.apply_update(&ResourceUpdate {
        did_timing_change: true,
        start_time: Some(0.0),
        response_received_time: Some(-1.0),
        end_time: Some(45.0),
        ..ResourceUpdate::new("1")
    });

    let state = store.get("1").unwrap();
    assert_eq!(state.start_time, Some(10.0));
    assert_eq!(state.response_received_time, Some(20.0));
    assert_eq!(state.end_time, Some(45.0));
}

#[test]
fn test_completion_evicts() {
    let mut store = ResourceStore::new();
    store.apply_update(&request_fragment("X", "http://a/"));
    assert!(store.get("X").is_some());

    let done = completion_fragment("X");
    store.apply_update(&done);
    assert!(store.maybe_evict(&done));
    assert!(store.get("X").is_none());
    assert!(!store.maybe_evict(&done));
}

#[test]
fn test_failed_completion_evicts() {
    let mut store = ResourceStore::new();
    store.apply_update(&request_fragment("X", "http://a/"));
    let failed = ResourceUpdate {
        did_completion_change: true,
        failed: true,
        ..ResourceUpdate::new("X")
    };
    assert!(store.maybe_evict(&failed));
    assert!(store.is_empty());
}

#[test]
fn test_non_completion_keeps_snapshot() {
    let mut store = ResourceStore::new();
    store.apply_update(&request_fragment("X", "http://a/"));

    // Completion flag without failed/finished is not the end
    let pending = ResourceUpdate {
        did_completion_change: true,
        ..ResourceUpdate::new("X")
    };
    assert!(!store.maybe_evict(&pending));

    // finished without the completion flag is ignored as well
    let stray = ResourceUpdate {
        finished: true,
        ..ResourceUpdate::new("X")
    };
    assert!(!store.maybe_evict(&stray));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_fragments_decode_from_json() {
    let json = r#"{
        "identifier": 42,
        "url": "http://example.com/",
        "didRequestChange": true,
        "requestHeaders": {"Cookie": "a=b"},
        "mainResource": true
    }"#;
    let update: ResourceUpdate = serde_json::from_str(json).unwrap();
    assert_eq!(update.identifier, "42");

    let mut store = ResourceStore::new();
    store.apply_update(&update);
    let state = store.get("42").unwrap();
    assert!(state.main_resource);
    assert_eq!(state.request_headers.get("cookie"), Some("a=b"));
}

fn start_record(id: &str, url: &str, time: f64) -> Record {
    Record::new(RecordType::ResourceSendRequest, time).with_data(RecordData::ResourceStart(
        ResourceStart {
            identifier: id.to_string(),
            url: url.to_string(),
            request_method: Some("GET".to_string()),
            is_main_resource: false,
        },
    ))
}

#[test]
fn test_timeline_records_build_snapshot() {
    let mut store = ResourceStore::new();
    store.on_request_start(&start_record("7", "http://example.com/app.js", 100.0));

    let response = Record::new(RecordType::ResourceReceiveResponse, 150.0).with_data(
        RecordData::ResourceResponse(ResourceResponse {
            identifier: "7".to_string(),
            status_code: Some(304),
            mime_type: Some("text/javascript".to_string()),
            expected_content_length: Some(2048),
        }),
    );
    store.on_response(&response);

    let finish = Record::new(RecordType::ResourceFinish, 180.0).with_data(
        RecordData::ResourceFinish(ResourceFinish {
            identifier: "7".to_string(),
            did_fail: false,
        }),
    );
    store.on_finish(&finish);

    let state = store.get("7").unwrap();
    assert_eq!(state.start_time, Some(100.0));
    assert_eq!(state.response_received_time, Some(150.0));
    assert_eq!(state.end_time, Some(180.0));
    assert_eq!(state.status_code, Some(304));
    assert_eq!(state.size(), Some(2048));
    assert!(!state.failed);
}

#[test]
fn test_redirect_replaces_snapshot() {
    let mut store = ResourceStore::new();
    store.on_request_start(&start_record("7", "http://example.com/old", 1.0));
    store.apply_update(&response_fragment("7", &[("Content-Type", "text/html")]));
    store.on_request_start(&start_record("7", "http://example.com/new", 2.0));

    let state = store.get("7").unwrap();
    assert_eq!(state.url, "http://example.com/new");
    assert!(state.response_headers.is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_response_for_unknown_resource_is_ignored() {
    let mut store = ResourceStore::new();
    let finish = Record::new(RecordType::ResourceFinish, 5.0).with_data(
        RecordData::ResourceFinish(ResourceFinish {
            identifier: "nope".to_string(),
            did_fail: true,
        }),
    );
    store.on_finish(&finish);
    assert!(store.is_empty());
}

#[test]
fn test_size_prefers_content_length() {
    let mut state = ResourceState::new("1", "http://a/");
    assert_eq!(state.size(), None);
    state.expected_content_length = Some(-1);
    assert_eq!(state.size(), None);
    state.expected_content_length = Some(500);
    assert_eq!(state.size(), Some(500));
    state.content_length = Some(700);
    assert_eq!(state.size(), Some(700));
}

#[test]
fn test_empty_response_headers_fallback() {
    let state = ResourceState::new("1", "http://a/");
    assert!(state.response_headers_or_empty().is_empty());
    assert_eq!(state.status_or_unknown(), -1);
    assert_eq!(state.resource_type(), ResourceType::Other);

    let mut with_headers = state.clone();
    with_headers.response_headers = Some(HeaderMap::new());
    assert_eq!(with_headers.resource_type(), ResourceType::Other);
}

#[test]
fn test_clear() {
    let mut store = ResourceStore::new();
    store.apply_update(&request_fragment("1", "http://a/"));
    store.apply_update(&request_fragment("2", "http://b/"));
    assert_eq!(store.len(), 2);
    assert_eq!(store.iter().count(), 2);
    store.clear();
    assert!(store.is_empty());
}

#[test]
fn test_forget() {
    let mut store = ResourceStore::new();
    store.apply_update(&request_fragment("1", "http://a/"));
    store.apply_update(&request_fragment("2", "http://b/"));

    assert!(store.forget("1"));
    assert!(store.get("1").is_none());
    assert!(store.get("2").is_some());
    // Unknown identifiers are a no-op
    assert!(!store.forget("1"));
    assert_eq!(store.len(), 1);
}
