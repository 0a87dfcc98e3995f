//! HTTP-level tests driving the receiver router directly.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use doorky_receiver::{ReceiverConfig, ReceiverService};
use doorky_timeseries::{
    Column, ColumnStore, ColumnStoreError, ConsistencyLevel, InMemoryColumnStore, KeyRange,
    KeySlice, SlicePredicate, TimeseriesApi, TimeseriesService,
};
use doorky_verifier::{sign_update, DerivedKey, RawUpdateFields};
use tower::ServiceExt;

const CONFIG: &str = r#"
    primary_door = "front"

    [database]
    timeout_ms = 200

    [[door]]
    name = "front"
    location = "Main entrance"
    secret = "front-secret"

    [[door]]
    name = "back"
    location = "Yard"
    secret = "back-secret"

    [spaceapi]
    api = "0.13"
    space = "Test Space"
    logo = "https://example.org/logo.png"
    url = "https://example.org"

    [spaceapi.location]
    lat = 47.0
    lon = 8.0

    [spaceapi.contact]
    email = "info@example.org"
"#;

fn config() -> ReceiverConfig {
    ReceiverConfig::parse(CONFIG).unwrap()
}

fn signed_fields(door: &str, secret: &str, val: &str, ts: &str) -> RawUpdateFields {
    sign_update(&DerivedKey::derive(secret.as_bytes()), door, val, ts, &[0x42; 16])
        .unwrap()
        .into_fields(door, val, ts)
}

fn status_uri(fields: &RawUpdateFields) -> String {
    format!(
        "/api/doorstatus?door={}&val={}&ts={}&hash={}&iv={}",
        fields.door, fields.val, fields.ts, fields.hash, fields.iv
    )
}

async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn metrics(router: &Router) -> serde_json::Value {
    let (status, body) = get(router, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

/// Store whose reads fail for one door.
struct FailingDoorStore {
    inner: InMemoryColumnStore,
    failing: &'static str,
}

impl ColumnStore for FailingDoorStore {
    fn insert(
        &self,
        column_family: &str,
        row_key: &[u8],
        column: Column,
        consistency: ConsistencyLevel,
    ) -> Result<(), ColumnStoreError> {
        self.inner.insert(column_family, row_key, column, consistency)
    }

    fn get_range_slices(
        &self,
        column_family: &str,
        predicate: &SlicePredicate,
        range: &KeyRange,
        consistency: ConsistencyLevel,
    ) -> Result<Vec<KeySlice>, ColumnStoreError> {
        if predicate.matches(self.failing.as_bytes()) {
            return Err(ColumnStoreError::Io {
                message: "connection reset".into(),
            });
        }
        self.inner
            .get_range_slices(column_family, predicate, range, consistency)
    }
}

/// Store that never answers within the receiver's timeout.
struct SlowStore;

impl ColumnStore for SlowStore {
    fn insert(
        &self,
        _column_family: &str,
        _row_key: &[u8],
        _column: Column,
        _consistency: ConsistencyLevel,
    ) -> Result<(), ColumnStoreError> {
        thread::sleep(Duration::from_millis(1000));
        Ok(())
    }

    fn get_range_slices(
        &self,
        _column_family: &str,
        _predicate: &SlicePredicate,
        _range: &KeyRange,
        _consistency: ConsistencyLevel,
    ) -> Result<Vec<KeySlice>, ColumnStoreError> {
        thread::sleep(Duration::from_millis(1000));
        Ok(Vec::new())
    }
}

fn router_with<S: ColumnStore + 'static>(store: S) -> Router {
    ReceiverService::with_store(&config(), store)
        .unwrap()
        .router()
}

#[tokio::test]
async fn test_valid_update_is_stored() {
    let store = Arc::new(InMemoryColumnStore::new());
    let router = router_with(Arc::clone(&store));

    let fields = signed_fields("front", "front-secret", "true", "1000");
    let (status, body) = get(&router, &status_uri(&fields)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let reading = TimeseriesService::new(store).last_value("front").unwrap();
    assert_eq!(reading.timestamp_micros, 1_000_000_000);
    assert!(reading.open);

    assert_eq!(metrics(&router).await["updates-accepted"], 1);
}

#[tokio::test]
async fn test_status_mapping_per_rejection() {
    let router = router_with(InMemoryColumnStore::new());
    let valid = signed_fields("front", "front-secret", "true", "1000");

    let mut bad_value = valid.clone();
    bad_value.val = "maybe".into();

    let mut bad_iv = valid.clone();
    bad_iv.iv = "abcd".into();

    let mut tampered = valid.clone();
    tampered.ts = "1001".into();

    let unknown = signed_fields("side", "whatever", "true", "1000");
    let wrong_secret = signed_fields("front", "back-secret", "true", "1000");

    let cases = [
        (status_uri(&bad_value), StatusCode::BAD_REQUEST),
        (status_uri(&bad_iv), StatusCode::BAD_REQUEST),
        (status_uri(&unknown), StatusCode::NOT_FOUND),
        (status_uri(&tampered), StatusCode::FORBIDDEN),
        (status_uri(&wrong_secret), StatusCode::FORBIDDEN),
        (
            "/api/doorstatus?door=fr%3Bont&val=1&ts=1&hash=&iv=".to_string(),
            StatusCode::BAD_REQUEST,
        ),
        (
            "/api/doorstatus?door=front&val=1&ts=soon&hash=&iv=".to_string(),
            StatusCode::BAD_REQUEST,
        ),
        (
            "/api/doorstatus?door=front&val=1&ts=1&hash=short&iv=".to_string(),
            StatusCode::BAD_REQUEST,
        ),
    ];

    for (uri, expected_status) in &cases {
        let (status, _) = get(&router, uri).await;
        assert_eq!(status, *expected_status, "{uri}");
    }

    let counters = metrics(&router).await;
    assert_eq!(counters["unparseable-value"], 1);
    assert_eq!(counters["invalid-iv"], 1);
    assert_eq!(counters["unknown-door"], 1);
    assert_eq!(counters["hash-verification-failed"], 2);
    assert_eq!(counters["invalid-door-name"], 1);
    assert_eq!(counters["unparseable-timestamp"], 1);
    assert_eq!(counters["unparseable-hash"], 1);
    assert_eq!(counters["updates-accepted"], 0);
}

#[tokio::test]
async fn test_pre_epoch_update_never_shadows_later_ones() {
    let store = Arc::new(InMemoryColumnStore::new());
    let router = router_with(Arc::clone(&store));

    for ts in ["0", "-5"] {
        let fields = signed_fields("front", "front-secret", "true", ts);
        let (status, _) = get(&router, &status_uri(&fields)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "ts={ts}");
    }
    let fields = signed_fields("front", "front-secret", "false", "1700000000");
    assert_eq!(get(&router, &status_uri(&fields)).await.0, StatusCode::OK);

    let reading = TimeseriesService::new(store).last_value("front").unwrap();
    assert_eq!(reading.timestamp_micros, 1_700_000_000_000_000);
    assert!(!reading.open);
    assert_eq!(metrics(&router).await["timestamp-out-of-range"], 2);
}

#[tokio::test]
async fn test_rejection_body_is_status_text() {
    let router = router_with(InMemoryColumnStore::new());
    let unknown = signed_fields("side", "whatever", "true", "1000");

    let (status, body) = get(&router, &status_uri(&unknown)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not Found");
}

#[tokio::test]
async fn test_malformed_query_counted() {
    let router = router_with(InMemoryColumnStore::new());

    let (status, _) = get(&router, "/api/doorstatus?door=front&door=back").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(metrics(&router).await["malformed-request"], 1);
}

#[tokio::test]
async fn test_tampered_update_writes_nothing() {
    let store = Arc::new(InMemoryColumnStore::new());
    let router = router_with(Arc::clone(&store));

    let mut fields = signed_fields("front", "front-secret", "true", "1000");
    fields.val = "1".into();
    let (status, _) = get(&router, &status_uri(&fields)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(store.row_count(doorky_timeseries::TIMESERIES_CF), 0);
}

#[tokio::test]
async fn test_store_timeout_is_internal_error() {
    let router = router_with(SlowStore);
    let fields = signed_fields("front", "front-secret", "false", "1000");

    let (status, body) = get(&router, &status_uri(&fields)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal Server Error");
    assert_eq!(metrics(&router).await["insert-error"], 1);
}

#[tokio::test]
async fn test_spaceapi_reports_primary_door() {
    let router = router_with(InMemoryColumnStore::new());

    for (door, secret, val, ts) in [
        ("front", "front-secret", "true", "1000"),
        ("front", "front-secret", "false", "900"),
        ("back", "back-secret", "false", "2000"),
    ] {
        let (status, _) = get(&router, &status_uri(&signed_fields(door, secret, val, ts))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get(&router, "/api/spaceapi").await;
    assert_eq!(status, StatusCode::OK);

    let doc: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(doc["space"], "Test Space");
    assert_eq!(doc["state"]["open"], true);
    assert_eq!(doc["state"]["lastchange"], 1000);

    let sensors = doc["sensors"]["door_locked"].as_array().unwrap();
    assert_eq!(sensors.len(), 2);
    assert_eq!(sensors[0]["name"], "front");
    assert_eq!(sensors[0]["value"], false);
    assert_eq!(sensors[0]["location"], "Main entrance");
    assert_eq!(sensors[1]["name"], "back");
    assert_eq!(sensors[1]["value"], true);

    assert_eq!(metrics(&router).await["spaceapi-requests"], 1);
}

#[tokio::test]
async fn test_spaceapi_skips_failing_doors() {
    let router = router_with(FailingDoorStore {
        inner: InMemoryColumnStore::new(),
        failing: "back",
    });

    let fields = signed_fields("front", "front-secret", "false", "1500");
    assert_eq!(get(&router, &status_uri(&fields)).await.0, StatusCode::OK);

    let (status, body) = get(&router, "/api/spaceapi").await;
    assert_eq!(status, StatusCode::OK);

    let doc: serde_json::Value = serde_json::from_str(&body).unwrap();
    let sensors = doc["sensors"]["door_locked"].as_array().unwrap();
    assert_eq!(sensors.len(), 1);
    assert_eq!(sensors[0]["name"], "front");
    assert_eq!(doc["state"]["open"], false);

    assert_eq!(metrics(&router).await["spaceapi-door-errors"], 1);
}

#[tokio::test]
async fn test_spaceapi_without_readings() {
    let router = router_with(InMemoryColumnStore::new());

    let (status, body) = get(&router, "/api/spaceapi").await;
    assert_eq!(status, StatusCode::OK);

    let doc: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(doc["state"]["open"].is_null());
    assert!(doc.get("sensors").is_none());
    assert_eq!(metrics(&router).await["spaceapi-door-errors"], 2);
}

#[tokio::test]
async fn test_spaceapi_not_mounted_without_config() {
    let config = ReceiverConfig::parse(
        r#"
        [[door]]
        name = "front"
        secret = "front-secret"
        "#,
    )
    .unwrap();
    let router = ReceiverService::with_store(&config, InMemoryColumnStore::new())
        .unwrap()
        .router();

    let (status, _) = get(&router, "/api/spaceapi").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let router = router_with(InMemoryColumnStore::new());
    let (status, body) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("healthy"));
}
