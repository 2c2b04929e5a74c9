//! Mock PostgREST endpoints for the snippet table

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// A stored snippet row as PostgREST returns it
pub fn snippet_row() -> Value {
    json!({
        "id": SNIPPET_ID,
        "code": SNIPPET_CODE,
        "language": SNIPPET_LANGUAGE,
        "created_at": CREATED_AT,
    })
}

/// Accept inserts and echo the stored row back
pub async fn mock_insert(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([snippet_row()])))
        .mount(server)
        .await;
}

/// Fail the first `fail_count` inserts with 503, then accept
pub async fn mock_flaky_insert(server: &MockServer, fail_count: u64) {
    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .up_to_n_times(fail_count)
        .mount(server)
        .await;

    mock_insert(server).await;
}

/// Serve the snippet row for single-object reads of `SNIPPET_ID`
pub async fn mock_fetch(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(query_param("id", format!("eq.{}", SNIPPET_ID)))
        .and(header("accept", "application/vnd.pgrst.object+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snippet_row()))
        .mount(server)
        .await;
}

/// Answer every read the way PostgREST does when no row matches
pub async fn mock_fetch_missing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(406).set_body_json(json!({
            "code": "PGRST116",
            "message": "JSON object requested, multiple (or no) rows returned",
        })))
        .mount(server)
        .await;
}

/// Answer every request to the table with `status`
pub async fn mock_status(server: &MockServer, status: u16, body: Value) {
    Mock::given(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer inserts only after `delay`
pub async fn mock_slow_insert(server: &MockServer, delay: Duration) {
    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([snippet_row()]))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}
