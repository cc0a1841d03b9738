#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::post,
};
use tempfile::TempDir;

use crate::{
    error::TripleStoreError, fetch_and_store_provenance, fetch_provenance, load_dataset,
};

struct StubEndpoint {
    status: StatusCode,
    body: &'static str,
    requests: Mutex<Vec<(HeaderMap, String)>>,
}

type StubResponse = (StatusCode, [(header::HeaderName, &'static str); 1], &'static str);

async fn answer(
    State(stub): State<Arc<StubEndpoint>>,
    headers: HeaderMap,
    body: String,
) -> StubResponse {
    stub.requests.lock().unwrap().push((headers, body));
    (
        stub.status,
        [(header::CONTENT_TYPE, "application/sparql-results+json")],
        stub.body,
    )
}

async fn spawn_endpoint(status: StatusCode, body: &'static str) -> (String, Arc<StubEndpoint>) {
    let stub = Arc::new(StubEndpoint {
        status,
        body,
        requests: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/sparql", post(answer))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/sparql"), stub)
}

const ONE_ROW: &str = r#"{
  "head": {"vars": ["s", "p", "o", "g"]},
  "results": {"bindings": [
    {
      "s": {"type": "uri", "value": "urn:a"},
      "p": {"type": "uri", "value": "urn:b"},
      "o": {"type": "literal", "value": "hello"},
      "g": {"type": "uri", "value": "urn:g1"}
    }
  ]}
}"#;

#[tokio::test]
async fn fetches_quads_from_endpoint() {
    let (endpoint, stub) = spawn_endpoint(StatusCode::OK, ONE_ROW).await;

    let dataset = fetch_provenance(&endpoint).await.unwrap();

    assert_eq!(dataset.len(), 1);
    let quad = dataset.iter().next().unwrap();
    assert_eq!(quad.subject.to_string(), "<urn:a>");
    assert_eq!(quad.predicate.to_string(), "<urn:b>");
    assert_eq!(quad.object.to_string(), "\"hello\"");
    assert_eq!(quad.graph_name.to_string(), "<urn:g1>");

    let requests = stub.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];
    assert_eq!(
        headers.get(header::ACCEPT).unwrap(),
        "application/sparql-results+json"
    );
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/sparql-query"
    );
    assert!(body.contains("http://www.w3.org/ns/prov#Entity"));
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let (endpoint, stub) =
        spawn_endpoint(StatusCode::INTERNAL_SERVER_ERROR, "backend exploded").await;

    let error = fetch_provenance(&endpoint).await.unwrap_err();

    match error {
        TripleStoreError::Backend { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "backend exploded");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(stub.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_fetch_writes_no_file() {
    let (endpoint, _stub) = spawn_endpoint(StatusCode::BAD_GATEWAY, "").await;
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("prov.json");

    let error = fetch_and_store_provenance(&path, &endpoint)
        .await
        .unwrap_err();

    assert!(matches!(error, TripleStoreError::Backend { status: 502, .. }));
    assert!(!path.exists());
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let (endpoint, _stub) = spawn_endpoint(StatusCode::OK, "<html>not json</html>").await;

    let error = fetch_provenance(&endpoint).await.unwrap_err();

    assert!(matches!(error, TripleStoreError::ParseError { .. }));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let error = fetch_provenance(&format!("http://{addr}/sparql"))
        .await
        .unwrap_err();

    assert!(matches!(error, TripleStoreError::Http(_)));
}

#[tokio::test]
async fn fetched_provenance_is_stored_as_json_ld() {
    let (endpoint, _stub) = spawn_endpoint(StatusCode::OK, ONE_ROW).await;
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("prov.json");

    fetch_and_store_provenance(&path, &endpoint).await.unwrap();

    let contents = tokio::fs::read_to_string(&path).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert!(parsed.is_array() || parsed.is_object());

    let reloaded = load_dataset(&path, None).await.unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(
        reloaded.iter().next().unwrap().graph_name.to_string(),
        "<urn:g1>"
    );
}
