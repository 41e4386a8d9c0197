use super::*;
use axum::Router;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use std::sync::{Arc, Mutex};

type SeenFields = Arc<Mutex<Vec<Vec<(String, String)>>>>;

#[derive(Clone)]
struct Backend {
    status: StatusCode,
    body: &'static str,
    seen: SeenFields,
}

async fn process_form(State(backend): State<Backend>, mut multipart: Multipart) -> (StatusCode, &'static str) {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        let value = field.text().await.unwrap_or_default();
        fields.push((name, value));
    }
    backend.seen.lock().unwrap().push(fields);
    (backend.status, backend.body)
}

async fn spawn_backend(status: StatusCode, body: &'static str) -> (String, SeenFields) {
    let seen: SeenFields = Arc::new(Mutex::new(Vec::new()));
    let backend = Backend { status, body, seen: seen.clone() };
    let app = Router::new()
        .route(PROCESS_FORM_PATH, post(process_form))
        .with_state(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), seen)
}

// =============================================================
// endpoint
// =============================================================

#[test]
fn endpoint_appends_process_form() {
    assert_eq!(endpoint("http://localhost:5000"), "http://localhost:5000/process_form");
}

#[test]
fn endpoint_trims_trailing_slashes() {
    assert_eq!(endpoint("https://api.example.test/"), "https://api.example.test/process_form");
    assert_eq!(endpoint("https://api.example.test//"), "https://api.example.test/process_form");
}

// =============================================================
// parse_answer
// =============================================================

#[test]
fn parse_answer_reads_response_field() {
    assert_eq!(parse_answer(r#"{"response":"Yes, very much."}"#).unwrap(), "Yes, very much.");
}

#[test]
fn parse_answer_ignores_extra_fields() {
    assert_eq!(parse_answer(r#"{"response":"42","sources":[1,2]}"#).unwrap(), "42");
}

#[test]
fn parse_answer_missing_field_is_malformed() {
    let err = parse_answer(r#"{"answer":"42"}"#).unwrap_err();
    assert!(matches!(err, TransportError::MalformedBody(msg) if msg.contains("response")));
}

#[test]
fn parse_answer_non_string_field_is_malformed() {
    let err = parse_answer(r#"{"response":42}"#).unwrap_err();
    assert!(matches!(err, TransportError::MalformedBody(_)));
}

#[test]
fn parse_answer_null_field_is_malformed() {
    let err = parse_answer(r#"{"response":null}"#).unwrap_err();
    assert!(matches!(err, TransportError::MalformedBody(_)));
}

#[test]
fn parse_answer_keeps_unicode_and_escapes() {
    assert_eq!(parse_answer(r#"{"response":"Yes \u2014 \"very\" much."}"#).unwrap(), "Yes \u{2014} \"very\" much.");
}

#[test]
fn parse_answer_invalid_json_is_malformed() {
    let err = parse_answer("<html>oops</html>").unwrap_err();
    assert!(matches!(err, TransportError::MalformedBody(_)));
}

// =============================================================
// HttpTransport against a live backend
// =============================================================

#[tokio::test]
async fn http_transport_posts_single_query_field() {
    let (base_url, seen) = spawn_backend(StatusCode::OK, r#"{"response":"Yes, very much."}"#).await;
    let transport = HttpTransport::new(None).unwrap();

    let answer = transport
        .send(&base_url, &QueryPayload::new("Does the author like dogs?"))
        .await
        .unwrap();

    assert_eq!(answer, "Yes, very much.");
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], vec![("query".to_owned(), "Does the author like dogs?".to_owned())]);
}

#[tokio::test]
async fn http_transport_sends_empty_query() {
    let (base_url, seen) = spawn_backend(StatusCode::OK, r#"{"response":""}"#).await;
    let transport = HttpTransport::new(None).unwrap();

    let answer = transport.send(&base_url, &QueryPayload::new("")).await.unwrap();

    assert_eq!(answer, "");
    assert_eq!(seen.lock().unwrap()[0], vec![("query".to_owned(), String::new())]);
}

#[tokio::test]
async fn http_transport_tolerates_trailing_slash_in_base_url() {
    let (base_url, seen) = spawn_backend(StatusCode::OK, r#"{"response":"ok"}"#).await;
    let transport = HttpTransport::new(None).unwrap();

    let answer = transport
        .send(&format!("{base_url}/"), &QueryPayload::new("q"))
        .await
        .unwrap();

    assert_eq!(answer, "ok");
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn http_transport_maps_non_success_status() {
    let (base_url, _seen) = spawn_backend(StatusCode::BAD_REQUEST, r#"{"error":"query field is missing"}"#).await;
    let transport = HttpTransport::new(None).unwrap();

    let err = transport.send(&base_url, &QueryPayload::new("q")).await.unwrap_err();

    assert_eq!(
        err,
        TransportError::Status { status: 400, body: r#"{"error":"query field is missing"}"#.to_owned() }
    );
}

#[tokio::test]
async fn http_transport_maps_malformed_success_body() {
    let (base_url, _seen) = spawn_backend(StatusCode::OK, r#"{"unexpected":true}"#).await;
    let transport = HttpTransport::new(None).unwrap();

    let err = transport.send(&base_url, &QueryPayload::new("q")).await.unwrap_err();

    assert!(matches!(err, TransportError::MalformedBody(_)));
}

#[tokio::test]
async fn http_transport_maps_connection_refused_to_network() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let transport = HttpTransport::new(Some(Duration::from_secs(5))).unwrap();

    let err = transport
        .send(&format!("http://{addr}"), &QueryPayload::new("q"))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Network(_)));
}

#[tokio::test]
async fn http_transport_wrong_path_is_status_error() {
    let (base_url, seen) = spawn_backend(StatusCode::OK, r#"{"response":"ok"}"#).await;
    let transport = HttpTransport::new(None).unwrap();

    let err = transport
        .send(&format!("{base_url}/nested"), &QueryPayload::new("q"))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Status { status: 404, .. }));
    assert!(seen.lock().unwrap().is_empty());
}
