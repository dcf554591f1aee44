//! End-to-end tests for the HTTP surface.
//!
//! The routes are exercised against an in-process server with a
//! deterministic embedder, so nothing here touches the network.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;

use chunkd::{create_routes, AppState, Config, Embedder, FailingEmbedder, MockEmbedder};

fn server_with(embedder: Arc<dyn Embedder>) -> TestServer {
    let config = Config::new("test-key".to_string());
    let state = AppState::new(&config, embedder).unwrap();
    TestServer::new(create_routes(state)).unwrap()
}

fn mock_embedder() -> Arc<MockEmbedder> {
    Arc::new(MockEmbedder::new(|t: &str| {
        if t.contains("alpha") {
            vec![1.0, 0.0]
        } else {
            vec![0.0, 1.0]
        }
    }))
}

fn upload(content: &str) -> MultipartForm {
    let part = Part::bytes(content.as_bytes().to_vec())
        .file_name("doc.txt")
        .mime_type("text/plain");
    MultipartForm::new().add_part("file", part)
}

#[tokio::test]
async fn rtc_returns_ordered_chunk_strings() {
    let server = server_with(mock_embedder());
    let document = "First sentence here. Second sentence there. Third one too.";

    let response = server.post("/rtc").multipart(upload(document)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let chunks: Vec<String> = response.json();
    // Short document, default 1000-char budget: a single chunk.
    assert_eq!(chunks, vec![document.to_string()]);
}

#[tokio::test]
async fn rtc_splits_long_documents() {
    let server = server_with(mock_embedder());
    let document = "A sentence that repeats itself endlessly. ".repeat(60);

    let response = server.post("/rtc").multipart(upload(&document)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let chunks: Vec<String> = response.json();
    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 1000);
    }
}

#[tokio::test]
async fn rtc_without_file_field_is_400() {
    let server = server_with(mock_embedder());
    let form = MultipartForm::new().add_text("other", "not a file");

    let response = server.post("/rtc").multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No file part");
}

#[tokio::test]
async fn rtc_with_unnamed_upload_is_400() {
    let server = server_with(mock_embedder());
    // A `file` field with no filename: nothing was actually selected.
    let form = MultipartForm::new().add_text("file", "some text");

    let response = server.post("/rtc").multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No file selected");
}

#[tokio::test]
async fn rtc_with_invalid_utf8_is_400() {
    let server = server_with(mock_embedder());
    let part = Part::bytes(vec![0xff, 0xfe, 0xfd])
        .file_name("doc.txt")
        .mime_type("application/octet-stream");
    let form = MultipartForm::new().add_part("file", part);

    let response = server.post("/rtc").multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "File is not valid UTF-8");
}

#[tokio::test]
async fn semantic_returns_complete_chunking() {
    let server = server_with(mock_embedder());
    let document = "Alpha topic sentence. More alpha content. Omega topic sentence.";

    let response = server.post("/semantic").multipart(upload(document)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let chunks: Vec<String> = response.json();
    assert!(!chunks.is_empty());
    let rebuilt: String = chunks.concat();
    assert_eq!(rebuilt, document);
}

#[tokio::test]
async fn semantic_error_shape_matches_rtc() {
    let server = server_with(mock_embedder());
    let form = MultipartForm::new().add_text("other", "not a file");

    let response = server.post("/semantic").multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No file part");
}

#[tokio::test]
async fn semantic_single_sentence_never_calls_the_provider() {
    let embedder = mock_embedder();
    let server = server_with(embedder.clone());

    let response = server
        .post("/semantic")
        .multipart(upload("Just the one sentence."))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let chunks: Vec<String> = response.json();
    assert_eq!(chunks, vec!["Just the one sentence.".to_string()]);
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn semantic_provider_failure_is_502_not_empty_success() {
    let server = server_with(Arc::new(FailingEmbedder));

    let response = server
        .post("/semantic")
        .multipart(upload("First sentence. Second sentence."))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("embedding"));
}

#[tokio::test]
async fn health_answers_without_touching_the_provider() {
    let embedder = mock_embedder();
    let server = server_with(embedder.clone());

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(embedder.calls(), 0);
}
