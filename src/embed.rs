//! Embedding capability: the trait the semantic chunker depends on, and the
//! OpenAI-compatible HTTP implementation of it.
//!
//! The chunker never talks to a provider directly; it takes an
//! `Arc<dyn Embedder>` at construction. That keeps the boundary-detection
//! logic testable offline (see [`MockEmbedder`]) and keeps credentials out
//! of the chunking core.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Default request timeout for the embeddings endpoint.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A batched text-embedding capability.
///
/// Implementations must embed every input in a single provider round trip;
/// the semantic chunker relies on that to bound external calls to one per
/// request.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed every text, returning one vector per input, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Embedding client for the OpenAI `/v1/embeddings` API.
///
/// The API key is read from process configuration once at startup and held
/// here for the life of the process; it is never re-read per request.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiEmbedder {
    /// Create a new client.
    ///
    /// `base_url` is the provider root (e.g. `https://api.openai.com`);
    /// the `/v1/embeddings` path is appended per request.
    #[must_use]
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        let client = reqwest::ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            api_key,
            model,
            base_url,
        }
    }

    /// The configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Newlines confuse some embedding models; the provider docs recommend
/// replacing them with spaces before embedding.
fn sanitize(texts: &[String]) -> Vec<String> {
    texts.iter().map(|t| t.replace('\n', " ")).collect()
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(count = texts.len(), model = %self.model, "requesting embeddings");

        let url = format!("{}/v1/embeddings", self.base_url);
        let request = EmbeddingsRequest {
            model: &self.model,
            input: sanitize(texts),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Embedding(format!(
                "provider returned HTTP {}",
                response.status()
            )));
        }

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("malformed response: {e}")))?;

        let mut data = body.data;
        data.sort_by_key(|d| d.index);

        if data.len() != texts.len() {
            return Err(Error::EmbeddingCount {
                expected: texts.len(),
                actual: data.len(),
            });
        }

        let expected_dim = data[0].embedding.len();
        for entry in &data {
            if entry.embedding.len() != expected_dim {
                return Err(Error::DimensionMismatch {
                    expected: expected_dim,
                    actual: entry.embedding.len(),
                });
            }
        }

        debug!(
            count = data.len(),
            dimension = expected_dim,
            "embeddings received"
        );

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Deterministic embedder for tests and offline experimentation.
///
/// Derives each vector from the input text via a caller-supplied function
/// and counts provider round trips, so tests can assert both boundary
/// placement and call budgets.
pub struct MockEmbedder {
    vector_for: Box<dyn Fn(&str) -> Vec<f32> + Send + Sync>,
    calls: AtomicUsize,
}

impl MockEmbedder {
    /// Create a mock that maps each text through `vector_for`.
    pub fn new(vector_for: impl Fn(&str) -> Vec<f32> + Send + Sync + 'static) -> Self {
        Self {
            vector_for: Box::new(vector_for),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many batch calls have been made.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| (self.vector_for)(t)).collect())
    }
}

/// Embedder that always fails, for exercising provider-outage handling.
#[derive(Debug, Clone, Copy)]
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::Embedding("provider unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_the_wire_format() {
        let request = EmbeddingsRequest {
            model: "text-embedding-3-large",
            input: vec!["hello".to_string()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "text-embedding-3-large");
        assert_eq!(json["input"][0], "hello");
    }

    #[test]
    fn response_parsing_extracts_vectors() {
        let body = r#"{"data":[{"index":0,"embedding":[0.1,0.2]},{"index":1,"embedding":[0.3,0.4]}]}"#;
        let parsed: EmbeddingsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[1].embedding, vec![0.3, 0.4]);
    }

    #[test]
    fn sanitize_replaces_newlines() {
        let texts = vec!["line one\nline two".to_string(), "clean".to_string()];
        assert_eq!(sanitize(&texts), vec!["line one line two", "clean"]);
    }

    #[tokio::test]
    async fn mock_embedder_is_deterministic_and_counts_calls() {
        let mock = MockEmbedder::new(|t| vec![t.len() as f32]);
        let texts = vec!["ab".to_string(), "abcd".to_string()];

        let first = mock.embed_batch(&texts).await.unwrap();
        let second = mock.embed_batch(&texts).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, vec![vec![2.0], vec![4.0]]);
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn failing_embedder_reports_embedding_error() {
        let err = FailingEmbedder
            .embed_batch(&["x".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }
}
