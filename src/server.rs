//! HTTP surface: routes, handlers, and error mapping.
//!
//! The handlers are a thin layer over the chunking cores: read the uploaded
//! document out of the multipart form, run exactly one chunker, answer with
//! the chunk strings as a JSON array. All failure paths answer with
//! `{"error": "<message>"}` and a status that distinguishes caller mistakes
//! (400) from upstream provider failures (502). No partial results: a
//! request yields the complete ordered chunk list or an error.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::analyze::{analyze_chunks, dump_chunks, SizeUnit};
use crate::config::Config;
use crate::embed::Embedder;
use crate::recursive::RecursiveChunker;
use crate::semantic::SemanticChunker;
use crate::{Chunk, Error, Result};

/// Shared application state, built once at startup.
///
/// Chunkers are constructed here so invalid parameter combinations fail the
/// process before it accepts requests.
#[derive(Clone)]
pub struct AppState {
    recursive: Arc<RecursiveChunker>,
    semantic: Arc<SemanticChunker>,
    debug_dump: Option<PathBuf>,
}

impl AppState {
    /// Build the state from configuration and an embedding capability.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the chunker parameters are invalid.
    pub fn new(config: &Config, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let recursive = RecursiveChunker::standard(config.chunk_size, config.chunk_overlap)?;
        let semantic =
            SemanticChunker::new(config.avg_chunk_size, config.min_chunk_size, embedder)?;

        Ok(Self {
            recursive: Arc::new(recursive),
            semantic: Arc::new(semantic),
            debug_dump: config.debug_dump.clone(),
        })
    }
}

/// Build the service router.
#[must_use]
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/rtc", post(handle_rtc))
        .route("/semantic", post(handle_semantic))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// The chunking HTTP server.
pub struct Server {
    config: Config,
    app: Router,
}

impl Server {
    /// Create a server from configuration and an embedding capability.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the chunker parameters are invalid.
    pub fn new(config: Config, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let state = AppState::new(&config, embedder)?;

        let app = create_routes(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(RequestBodyLimitLayer::new(config.max_request_size)),
            )
            .layer(DefaultBodyLimit::max(config.max_request_size));

        Ok(Self { config, app })
    }

    /// Bind and serve until the process is stopped.
    ///
    /// # Errors
    ///
    /// Returns an IO error if binding or serving fails.
    pub async fn start(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        tracing::info!("listening on {addr}");

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, self.app).await?;

        Ok(())
    }
}

/// Errors surfaced to HTTP callers, with their status mapping.
#[derive(Debug)]
enum ApiError {
    /// The multipart form had no `file` field.
    NoFilePart,
    /// The `file` field carried no filename.
    NoFileSelected,
    /// The request was malformed in some other way.
    BadRequest(String),
    /// The embedding provider failed.
    Upstream(String),
    /// Something on our side broke.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NoFilePart => (StatusCode::BAD_REQUEST, "No file part".to_string()),
            Self::NoFileSelected => (StatusCode::BAD_REQUEST, "No file selected".to_string()),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Upstream(message) => (StatusCode::BAD_GATEWAY, message),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Pull the uploaded document out of the multipart form.
///
/// Fields other than `file` are ignored; only the `file` part is read.
async fn read_document(mut multipart: Multipart) -> std::result::Result<String, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if field.file_name().map_or(true, str::is_empty) {
            return Err(ApiError::NoFileSelected);
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        return String::from_utf8(bytes.to_vec())
            .map_err(|_| ApiError::BadRequest("File is not valid UTF-8".to_string()));
    }

    Err(ApiError::NoFilePart)
}

fn finish(state: &AppState, chunks: Vec<Chunk>, unit: SizeUnit) -> Json<Vec<String>> {
    analyze_chunks(&chunks, unit);

    if let Some(path) = &state.debug_dump {
        if let Err(e) = dump_chunks(path, &chunks) {
            warn!("debug dump failed: {e}");
        }
    }

    Json(chunks.into_iter().map(|c| c.text).collect())
}

async fn handle_rtc(
    State(state): State<AppState>,
    multipart: Multipart,
) -> std::result::Result<Json<Vec<String>>, ApiError> {
    let document = read_document(multipart).await?;
    let chunks = state.recursive.chunk(&document);
    Ok(finish(&state, chunks, SizeUnit::Characters))
}

async fn handle_semantic(
    State(state): State<AppState>,
    multipart: Multipart,
) -> std::result::Result<Json<Vec<String>>, ApiError> {
    let document = read_document(multipart).await?;

    let chunks = state.semantic.chunk(&document).await.map_err(|e| match e {
        Error::Embedding(_) | Error::EmbeddingCount { .. } | Error::DimensionMismatch { .. } => {
            error!("embedding failure: {e}");
            ApiError::Upstream(e.to_string())
        }
        other => {
            error!("semantic chunking failed: {other}");
            ApiError::Internal(other.to_string())
        }
    })?;

    Ok(finish(&state, chunks, SizeUnit::Characters))
}

async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
