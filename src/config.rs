//! Process configuration, assembled once at startup.
//!
//! Everything the server needs is resolved before it binds: the embedding
//! credential, chunker parameters, and the listen address. A missing
//! credential fails the process here rather than surfacing on the first
//! `/semantic` request.

use std::path::PathBuf;

use crate::{Error, Result};

/// Environment variable holding the embedding provider credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Server and chunker configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Embedding provider credential.
    pub api_key: String,
    /// Embedding model name.
    pub embedding_model: String,
    /// Embedding provider base URL.
    pub embedding_base_url: String,
    /// Maximum chunk size for the recursive route, in characters.
    pub chunk_size: usize,
    /// Overlap between adjacent recursive chunks, in characters.
    pub chunk_overlap: usize,
    /// Soft average chunk size for the semantic route, in characters.
    pub avg_chunk_size: usize,
    /// Minimum chunk size for the semantic route, in characters.
    pub min_chunk_size: usize,
    /// Optional path for the debug chunk dump, overwritten each request.
    pub debug_dump: Option<PathBuf>,
    /// Maximum accepted request body size in bytes.
    pub max_request_size: usize,
}

impl Config {
    /// Configuration with service defaults and the given credential.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            api_key,
            embedding_model: "text-embedding-3-large".to_string(),
            embedding_base_url: "https://api.openai.com".to_string(),
            chunk_size: 1000,
            chunk_overlap: 400,
            avg_chunk_size: 600,
            min_chunk_size: 400,
            debug_dump: None,
            max_request_size: 10 * 1024 * 1024,
        }
    }

    /// Read the embedding credential from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] if the variable is absent, so startup
    /// fails before the semantic route could ever hit the gap at request
    /// time.
    pub fn api_key_from_env() -> Result<String> {
        std::env::var(API_KEY_ENV).map_err(|_| Error::MissingConfig(API_KEY_ENV))
    }
}
