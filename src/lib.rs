//! # chunkd
//!
//! A document chunking service for retrieval-augmented generation (RAG)
//! pipelines: upload a text document, get back an ordered list of chunks
//! sized for embedding and retrieval.
//!
//! ## The Problem
//!
//! Language models have context windows. Documents don't fit. Retrieval
//! pipelines need documents split into pieces small enough to embed but
//! large enough to keep their meaning, and where you cut matters. A
//! paragraph boundary beats a sentence boundary, which beats a word
//! boundary, which beats slicing a word in half.
//!
//! ## Two Strategies
//!
//! ### Recursive (`/rtc`)
//!
//! Deterministic splitting through a separator hierarchy:
//!
//! ```text
//! Separators: ["\n\n", "\n", ".", "?", "!", " ", ""]
//!
//! 1. Split on "\n\n" (paragraphs)
//! 2. Any piece over budget? Split that piece on "\n" (lines)
//! 3. Still over? Sentence punctuation, then words
//! 4. Last resort: "" splits into characters, so progress is guaranteed
//! ```
//!
//! Pieces are merged back into chunks of at most `chunk_size` length units,
//! and the tail of each chunk (up to `chunk_overlap` units) is repeated at
//! the start of the next one so context survives the cut.
//!
//! **When to use**: general-purpose, mixed content, when you need a hard
//! size bound.
//!
//! ### Semantic (`/semantic`)
//!
//! Embedding-driven splitting: segment into sentence-like units, embed each
//! unit's context window in one batched provider call, and cut where the
//! similarity between neighbors drops.
//!
//! ```text
//! Units:        [U1] [U2] [U3] [U4] [U5]
//! Similarities:    0.9  0.85  0.3  0.8
//!                             ↑
//!                        topic shift → boundary
//! ```
//!
//! `min_chunk_size` is a floor (boundaries before it are ignored),
//! `avg_chunk_size` a soft target; there is no hard maximum.
//!
//! **When to use**: topic coherence matters more than size uniformity, and
//! an embedding provider is available.
//!
//! ## Library Quick Start
//!
//! ```rust
//! use chunkd::RecursiveChunker;
//!
//! let chunker = RecursiveChunker::standard(100, 20).unwrap();
//! let chunks = chunker.chunk("First paragraph.\n\nSecond paragraph, a bit longer.");
//!
//! for chunk in &chunks {
//!     println!("[{}] {:?}", chunk.index, chunk.text);
//! }
//! ```
//!
//! The semantic chunker needs an [`Embedder`]; production code injects an
//! [`OpenAiEmbedder`], tests a [`MockEmbedder`].
//!
//! ## HTTP Surface
//!
//! | Route | Method | Body | Response |
//! |-------|--------|------|----------|
//! | `/rtc` | POST | multipart field `file` | JSON array of chunk strings |
//! | `/semantic` | POST | multipart field `file` | JSON array of chunk strings |
//! | `/health` | GET | none | `{"status":"ok", ...}` |
//!
//! Missing or unnamed uploads answer 400 with `{"error": ...}`; an embedding
//! provider failure answers 502 rather than a silently degraded result.

pub mod analyze;
pub mod chunk;
pub mod config;
pub mod embed;
pub mod error;
pub mod length;
pub mod recursive;
pub mod semantic;
pub mod sentence;
pub mod server;

pub use analyze::{analyze_chunks, dump_chunks, ChunkStats, SizeUnit};
pub use chunk::Chunk;
pub use config::Config;
pub use embed::{Embedder, FailingEmbedder, MockEmbedder, OpenAiEmbedder};
pub use error::{Error, Result};
pub use length::LengthFn;
pub use recursive::{RecursiveChunker, DEFAULT_SEPARATORS};
pub use semantic::{cosine_similarity, SemanticChunker};
pub use sentence::segment_units;
pub use server::{create_routes, AppState, Server};
