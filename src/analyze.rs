//! Post-chunking analysis and debug artifacts.
//!
//! Both routes run their output through [`analyze_chunks`] so operators get
//! size statistics in the logs; the HTTP response never includes them. The
//! debug dump is a single overwritten file for poking at chunker output
//! locally. Not atomic, not safe under concurrent writers.

use std::path::Path;

use tracing::info;

use crate::{Chunk, Result};

/// Which unit chunk sizes are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    /// Unicode scalar values.
    Characters,
    /// Whitespace-separated tokens.
    Tokens,
}

impl SizeUnit {
    fn measure(self, text: &str) -> usize {
        match self {
            Self::Characters => text.chars().count(),
            Self::Tokens => text.split_whitespace().count(),
        }
    }
}

/// Summary statistics over a chunk sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkStats {
    /// Number of chunks.
    pub count: usize,
    /// Smallest chunk size, in the requested unit.
    pub min: usize,
    /// Largest chunk size, in the requested unit.
    pub max: usize,
    /// Mean chunk size, in the requested unit.
    pub mean: usize,
}

/// Compute and log size statistics for a chunk sequence.
///
/// The return value is informational; callers that only want the log line
/// can ignore it.
pub fn analyze_chunks(chunks: &[Chunk], unit: SizeUnit) -> ChunkStats {
    let sizes: Vec<usize> = chunks.iter().map(|c| unit.measure(&c.text)).collect();

    let stats = ChunkStats {
        count: sizes.len(),
        min: sizes.iter().copied().min().unwrap_or(0),
        max: sizes.iter().copied().max().unwrap_or(0),
        mean: if sizes.is_empty() {
            0
        } else {
            sizes.iter().sum::<usize>() / sizes.len()
        },
    };

    info!(
        count = stats.count,
        min = stats.min,
        max = stats.max,
        mean = stats.mean,
        unit = ?unit,
        "chunk statistics"
    );

    stats
}

/// Overwrite `path` with `{"content": [...]}` for the given chunks.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn dump_chunks(path: &Path, chunks: &[Chunk]) -> Result<()> {
    let content: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    let payload = serde_json::json!({ "content": content });
    std::fs::write(path, serde_json::to_vec_pretty(&payload)?)?;
    Ok(())
}
