//! Semantic chunking using embedding similarity.
//!
//! Splits text where the topic changes, detected by drops in the similarity
//! of adjacent sentence embeddings.
//!
//! ## The idea
//!
//! Adjacent sentences about the same topic have similar embeddings. When the
//! topic shifts, similarity drops. We split there.
//!
//! ```text
//! Units:        [U1] [U2] [U3] [U4] [U5]
//! Similarities:    0.9  0.85  0.3  0.8
//!                             ↑
//!                        topic shift
//!
//! Chunks: [U1 U2 U3] | [U4 U5]
//! ```
//!
//! ## Size targets
//!
//! Two knobs shape the output:
//!
//! - `avg_chunk_size` is a soft target. With no fixed threshold configured,
//!   the chunker derives how many boundaries to honor from it: the k
//!   lowest-similarity adjacencies where `k = ceil(len / avg) - 1`.
//! - `min_chunk_size` is a floor. A boundary is ignored until the current
//!   chunk has reached it, and a trailing runt is absorbed into the previous
//!   chunk. There is no hard maximum; topic coherence wins over uniformity.
//!
//! ## Cost
//!
//! All context windows for a document are embedded in a single batched
//! provider call, so each request costs exactly one upstream round trip
//! regardless of document length. A document with fewer than two units
//! never touches the provider at all.

use std::collections::HashSet;
use std::sync::Arc;

use crate::embed::Embedder;
use crate::length::{char_count, LengthFn};
use crate::sentence::{segment_units, Unit};
use crate::{Chunk, Error, Result};

/// Semantic boundary chunker.
///
/// Groups sentence-like units into chunks at embedding-similarity
/// discontinuities, subject to minimum/average size targets. The embedding
/// capability is injected, so tests can substitute a deterministic fake.
///
/// ## Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use chunkd::{OpenAiEmbedder, SemanticChunker};
///
/// # async fn example() -> chunkd::Result<()> {
/// let embedder = Arc::new(OpenAiEmbedder::new(
///     "sk-...".into(),
///     "text-embedding-3-large".into(),
///     "https://api.openai.com".into(),
/// ));
/// let chunker = SemanticChunker::new(600, 400, embedder)?;
/// let chunks = chunker.chunk("A document with several sentences...").await?;
/// # Ok(())
/// # }
/// ```
pub struct SemanticChunker {
    avg_chunk_size: usize,
    min_chunk_size: usize,
    context_window: usize,
    threshold: Option<f32>,
    length: LengthFn,
    embedder: Arc<dyn Embedder>,
}

impl SemanticChunker {
    /// Create a new semantic chunker.
    ///
    /// # Arguments
    ///
    /// * `avg_chunk_size` - Soft target chunk size in length units
    /// * `min_chunk_size` - Floor below which boundaries are not honored
    /// * `embedder` - The embedding capability
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `avg_chunk_size == 0` and
    /// [`Error::MinExceedsAvg`] if `min_chunk_size > avg_chunk_size`.
    pub fn new(
        avg_chunk_size: usize,
        min_chunk_size: usize,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        if avg_chunk_size == 0 {
            return Err(Error::InvalidChunkSize(0));
        }
        if min_chunk_size > avg_chunk_size {
            return Err(Error::MinExceedsAvg {
                min: min_chunk_size,
                avg: avg_chunk_size,
            });
        }

        Ok(Self {
            avg_chunk_size,
            min_chunk_size,
            context_window: 1,
            threshold: None,
            length: char_count(),
            embedder,
        })
    }

    /// Use a fixed similarity threshold instead of deriving boundary count
    /// from `avg_chunk_size`. Every adjacency below the threshold becomes a
    /// candidate boundary.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set how many neighboring units are folded into each embedding window
    /// on each side. Zero embeds each unit alone.
    #[must_use]
    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window;
        self
    }

    /// Replace the length measure (default: character count).
    #[must_use]
    pub fn with_length(mut self, length: LengthFn) -> Self {
        self.length = length;
        self
    }

    /// Split text into semantically coherent chunks.
    ///
    /// Chunks partition the document: disjoint, exhaustive, in order; their
    /// concatenation is exactly the input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] (or a batch-shape variant) when the
    /// embedding provider fails. The failure is never converted into a
    /// partial or empty result.
    pub async fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        if text.is_empty() {
            return Ok(vec![]);
        }

        let units = segment_units(text);
        if units.len() < 2 {
            // Nothing to decide; do not spend an embedding call.
            return Ok(vec![Chunk::new(text, 0, text.len(), 0)]);
        }

        let lengths: Vec<usize> = units
            .iter()
            .map(|u| (self.length)(u.text(text)))
            .collect();

        let windows = self.context_windows(text, &units);
        let embeddings = self.embedder.embed_batch(&windows).await?;
        if embeddings.len() != windows.len() {
            return Err(Error::EmbeddingCount {
                expected: windows.len(),
                actual: embeddings.len(),
            });
        }

        let similarities = adjacent_similarities(&embeddings);
        let boundaries = self.candidate_boundaries(&lengths, &similarities);

        Ok(self.assemble(text, &units, &lengths, &boundaries))
    }

    /// Build the embedding input for each unit: the unit plus up to
    /// `context_window` neighbors on each side.
    fn context_windows(&self, text: &str, units: &[Unit]) -> Vec<String> {
        (0..units.len())
            .map(|i| {
                let lo = i.saturating_sub(self.context_window);
                let hi = (i + self.context_window).min(units.len() - 1);
                units[lo..=hi]
                    .iter()
                    .map(|u| u.text(text).trim())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Candidate boundary positions (a boundary at `i` splits before unit
    /// `i`), sorted ascending.
    fn candidate_boundaries(&self, lengths: &[usize], similarities: &[f32]) -> Vec<usize> {
        if let Some(threshold) = self.threshold {
            return similarities
                .iter()
                .enumerate()
                .filter(|(_, &s)| s < threshold)
                .map(|(i, _)| i + 1)
                .collect();
        }

        let total: usize = lengths.iter().sum();
        let wanted = total.div_ceil(self.avg_chunk_size).saturating_sub(1);
        if wanted == 0 {
            return vec![];
        }

        let mut order: Vec<usize> = (0..similarities.len()).collect();
        order.sort_by(|&a, &b| {
            similarities[a]
                .partial_cmp(&similarities[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut picked: Vec<usize> = order.into_iter().take(wanted).map(|i| i + 1).collect();
        picked.sort_unstable();
        picked
    }

    /// Walk the units left to right, honoring candidate boundaries once the
    /// current chunk has reached `min_chunk_size`; a trailing runt is merged
    /// into the previous chunk.
    fn assemble(
        &self,
        text: &str,
        units: &[Unit],
        lengths: &[usize],
        boundaries: &[usize],
    ) -> Vec<Chunk> {
        let boundary_set: HashSet<usize> = boundaries.iter().copied().collect();

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        let mut start_unit = 0;
        let mut accumulated = 0;

        for i in 0..units.len() {
            if i > start_unit && boundary_set.contains(&i) && accumulated >= self.min_chunk_size {
                ranges.push((start_unit, i));
                start_unit = i;
                accumulated = 0;
            }
            accumulated += lengths[i];
        }
        ranges.push((start_unit, units.len()));

        if ranges.len() > 1 {
            let (s, e) = *ranges.last().expect("ranges is non-empty");
            let tail: usize = lengths[s..e].iter().sum();
            if tail < self.min_chunk_size {
                ranges.pop();
                ranges.last_mut().expect("ranges is non-empty").1 = e;
            }
        }

        ranges
            .into_iter()
            .enumerate()
            .map(|(index, (s, e))| {
                let start = units[s].start;
                let end = units[e - 1].end;
                Chunk::new(&text[start..end], start, end, index)
            })
            .collect()
    }
}

impl std::fmt::Debug for SemanticChunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticChunker")
            .field("avg_chunk_size", &self.avg_chunk_size)
            .field("min_chunk_size", &self.min_chunk_size)
            .field("context_window", &self.context_window)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

/// Cosine similarity between two vectors. Zero-magnitude vectors compare as
/// dissimilar rather than erroring.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}

/// Similarity between each pair of consecutive embeddings;
/// `embeddings.len() - 1` entries.
fn adjacent_similarities(embeddings: &[Vec<f32>]) -> Vec<f32> {
    embeddings
        .windows(2)
        .map(|pair| cosine_similarity(&pair[0], &pair[1]))
        .collect()
}
