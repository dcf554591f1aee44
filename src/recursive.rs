//! Recursive separator splitting with overlap.
//!
//! Tries progressively finer separators until every piece fits the size
//! budget, then merges pieces back into chunks with a configurable overlap.
//!
//! ## The algorithm
//!
//! Given separators `["\n\n", "\n", ".", "?", "!", " ", ""]` and a budget:
//!
//! ```text
//! 1. Split on "\n\n" (paragraphs), keeping each separator attached to the
//!    piece it terminates.
//! 2. Any piece over budget? Re-split that piece with the remaining, finer
//!    separators.
//! 3. The final "" separator splits into single characters, so descent
//!    always terminates.
//! 4. Merge conforming pieces left to right; when the next piece would
//!    overflow the budget, close the chunk and carry its tail (up to
//!    `chunk_overlap` length units) into the next one.
//! ```
//!
//! Because separators stay attached and pieces are byte spans of the source,
//! nothing is lost: concatenating the non-overlapping portions of consecutive
//! chunks reconstructs the document exactly.
//!
//! ## Choosing separators
//!
//! The hierarchy is coarsest-first; earlier separators are always preferred.
//! The list must end with `""`: that terminal entry is what guarantees
//! progress on delimiter-free text (a 10k-character run with no spaces still
//! splits, at the character level).

use std::collections::VecDeque;
use std::ops::Range;

use crate::length::{char_count, LengthFn};
use crate::{Chunk, Error, Result};

/// Separator hierarchy used by the `/rtc` route: paragraph, line, sentence
/// punctuation, word, character.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ".", "?", "!", " ", ""];

/// Recursive separator chunker.
///
/// Splits text using a hierarchy of separators, coarsest first, and merges
/// the resulting pieces into chunks of at most `chunk_size` length units with
/// up to `chunk_overlap` units repeated between neighbors.
///
/// ## Example
///
/// ```rust
/// use chunkd::RecursiveChunker;
///
/// let chunker = RecursiveChunker::standard(50, 10).unwrap();
/// let text = "Paragraph one.\n\nParagraph two is longer and may need splitting.";
/// let chunks = chunker.chunk(text);
/// assert!(!chunks.is_empty());
/// ```
#[derive(Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    length: LengthFn,
    separators: Vec<String>,
}

impl RecursiveChunker {
    /// Create a new recursive chunker.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - Maximum chunk size in length units
    /// * `chunk_overlap` - Length units repeated between adjacent chunks
    /// * `length` - The length measure budgets are expressed in
    /// * `separators` - Hierarchy of separators, coarsest first, ending in `""`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `chunk_size == 0`,
    /// [`Error::OverlapExceedsSize`] if `chunk_overlap >= chunk_size`, and
    /// [`Error::MissingTerminalSeparator`] if `separators` does not end with
    /// the empty string.
    pub fn new(
        chunk_size: usize,
        chunk_overlap: usize,
        length: LengthFn,
        separators: &[&str],
    ) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidChunkSize(0));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::OverlapExceedsSize {
                size: chunk_size,
                overlap: chunk_overlap,
            });
        }
        if separators.last().map_or(true, |s| !s.is_empty()) {
            return Err(Error::MissingTerminalSeparator);
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            length,
            separators: separators.iter().map(|&s| s.to_string()).collect(),
        })
    }

    /// Create a chunker with the default separator hierarchy and
    /// character-count length.
    ///
    /// # Errors
    ///
    /// Same validation as [`RecursiveChunker::new`].
    pub fn standard(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::new(chunk_size, chunk_overlap, char_count(), DEFAULT_SEPARATORS)
    }

    /// The configured maximum chunk size.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The configured overlap between adjacent chunks.
    #[must_use]
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split text into chunks.
    ///
    /// Chunks come back in document order. Every chunk is within the size
    /// budget except single atomic pieces that the terminal character-level
    /// split cannot shrink further.
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return vec![];
        }

        let mut units = Vec::new();
        self.split_units(text, 0..text.len(), 0, &mut units);
        self.merge_units(text, &units)
    }

    fn measure(&self, s: &str) -> usize {
        (self.length)(s)
    }

    /// Resolve a segment into size-conformant unit spans, descending the
    /// separator hierarchy for oversized pieces.
    fn split_units(
        &self,
        text: &str,
        segment: Range<usize>,
        sep_index: usize,
        out: &mut Vec<Range<usize>>,
    ) {
        let slice = &text[segment.clone()];
        if self.measure(slice) <= self.chunk_size {
            out.push(segment);
            return;
        }

        // Find the first separator (from sep_index on) that occurs in this
        // segment. The terminal "" always matches.
        let mut idx = sep_index;
        while idx < self.separators.len() - 1 {
            if slice.contains(self.separators[idx].as_str()) {
                break;
            }
            idx += 1;
        }
        let sep = &self.separators[idx];

        if sep.is_empty() {
            // Character-level split: atomic units, accepted regardless of size.
            for (i, c) in slice.char_indices() {
                let start = segment.start + i;
                out.push(start..start + c.len_utf8());
            }
            return;
        }

        // Split at every occurrence, separator attached to the piece it ends.
        let mut piece_start = segment.start;
        let mut searched = 0;
        while let Some(pos) = slice[searched..].find(sep.as_str()) {
            let piece_end = segment.start + searched + pos + sep.len();
            self.split_units(text, piece_start..piece_end, idx + 1, out);
            piece_start = piece_end;
            searched += pos + sep.len();
        }
        if piece_start < segment.end {
            self.split_units(text, piece_start..segment.end, idx + 1, out);
        }
    }

    /// Merge unit spans into chunks, carrying up to `chunk_overlap` length
    /// units of each chunk's tail into the next.
    fn merge_units(&self, text: &str, units: &[Range<usize>]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(Range<usize>, usize)> = VecDeque::new();
        let mut total = 0;

        for unit in units {
            let len = self.measure(&text[unit.clone()]);

            if !window.is_empty() && total + len > self.chunk_size {
                push_chunk(text, &window, &mut chunks);

                // Retain the longest tail that fits the overlap budget and
                // still leaves room for the incoming unit.
                while !window.is_empty()
                    && (total > self.chunk_overlap || total + len > self.chunk_size)
                {
                    let (_, dropped) = window.pop_front().expect("window is non-empty");
                    total -= dropped;
                }
            }

            window.push_back((unit.clone(), len));
            total += len;
        }

        if !window.is_empty() {
            push_chunk(text, &window, &mut chunks);
        }

        chunks
    }
}

fn push_chunk(text: &str, window: &VecDeque<(Range<usize>, usize)>, chunks: &mut Vec<Chunk>) {
    let start = window.front().expect("window is non-empty").0.start;
    let end = window.back().expect("window is non-empty").0.end;
    chunks.push(Chunk::new(&text[start..end], start, end, chunks.len()));
}

impl std::fmt::Debug for RecursiveChunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecursiveChunker")
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("separators", &self.separators)
            .finish_non_exhaustive()
    }
}
