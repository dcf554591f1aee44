//! The Chunk type: a piece of a document with position metadata.

/// A piece of a chunked document, with its position in the source text.
///
/// Every chunk produced by this crate is a contiguous byte range of the
/// original document, so `text` always equals `&document[start..end]`.
/// Downstream consumers that only want the strings can drop the spans; the
/// spans exist so callers (and tests) can verify coverage and overlap.
///
/// ## Byte offsets
///
/// `start` and `end` are byte offsets, matching Rust's string slicing:
///
/// ```rust
/// use chunkd::Chunk;
///
/// let text = "Hello, world!";
/// let chunk = Chunk::new("world", 7, 12, 0);
/// assert_eq!(&text[chunk.start..chunk.end], "world");
/// ```
///
/// ## Overlap
///
/// The recursive chunker may produce adjacent chunks whose spans overlap by
/// up to the configured `chunk_overlap`; the semantic chunker's spans are
/// disjoint and cover the document exactly. The `index` field records each
/// chunk's position in the output sequence either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk text.
    pub text: String,
    /// Byte offset where this chunk starts in the original document.
    pub start: usize,
    /// Byte offset where this chunk ends (exclusive) in the original document.
    pub end: usize,
    /// Zero-based index of this chunk in the output sequence.
    pub index: usize,
}

impl Chunk {
    /// Create a new chunk.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
        }
    }

    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The byte span of this chunk in the original document.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {{ index: {}, span: {}..{}, len: {} }}",
            self.index,
            self.start,
            self.end,
            self.len()
        )
    }
}
