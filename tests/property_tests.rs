//! Property-based tests for the chunking cores.
//!
//! These tests verify the invariants both chunkers promise:
//! - Ordered: chunks come back in document order
//! - Bounds: chunk spans are valid and text matches the span
//! - Coverage: every byte of the input is covered by some chunk
//! - Size: recursive chunks respect the budget
//! - Partition: semantic chunks are disjoint and exhaustive

use std::sync::Arc;

use proptest::prelude::*;

use chunkd::{Chunk, MockEmbedder, RecursiveChunker, SemanticChunker};

// =============================================================================
// Test Generators
// =============================================================================

/// Generate a non-empty string for chunking
fn arbitrary_text() -> impl Strategy<Value = String> {
    prop::string::string_regex(".{10,500}")
        .unwrap()
        .prop_filter("non-empty", |s| !s.is_empty())
}

/// Generate text with sentence-like structure
fn sentence_like_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::string::string_regex("[A-Za-z]{2,15}").unwrap(), 3..30).prop_map(
        |words| {
            let mut result = String::new();
            for (i, word) in words.iter().enumerate() {
                result.push_str(word);
                if i % 4 == 3 {
                    result.push_str(". ");
                } else {
                    result.push(' ');
                }
            }
            result
        },
    )
}

// =============================================================================
// Invariant Helpers
// =============================================================================

/// Check that chunks are in document order
fn chunks_ordered(chunks: &[Chunk]) -> bool {
    chunks.windows(2).all(|w| w[0].start <= w[1].start)
}

/// Check that chunk spans are valid and text matches the span
fn chunk_spans_valid(chunks: &[Chunk], text: &str) -> bool {
    chunks.iter().all(|c| {
        c.start <= c.end && c.end <= text.len() && &text[c.start..c.end] == c.text.as_str()
    })
}

/// Check that every byte of the input is covered by some chunk
fn full_coverage(chunks: &[Chunk], text: &str) -> bool {
    if chunks.is_empty() {
        return text.is_empty();
    }
    let mut covered = vec![false; text.len()];
    for chunk in chunks {
        for flag in &mut covered[chunk.start..chunk.end] {
            *flag = true;
        }
    }
    covered.iter().all(|&c| c)
}

fn semantic_chunker() -> SemanticChunker {
    // Vectors vary with content so some adjacencies dip below others.
    let embedder = Arc::new(MockEmbedder::new(|t: &str| {
        let bytes: usize = t.bytes().map(usize::from).sum();
        vec![(t.len() % 7) as f32 + 1.0, (bytes % 5) as f32]
    }));
    SemanticChunker::new(40, 10, embedder)
        .unwrap()
        .with_context_window(0)
}

fn block_on<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

// =============================================================================
// RecursiveChunker Properties
// =============================================================================

proptest! {
    #[test]
    fn recursive_chunks_ordered(text in arbitrary_text()) {
        let chunker = RecursiveChunker::standard(100, 20).unwrap();
        prop_assert!(chunks_ordered(&chunker.chunk(&text)));
    }

    #[test]
    fn recursive_spans_valid(text in arbitrary_text()) {
        let chunker = RecursiveChunker::standard(100, 20).unwrap();
        prop_assert!(chunk_spans_valid(&chunker.chunk(&text), &text));
    }

    #[test]
    fn recursive_covers_every_byte(text in arbitrary_text()) {
        let chunker = RecursiveChunker::standard(100, 20).unwrap();
        let chunks = chunker.chunk(&text);
        prop_assert!(full_coverage(&chunks, &text));
        prop_assert_eq!(chunks[0].start, 0);
        prop_assert_eq!(chunks.last().unwrap().end, text.len());
    }

    #[test]
    fn recursive_respects_size(
        text in arbitrary_text(),
        size in 20usize..200,
        overlap in 0usize..20,
    ) {
        let chunker = RecursiveChunker::standard(size, overlap).unwrap();
        for chunk in chunker.chunk(&text) {
            prop_assert!(
                chunk.text.chars().count() <= size,
                "chunk of {} chars exceeds budget {}",
                chunk.text.chars().count(),
                size
            );
        }
    }

    #[test]
    fn recursive_overlap_is_bounded(
        text in arbitrary_text(),
        overlap in 0usize..20,
    ) {
        let chunker = RecursiveChunker::standard(50, overlap).unwrap();
        let chunks = chunker.chunk(&text);
        for pair in chunks.windows(2) {
            // No gaps between consecutive chunks...
            prop_assert!(pair[1].start <= pair[0].end);
            // ...and the shared region never exceeds the requested overlap.
            let shared = &text[pair[1].start..pair[0].end];
            prop_assert!(shared.chars().count() <= overlap);
        }
    }

    #[test]
    fn recursive_zero_overlap_reconstructs_exactly(text in arbitrary_text()) {
        let chunker = RecursiveChunker::standard(50, 0).unwrap();
        let chunks = chunker.chunk(&text);
        for pair in chunks.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
        let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
        prop_assert_eq!(rebuilt, text);
    }
}

// =============================================================================
// SemanticChunker Properties
// =============================================================================

proptest! {
    #[test]
    fn semantic_partitions_the_document(text in sentence_like_text()) {
        let chunker = semantic_chunker();
        let chunks = block_on(chunker.chunk(&text)).unwrap();

        prop_assert!(!chunks.is_empty());
        prop_assert_eq!(chunks[0].start, 0);
        prop_assert_eq!(chunks.last().unwrap().end, text.len());
        for pair in chunks.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }

        let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
        prop_assert_eq!(rebuilt, text);
    }

    #[test]
    fn semantic_chunks_ordered_and_valid(text in sentence_like_text()) {
        let chunker = semantic_chunker();
        let chunks = block_on(chunker.chunk(&text)).unwrap();
        prop_assert!(chunks_ordered(&chunks));
        prop_assert!(chunk_spans_valid(&chunks, &text));
    }
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn empty_input_produces_empty_output() {
    let recursive = RecursiveChunker::standard(100, 20).unwrap();
    assert!(recursive.chunk("").is_empty());

    let semantic = semantic_chunker();
    assert!(block_on(semantic.chunk("")).unwrap().is_empty());
}

#[test]
fn single_word_input_is_one_chunk() {
    let recursive = RecursiveChunker::standard(50, 10).unwrap();
    let chunks = recursive.chunk("hello");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "hello");

    let semantic = semantic_chunker();
    let chunks = block_on(semantic.chunk("hello")).unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "hello");
}

#[test]
fn very_long_word_still_splits() {
    let text = "a".repeat(1000);
    let recursive = RecursiveChunker::standard(100, 0).unwrap();
    let chunks = recursive.chunk(&text);
    assert_eq!(chunks.len(), 10);
    assert!(full_coverage(&chunks, &text));
}

#[test]
fn unicode_never_splits_mid_character() {
    let text = "Hello 世界! Привет мир! مرحبا بالعالم";
    let chunker = RecursiveChunker::standard(12, 3).unwrap();
    for chunk in chunker.chunk(text) {
        // Slicing at the stored offsets must not panic, and must round-trip.
        assert_eq!(&text[chunk.start..chunk.end], chunk.text);
    }
}

#[test]
fn chunking_is_deterministic() {
    let text = "Meltwater feeds the river all summer. Snow returns in winter.";
    let chunker = RecursiveChunker::standard(30, 5).unwrap();

    let first = chunker.chunk(text);
    let second = chunker.chunk(text);
    assert_eq!(first, second);
}
