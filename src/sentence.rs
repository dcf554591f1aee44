//! Sentence-unit segmentation for the semantic chunker.
//!
//! Sentence detection is harder than it looks: "Dr. Smith went to Washington
//! D.C. on Jan. 15th." is one sentence, not four. Boundaries follow Unicode
//! Standard Annex #29 sentence segmentation, which handles abbreviations,
//! decimal numbers, and ellipses far better than splitting on periods.
//!
//! Units are exact byte spans of the source: trailing whitespace and
//! punctuation stay attached to the unit they terminate, leading whitespace
//! attaches forward to the next unit. The unit sequence is contiguous and
//! exhaustive, so any grouping of consecutive units concatenates back to the
//! original text byte-for-byte, which is the property the semantic
//! chunker's no-loss guarantee rests on.

use unicode_segmentation::UnicodeSegmentation;

/// A sentence-like unit: a contiguous byte span of the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    /// Byte offset where this unit starts.
    pub start: usize,
    /// Byte offset where this unit ends (exclusive).
    pub end: usize,
}

impl Unit {
    /// The text of this unit within its source document.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Split `text` into sentence-like units that cover it exactly.
///
/// Returns an empty vector only for empty input. Whitespace-only documents
/// yield a single unit spanning the whole text.
#[must_use]
pub fn segment_units(text: &str) -> Vec<Unit> {
    let mut units: Vec<Unit> = Vec::new();
    let mut pending_start: Option<usize> = None;
    let mut offset = 0;

    for sentence in text.split_sentence_bounds() {
        let start = offset;
        let end = offset + sentence.len();
        offset = end;

        if sentence.trim().is_empty() {
            // Whitespace-only fragment: attach backward if possible,
            // otherwise hold it for the next real unit.
            if let Some(last) = units.last_mut() {
                last.end = end;
            } else if pending_start.is_none() {
                pending_start = Some(start);
            }
            continue;
        }

        let unit_start = pending_start.take().unwrap_or(start);
        units.push(Unit {
            start: unit_start,
            end,
        });
    }

    if let Some(start) = pending_start {
        // The whole document was whitespace.
        units.push(Unit {
            start,
            end: text.len(),
        });
    }

    units
}
