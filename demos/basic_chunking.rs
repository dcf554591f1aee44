//! Basic Text Chunking
//!
//! Splits a passage too long for one embedding window and prints the text
//! each cut repeats, so you can see the overlap doing its job.
//!
//! ```bash
//! cargo run --example basic_chunking
//! ```

use chunkd::RecursiveChunker;

fn main() {
    // Long flowing sentences, well past the 120-char budget, so the splitter
    // has to descend to word boundaries and the overlap becomes visible.
    let document = "The ingestion pipeline reads every page of the handbook, \
        strips the navigation chrome, and hands the remaining prose to the \
        chunker before anything is embedded or indexed for retrieval. A \
        passage like this one does not fit a single embedding window, so the \
        splitter walks its separator hierarchy down to word boundaries and \
        repeats a short tail across each cut, keeping neighboring chunks \
        anchored to the same context instead of stranding a thought on one \
        side of the boundary.";

    let chunker = RecursiveChunker::standard(120, 30).expect("valid parameters");
    let chunks = chunker.chunk(document);

    println!(
        "{} chars in -> {} chunks (budget 120, overlap 30)\n",
        document.chars().count(),
        chunks.len()
    );

    for chunk in &chunks {
        println!(
            "--- chunk {} ({} chars, bytes {}..{})",
            chunk.index,
            chunk.text.chars().count(),
            chunk.start,
            chunk.end
        );
        println!("{}", chunk.text);
    }

    // The spans make the duplication checkable: whatever the previous chunk
    // still covers past the next one's start is the repeated tail.
    println!("\nrepeated across cuts:");
    for pair in chunks.windows(2) {
        if pair[1].start < pair[0].end {
            println!(
                "  {} -> {}: {:?}",
                pair[0].index,
                pair[1].index,
                &document[pair[1].start..pair[0].end]
            );
        }
    }
}
