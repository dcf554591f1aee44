//! Chunking Strategies Comparison
//!
//! Runs the same document through both strategies and prints the cuts each
//! one makes. The semantic pass uses a deterministic in-process embedder so
//! the demo works offline; swap in an `OpenAiEmbedder` for real boundaries.
//!
//! ```bash
//! cargo run --example chunking_strategies
//! ```

use std::sync::Arc;

use chunkd::{Chunk, MockEmbedder, RecursiveChunker, SemanticChunker};

#[tokio::main]
async fn main() -> chunkd::Result<()> {
    println!("Text Chunking Strategies");
    println!("========================\n");

    let document = "Glaciers carve their valleys over thousands of years. \
        Meltwater from the ice feeds rivers far downstream in late summer. \
        Seasonal snowfall replenishes the accumulation zone each winter.\n\n\
        Bond yields rose sharply after the central bank's announcement. \
        Traders repriced rate expectations across every maturity. \
        Currency desks saw the heaviest volume since the spring.";

    // Recursive: hard size bound, overlap between neighbors.
    let recursive = RecursiveChunker::standard(160, 40)?;
    print_chunks("Recursive (160 chars, 40 overlap)", &recursive.chunk(document));

    // Semantic: cuts where adjacent-sentence similarity drops. The mock
    // embedder puts glacier sentences and finance sentences on different axes.
    let embedder = Arc::new(MockEmbedder::new(|text: &str| {
        if text.contains("yields") || text.contains("repriced") || text.contains("desks") {
            vec![0.0, 1.0]
        } else {
            vec![1.0, 0.0]
        }
    }));
    let semantic = SemanticChunker::new(200, 100, embedder)?
        .with_threshold(0.5)
        .with_context_window(0);
    print_chunks("Semantic (avg 200, min 100)", &semantic.chunk(document).await?);

    Ok(())
}

fn print_chunks(label: &str, chunks: &[Chunk]) {
    println!("{label}: {} chunks", chunks.len());
    for chunk in chunks {
        println!("  [{}] {} chars: {:?}", chunk.index, chunk.text.chars().count(), chunk.text);
    }
    println!();
}
