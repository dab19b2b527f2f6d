//! Text chunking with configurable size and overlap.
//!
//! Splitting is delegated to `text-splitter`, which prefers the coarsest
//! semantic boundary that fits: paragraphs, then sentences, then words, then
//! graphemes. Sizes are counted in characters.

use sha2::{Digest, Sha256};
use sift_core::{AppError, AppResult, ChunkingConfig};
use text_splitter::{Characters, ChunkConfig, TextSplitter};

use crate::types::{Chunk, DocumentUnit};

/// Splits document units into overlapping chunk records.
pub struct Chunker {
    splitter: TextSplitter<Characters>,
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a chunker for the given size and overlap.
    pub fn new(config: ChunkingConfig) -> AppResult<Self> {
        config.validate()?;

        let chunk_config = ChunkConfig::new(config.chunk_size)
            .with_overlap(config.chunk_overlap)
            .map_err(|e| AppError::Config(format!("Invalid chunk configuration: {}", e)))?
            .with_trim(true);

        Ok(Self {
            splitter: TextSplitter::new(chunk_config),
            config,
        })
    }

    /// Split one unit, copying its metadata onto every chunk.
    pub fn split(&self, unit: &DocumentUnit) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = self
            .splitter
            .chunks(&unit.text)
            .filter(|text| !text.trim().is_empty())
            .enumerate()
            .map(|(position, text)| Chunk {
                text: text.to_string(),
                metadata: unit.metadata.clone(),
                position: position as u32,
                hash: calculate_hash(text),
            })
            .collect();

        tracing::debug!(
            "Chunked {} into {} chunks (size: {}, overlap: {})",
            unit.metadata.describe(),
            chunks.len(),
            self.config.chunk_size,
            self.config.chunk_overlap
        );

        chunks
    }
}

/// Calculate SHA-256 hash of text.
pub fn calculate_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UnitMetadata;

    fn unit(text: &str) -> DocumentUnit {
        DocumentUnit::new(text, UnitMetadata::Document { document_number: 7 })
    }

    fn chunker(size: usize, overlap: usize) -> Chunker {
        Chunker::new(ChunkingConfig {
            chunk_size: size,
            chunk_overlap: overlap,
        })
        .unwrap()
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = Chunker::new(ChunkingConfig::default())
            .unwrap()
            .split(&unit("Hello world."));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello world.");
        assert_eq!(chunks[0].position, 0);
        assert_eq!(chunks[0].metadata, UnitMetadata::Document { document_number: 7 });
    }

    #[test]
    fn test_empty_text() {
        let chunks = chunker(100, 10).split(&unit(""));
        assert!(chunks.is_empty());

        let chunks = chunker(100, 10).split(&unit("   \n\n  "));
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_chunks_respect_max_size() {
        let text = "This is a sentence about ingestion. ".repeat(200);
        let chunks = chunker(200, 40).split(&unit(&text));

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 200);
        }
    }

    #[test]
    fn test_positions_and_metadata() {
        let text = "word ".repeat(500);
        let chunks = chunker(100, 20).split(&unit(&text));

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.position, i as u32);
            assert_eq!(chunk.metadata, UnitMetadata::Document { document_number: 7 });
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let text = (0..400)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = chunker(100, 30).split(&unit(&text));
        assert!(chunks.len() > 2);

        for pair in chunks.windows(2) {
            let first_word_of_next = pair[1].text.split_whitespace().next().unwrap();
            assert!(
                pair[0].text.contains(first_word_of_next),
                "expected '{}' to repeat from the previous chunk",
                first_word_of_next
            );
        }
    }

    #[test]
    fn test_unsplittable_text_still_bounded() {
        let text = "x".repeat(250);
        let chunks = chunker(100, 10).split(&unit(&text));
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 100);
        }
    }

    #[test]
    fn test_utf8_text() {
        let text = "Acentuação: ã, õ, ç, á, é. Emoji: 🚀 🎯 💡. ".repeat(80);
        let chunks = chunker(120, 20).split(&unit(&text));
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 120);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Chunker::new(ChunkingConfig {
            chunk_size: 50,
            chunk_overlap: 50,
        });
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_calculate_hash() {
        let hash = calculate_hash("Hello, world!");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, calculate_hash("Hello, world!"));
        assert_ne!(hash, calculate_hash("Different text"));
    }
}
