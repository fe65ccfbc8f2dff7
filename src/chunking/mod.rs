//! Token-window chunking: files are cut into fixed-size, overlapping token
//! windows so meaning that straddles a window edge survives in the neighbor.

pub mod tokens;

use std::sync::Arc;

use crate::config::ChunkingConfig;
use crate::error::ChunkError;
use crate::models::Chunk;

pub use tokens::{Cl100kCodec, TokenCodec};

/// Splits file text into overlapping token windows.
#[derive(Clone)]
pub struct TokenChunker {
    codec: Arc<dyn TokenCodec>,
    window: usize,
    overlap: usize,
}

impl std::fmt::Debug for TokenChunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenChunker")
            .field("window", &self.window)
            .field("overlap", &self.overlap)
            .finish()
    }
}

impl TokenChunker {
    pub fn new(
        codec: Arc<dyn TokenCodec>,
        window: usize,
        overlap: usize,
    ) -> Result<Self, ChunkError> {
        if overlap == 0 || window <= overlap {
            return Err(ChunkError::InvalidWindow { window, overlap });
        }
        Ok(Self {
            codec,
            window,
            overlap,
        })
    }

    /// Chunker using the `cl100k_base` encoding.
    pub fn cl100k(config: ChunkingConfig) -> Result<Self, ChunkError> {
        Self::new(Arc::new(Cl100kCodec::new()?), config.window, config.overlap)
    }

    /// Tokens the window advances per chunk.
    pub fn step(&self) -> usize {
        self.window - self.overlap
    }

    /// Split `text` into chunks attributed to `file_path`.
    ///
    /// Line numbers are 1-based estimates derived from the decoded text, so
    /// they can drift by a line where a token spans a line break.
    pub fn chunk_text(&self, text: &str, file_path: &str) -> Vec<Chunk> {
        let tokens = self.codec.encode(text);
        let mut chunks = Vec::new();

        let mut start = 0usize;
        // Newlines in the decoded text before `counted_until`
        let mut newlines_before = 0usize;
        let mut counted_until = 0usize;

        while start < tokens.len() {
            let end = (start + self.window).min(tokens.len());

            if start > counted_until {
                let prefix = self.codec.decode(&tokens[counted_until..start]);
                newlines_before += count_newlines(&prefix);
                counted_until = start;
            }

            let content = self.codec.decode(&tokens[start..end]);
            let start_line = newlines_before + 1;
            let end_line = start_line + count_newlines(&content);

            chunks.push(Chunk {
                file_path: file_path.to_string(),
                content,
                start_line: Some(start_line),
                end_line: Some(end_line),
            });

            if end == tokens.len() {
                break;
            }
            start += self.step();
        }

        chunks
    }
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One token per character, so token math is exact in tests.
    struct CharCodec;

    impl TokenCodec for CharCodec {
        fn encode(&self, text: &str) -> Vec<u32> {
            text.chars().map(|c| c as u32).collect()
        }

        fn decode(&self, tokens: &[u32]) -> String {
            tokens.iter().filter_map(|&t| char::from_u32(t)).collect()
        }
    }

    fn char_chunker(window: usize, overlap: usize) -> TokenChunker {
        TokenChunker::new(Arc::new(CharCodec), window, overlap).unwrap()
    }

    fn expected_chunks(n: usize, window: usize, overlap: usize) -> usize {
        let step = window - overlap;
        let span = n.saturating_sub(overlap).max(1);
        span.div_ceil(step)
    }

    #[test]
    fn test_rejects_invalid_windows() {
        assert!(TokenChunker::new(Arc::new(CharCodec), 10, 10).is_err());
        assert!(TokenChunker::new(Arc::new(CharCodec), 10, 12).is_err());
        assert!(TokenChunker::new(Arc::new(CharCodec), 10, 0).is_err());
        assert!(TokenChunker::new(Arc::new(CharCodec), 10, 3).is_ok());
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(char_chunker(10, 3).chunk_text("", "a.rs").is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = char_chunker(10, 3).chunk_text("abc", "a.rs");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "abc");
        assert_eq!(chunks[0].file_path, "a.rs");
        assert_eq!(chunks[0].start_line, Some(1));
        assert_eq!(chunks[0].end_line, Some(1));
    }

    #[test]
    fn test_chunk_count_matches_step_formula() {
        let (window, overlap) = (10, 3);
        let chunker = char_chunker(window, overlap);
        for n in 1..=60 {
            let text: String = (0..n).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
            let chunks = chunker.chunk_text(&text, "f.txt");
            assert_eq!(
                chunks.len(),
                expected_chunks(n, window, overlap),
                "wrong chunk count for {n} tokens"
            );
        }
    }

    #[test]
    fn test_windows_overlap_and_cover_input() {
        let (window, overlap) = (10, 3);
        let text: String = (0..47).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = char_chunker(window, overlap).chunk_text(&text, "f.txt");

        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= window);
        }
        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].content.chars().collect();
            let next: Vec<char> = pair[1].content.chars().collect();
            assert_eq!(prev[prev.len() - overlap..], next[..overlap]);
        }

        // Stitch the chunks back together by dropping each overlap
        let mut rebuilt = chunks[0].content.clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.content.chars().skip(overlap));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_line_estimates() {
        // 12 chars per line including the newline
        let text = "line_one___\nline_two___\nline_three_\nline_four__\n";
        let chunks = char_chunker(24, 6).chunk_text(text, "f.txt");
        assert_eq!(chunks[0].start_line, Some(1));
        assert_eq!(chunks[0].end_line, Some(3));
        // Second window starts at token 18, in the middle of line two
        assert_eq!(chunks[1].start_line, Some(2));
        assert!(chunks[1].end_line.unwrap() >= chunks[1].start_line.unwrap());
    }

    #[test]
    fn test_cl100k_chunker_uses_token_windows() {
        let chunker = TokenChunker::cl100k(ChunkingConfig {
            window: 50,
            overlap: 10,
        })
        .unwrap();
        let source: String = (0..200)
            .map(|i| format!("let value_{i} = compute({i});\n"))
            .collect();
        let chunks = chunker.chunk_text(&source, "src/lib.rs");
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| !c.content.is_empty()));
        // Line estimates never go backwards
        for pair in chunks.windows(2) {
            assert!(pair[1].start_line >= pair[0].start_line);
        }
        assert!(chunks.last().unwrap().end_line.unwrap() >= 190);
    }
}
