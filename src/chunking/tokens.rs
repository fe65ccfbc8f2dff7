//! Token codecs used by the chunker.
//!
//! The production codec is OpenAI's `cl100k_base` BPE, the encoding shared by
//! the embedding and chat models the service talks to, so chunk sizes line up
//! with what the provider actually counts.

use tiktoken_rs::CoreBPE;

use crate::error::ChunkError;

/// Encode text into token ids and decode ids back into text.
pub trait TokenCodec: Send + Sync {
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Decode a token slice. Must never fail: a slice whose edges split a
    /// multi-byte character decodes to the longest valid text it contains.
    fn decode(&self, tokens: &[u32]) -> String;
}

/// Maximum tokens a split UTF-8 character can spill over at either edge.
const MAX_EDGE_TRIM: usize = 3;

/// `cl100k_base` byte-pair encoding.
pub struct Cl100kCodec {
    bpe: CoreBPE,
}

impl Cl100kCodec {
    pub fn new() -> Result<Self, ChunkError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| ChunkError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }

    fn try_decode(&self, tokens: &[u32]) -> Option<String> {
        self.bpe.decode(tokens.to_vec()).ok()
    }
}

impl TokenCodec for Cl100kCodec {
    fn encode(&self, text: &str) -> Vec<u32> {
        self.bpe.encode_ordinary(text)
    }

    fn decode(&self, tokens: &[u32]) -> String {
        if let Some(text) = self.try_decode(tokens) {
            return text;
        }

        // A window edge landed inside a multi-byte character: drop the
        // partial tokens at the edges until the rest decodes cleanly.
        for trim in 1..=MAX_EDGE_TRIM * 2 {
            for lead in 0..=trim.min(MAX_EDGE_TRIM) {
                let tail = trim - lead;
                if tail > MAX_EDGE_TRIM || lead + tail >= tokens.len() {
                    continue;
                }
                if let Some(text) = self.try_decode(&tokens[lead..tokens.len() - tail]) {
                    return text;
                }
            }
        }

        tracing::warn!("Could not decode a window of {} tokens", tokens.len());
        String::new()
    }
}
