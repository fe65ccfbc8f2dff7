use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::models::EmbeddingMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where uploaded projects, vectors and the history database live
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Embedding/completion provider. `None` runs the whole service in local mode.
    pub provider: Option<ProviderConfig>,
    /// Chunking window settings
    pub chunking: ChunkingConfig,
    /// Maximum accepted request body (zip uploads) in MB
    pub max_upload_mb: usize,
}

/// OpenAI-compatible provider settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL for the API (without the `/v1` suffix)
    pub base_url: String,
    pub api_key: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// Model name for answer generation
    pub chat_model: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("embedding_model", &self.embedding_model)
            .field("chat_model", &self.chat_model)
            .finish()
    }
}

/// Token window used when splitting files into chunks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Tokens per chunk
    pub window: usize,
    /// Tokens shared by consecutive chunks
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window: 800,
            overlap: 150,
        }
    }
}

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

impl ProviderConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:8000".to_string(),
            provider: None,
            chunking: ChunkingConfig::default(),
            max_upload_mb: 100,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("CODEBASE_QA_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("CODEBASE_QA_BIND_ADDR") {
            config.bind_addr = addr;
        }

        // An empty key is treated the same as a missing one
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                let mut provider = ProviderConfig::with_api_key(key.trim());
                if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
                    provider.base_url = url.trim_end_matches('/').to_string();
                }
                if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
                    provider.embedding_model = model;
                }
                if let Ok(model) = std::env::var("CHAT_MODEL") {
                    provider.chat_model = model;
                }
                config.provider = Some(provider);
            }
        }

        if let Ok(val) = std::env::var("CODEBASE_QA_CHUNK_SIZE") {
            if let Ok(v) = val.parse() {
                config.chunking.window = v;
            }
        }
        if let Ok(val) = std::env::var("CODEBASE_QA_CHUNK_OVERLAP") {
            if let Ok(v) = val.parse() {
                config.chunking.overlap = v;
            }
        }
        if let Ok(val) = std::env::var("CODEBASE_QA_MAX_UPLOAD_MB") {
            if let Ok(v) = val.parse() {
                config.max_upload_mb = v;
            }
        }

        config
    }

    pub fn mode(&self) -> EmbeddingMode {
        if self.provider.is_some() {
            EmbeddingMode::OpenAi
        } else {
            EmbeddingMode::Local
        }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    pub fn vector_dir(&self) -> PathBuf {
        self.data_dir.join("vectors")
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("qa_history.db")
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
