use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A slice of a file's text plus its estimated source-line range.
///
/// Chunks produced by keyword search carry no line numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub file_path: String,
    pub content: String,
    pub start_line: Option<usize>,
    pub end_line: Option<usize>,
}

/// Which retrieval/answering strategy the service runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    #[serde(rename = "openai")]
    OpenAi,
    Local,
}

impl EmbeddingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingMode::OpenAi => "openai",
            EmbeddingMode::Local => "local",
        }
    }
}

/// A stored question/answer pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaRecord {
    pub id: i64,
    pub project_id: String,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub project_id: String,
    pub total_code_files: usize,
    pub total_chunks: usize,
    pub embedding_mode: EmbeddingMode,
}

/// Ask request
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub question: String,
}

/// Source reference returned alongside an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub file_path: String,
    pub start_line: Option<usize>,
    pub end_line: Option<usize>,
    pub snippet: String,
}

impl From<Chunk> for Source {
    fn from(chunk: Chunk) -> Self {
        Self {
            file_path: chunk.file_path,
            start_line: chunk.start_line,
            end_line: chunk.end_line,
            snippet: chunk.content,
        }
    }
}

/// Ask response: either an answer with its sources or a sentinel error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AskResponse {
    Answer { answer: String, sources: Vec<Source> },
    Error { error: String },
}

/// One entry of `GET /history/{project_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryResponse {
    Entries(Vec<HistoryEntry>),
    Empty { message: String },
}

/// `GET /status` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub backend: String,
    pub database: String,
    pub llm: String,
    pub mode: EmbeddingMode,
}
