use thiserror::Error;

/// Failures while preparing a project's source tree.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Invalid ZIP file uploaded.")]
    InvalidArchive(#[source] zip::result::ZipError),
    #[error("Failed to clone repository: {0}")]
    Clone(String),
    #[error("Only https://, http://, and git:// URLs are allowed")]
    UnsupportedUrl,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("chunk window ({window}) must be larger than its overlap ({overlap}), and the overlap must be positive")]
    InvalidWindow { window: usize, overlap: usize },
    #[error("failed to load tokenizer: {0}")]
    Tokenizer(String),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("malformed history timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}
