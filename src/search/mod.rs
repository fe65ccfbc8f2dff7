//! Retrieval of the chunks most relevant to a question.

pub mod keyword;
pub mod vector;

use std::sync::Arc;

use anyhow::Result;

use crate::llm::Provider;
use crate::models::Chunk;
use crate::project::FileLister;

use vector::VectorStore;

/// Candidates requested from the vector store before filtering.
pub const TOP_K: usize = 20;
/// Chunks handed to the answerer.
pub const MAX_RESULTS: usize = 5;

/// Retrieval strategy, fixed at startup by whether a provider is configured.
#[derive(Clone)]
pub enum Retriever {
    Vector {
        provider: Provider,
        store: Arc<VectorStore>,
    },
    Keyword {
        files: Arc<dyn FileLister>,
    },
}

impl Retriever {
    /// Up to [`MAX_RESULTS`] chunks of `project_id` relevant to `question`.
    /// An empty result means nothing relevant was found.
    pub async fn retrieve(&self, question: &str, project_id: &str) -> Result<Vec<Chunk>> {
        match self {
            Retriever::Vector { provider, store } => {
                let embedding = provider.embed(question).await?;
                let hits: Vec<_> = store
                    .query(&embedding, TOP_K, project_id)
                    .into_iter()
                    .filter(|hit| !hit.document.trim().is_empty())
                    .take(MAX_RESULTS)
                    .collect();
                if let Some(top) = hits.first() {
                    tracing::debug!("Top vector hit {} scored {:.3}", top.id, top.score);
                }
                tracing::debug!("Vector search returned {} chunks", hits.len());
                Ok(hits.into_iter().map(Chunk::from).collect())
            }
            Retriever::Keyword { files } => {
                let files = files.clone();
                let question = question.to_string();
                let project_id = project_id.to_string();
                // Directory walks and file reads block
                let chunks = tokio::task::spawn_blocking(move || {
                    let listed = files.list_files(&project_id);
                    tracing::debug!("Scanning {} files of project {project_id}", listed.len());
                    keyword::keyword_search(&listed, &question, MAX_RESULTS)
                })
                .await?;
                Ok(chunks)
            }
        }
    }
}
