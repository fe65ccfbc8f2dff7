use std::sync::Arc;

use anyhow::{Context, Result};

use crate::llm::Provider;
use crate::models::Chunk;
use crate::search::vector::{ChunkMetadata, VectorRecord, VectorStore};

/// Embeds chunks and writes them to the vector collection.
#[derive(Clone)]
pub struct Indexer {
    provider: Provider,
    store: Arc<VectorStore>,
}

impl Indexer {
    pub fn new(provider: Provider, store: Arc<VectorStore>) -> Self {
        Self { provider, store }
    }

    /// Embed each chunk (one request per chunk) and upsert the records as
    /// `{project_id}_{index}`. Nothing is written if any embedding fails.
    pub async fn store(&self, chunks: &[Chunk], project_id: &str) -> Result<usize> {
        let mut records = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            let embedding = self
                .provider
                .embed(&chunk.content)
                .await
                .with_context(|| format!("Failed to embed chunk {index} of {}", chunk.file_path))?;

            records.push(VectorRecord {
                id: VectorRecord::record_id(project_id, index),
                embedding,
                document: chunk.content.clone(),
                metadata: ChunkMetadata {
                    file_path: chunk.file_path.clone(),
                    project_id: project_id.to_string(),
                    start_line: chunk.start_line,
                    end_line: chunk.end_line,
                },
            });
        }

        let count = records.len();
        self.store.upsert(records)?;
        tracing::info!(
            "Stored {count} vectors for project {project_id} ({} in collection)",
            self.store.project_count(project_id)
        );
        Ok(count)
    }

    /// Remove every vector of `project_id`.
    pub fn reset(&self, project_id: &str) -> Result<usize> {
        let removed = self.store.delete_project(project_id)?;
        if removed > 0 {
            tracing::info!("Removed {removed} stale vectors for project {project_id}");
        }
        Ok(removed)
    }
}
