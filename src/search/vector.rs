use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::models::Chunk;

/// Metadata stored alongside each vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub file_path: String,
    pub project_id: String,
    pub start_line: Option<usize>,
    pub end_line: Option<usize>,
}

/// A stored vector record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub embedding: Vec<f32>,
    pub document: String,
    pub metadata: ChunkMetadata,
}

impl VectorRecord {
    /// Deterministic record id for the `index`-th chunk of a project.
    pub fn record_id(project_id: &str, index: usize) -> String {
        format!("{project_id}_{index}")
    }
}

#[derive(Debug, Clone)]
pub struct VectorHit {
    pub id: String,
    pub document: String,
    pub metadata: ChunkMetadata,
    pub score: f32,
}

impl From<VectorHit> for Chunk {
    fn from(hit: VectorHit) -> Self {
        Chunk {
            file_path: hit.metadata.file_path,
            content: hit.document,
            start_line: hit.metadata.start_line,
            end_line: hit.metadata.end_line,
        }
    }
}

/// In-memory vector collection with disk persistence and cosine similarity search.
pub struct VectorStore {
    records: RwLock<Vec<VectorRecord>>,
    persist_path: PathBuf,
}

impl VectorStore {
    pub fn open_or_create(vector_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(vector_dir)?;
        let persist_path = vector_dir.join("vectors.json");

        let records = if persist_path.exists() {
            let data =
                std::fs::read_to_string(&persist_path).context("Failed to read vector store")?;
            match serde_json::from_str(&data) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("Vector store file is corrupt, starting empty: {e}");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            records: RwLock::new(records),
            persist_path,
        })
    }

    /// Insert records, replacing any existing record with the same id.
    pub fn upsert(&self, new_records: Vec<VectorRecord>) -> Result<()> {
        let mut records = self.records.write();
        let mut positions: HashMap<String, usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        for record in new_records {
            match positions.get(&record.id) {
                Some(&i) => records[i] = record,
                None => {
                    positions.insert(record.id.clone(), records.len());
                    records.push(record);
                }
            }
        }

        self.persist(&records)
    }

    /// Delete every record whose metadata belongs to `project_id`.
    /// Returns the number of records removed.
    pub fn delete_project(&self, project_id: &str) -> Result<usize> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.metadata.project_id != project_id);
        let removed = before - records.len();

        if removed > 0 {
            self.persist(&records)?;
        }
        Ok(removed)
    }

    /// Records of one project closest to `query_embedding`, most similar first.
    pub fn query(&self, query_embedding: &[f32], n_results: usize, project_id: &str) -> Vec<VectorHit> {
        let records = self.records.read();

        let mut scored: Vec<(f32, &VectorRecord)> = records
            .iter()
            .filter(|r| r.metadata.project_id == project_id)
            .map(|r| (cosine_similarity(query_embedding, &r.embedding), r))
            .collect();

        // Sort descending by score
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(n_results);

        scored
            .into_iter()
            .map(|(score, r)| VectorHit {
                id: r.id.clone(),
                document: r.document.clone(),
                metadata: r.metadata.clone(),
                score,
            })
            .collect()
    }

    pub fn count(&self) -> usize {
        self.records.read().len()
    }

    pub fn project_count(&self, project_id: &str) -> usize {
        self.records
            .read()
            .iter()
            .filter(|r| r.metadata.project_id == project_id)
            .count()
    }

    fn persist(&self, records: &[VectorRecord]) -> Result<()> {
        let data = serde_json::to_string(records)?;
        let tmp_path = self.persist_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data).context("Failed to write vector store")?;
        std::fs::rename(&tmp_path, &self.persist_path).context("Failed to replace vector store")?;
        Ok(())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
