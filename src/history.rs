use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::HistoryError;
use crate::models::QaRecord;

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS qa_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id TEXT NOT NULL,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_qa_history_project ON qa_history (project_id, id)";

/// Append-only log of answered questions, per project.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    /// Open (or create) the database at `path` and ensure the table exists.
    /// `":memory:"` opens a private in-memory database.
    pub async fn new(path: &str) -> Result<Self, HistoryError> {
        let in_memory = path == ":memory:";
        let opts = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            SqliteConnectOptions::new()
                .filename(Path::new(path))
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        };

        let pool_options = if in_memory {
            // Every in-memory connection is its own database, so keep exactly one alive
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(opts).await?;

        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        sqlx::query(CREATE_INDEX).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Append a question/answer pair. Returns the new record's id.
    pub async fn record(
        &self,
        project_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<i64, HistoryError> {
        let created_at = Utc::now().to_rfc3339();
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO qa_history (project_id, question, answer, created_at) \
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(project_id)
        .bind(question)
        .bind(answer)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    /// Up to `limit` records of `project_id`, newest first.
    pub async fn recent(&self, project_id: &str, limit: i64) -> Result<Vec<QaRecord>, HistoryError> {
        let rows: Vec<(i64, String, String, String, String)> = sqlx::query_as(
            "SELECT id, project_id, question, answer, created_at FROM qa_history \
             WHERE project_id = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(project_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, project_id, question, answer, created_at)| {
                let created_at = DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc);
                Ok::<_, HistoryError>(QaRecord {
                    id,
                    project_id,
                    question,
                    answer,
                    created_at,
                })
            })
            .collect()
    }

    /// Round-trip a trivial query to check the database is reachable.
    pub async fn ping(&self) -> Result<(), HistoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let store = HistoryStore::new(":memory:").await.unwrap();
        for i in 0..12 {
            store
                .record("p1", &format!("question {i}"), &format!("answer {i}"))
                .await
                .unwrap();
        }

        let records = store.recent("p1", 10).await.unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].question, "question 11");
        assert_eq!(records[9].question, "question 2");
        assert!(records.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[tokio::test]
    async fn test_recent_is_scoped_to_project() {
        let store = HistoryStore::new(":memory:").await.unwrap();
        store.record("p1", "q1", "a1").await.unwrap();
        store.record("p2", "q2", "a2").await.unwrap();

        let records = store.recent("p2", 10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].answer, "a2");
        assert_eq!(records[0].project_id, "p2");
        assert!(store.recent("missing", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qa_history.db");
        let path = path.to_str().unwrap();
        {
            let store = HistoryStore::new(path).await.unwrap();
            store.record("p", "where?", "here").await.unwrap();
            store.ping().await.unwrap();
        }
        let reopened = HistoryStore::new(path).await.unwrap();
        let records = reopened.recent("p", 10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "where?");
    }

    #[tokio::test]
    async fn test_record_returns_id_and_stamps_time() {
        let store = HistoryStore::new(":memory:").await.unwrap();
        let before = Utc::now();
        let first = store.record("p", "q1", "a1").await.unwrap();
        let second = store.record("p", "q2", "a2").await.unwrap();
        assert!(second > first);

        let records = store.recent("p", 10).await.unwrap();
        assert_eq!(records[0].id, second);
        assert_eq!(records[1].id, first);
        assert!(records.iter().all(|r| r.created_at >= before - chrono::Duration::seconds(1)));
        assert!(records[0].created_at >= records[1].created_at);
    }
}
