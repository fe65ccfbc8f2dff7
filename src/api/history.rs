use axum::extract::{Path, State};
use axum::Json;

use crate::models::{HistoryEntry, HistoryResponse};
use crate::state::AppState;

use super::ApiError;

const HISTORY_LIMIT: i64 = 10;

/// GET /history/{project_id} - The project's most recent questions, newest first.
pub async fn history(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let records = state.history.recent(&project_id, HISTORY_LIMIT).await?;
    if records.is_empty() {
        return Ok(Json(HistoryResponse::Empty {
            message: "No history found for this project".to_string(),
        }));
    }

    if let Some(newest) = records.first() {
        tracing::debug!(
            "History of {}: {} entries, newest #{} at {}",
            newest.project_id,
            records.len(),
            newest.id,
            newest.created_at.to_rfc3339()
        );
    }

    Ok(Json(HistoryResponse::Entries(
        records
            .into_iter()
            .map(|r| HistoryEntry {
                question: r.question,
                answer: r.answer,
            })
            .collect(),
    )))
}
