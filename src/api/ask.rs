use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::models::{AskRequest, AskResponse, Source};
use crate::state::AppState;

use super::ApiError;

pub const NO_RELEVANT_CODE: &str = "No relevant code found";

/// POST /ask - Retrieve chunks for the question, answer from them and log
/// the exchange to the project's history.
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let project_id = req.project_id.trim();
    let question = req.question.trim();
    if project_id.is_empty() || question.is_empty() {
        return Err(ApiError::bad_request("project_id and question required"));
    }

    let chunks = state.retriever.retrieve(question, project_id).await?;
    if chunks.is_empty() {
        tracing::info!("No relevant code for project {project_id}");
        return Ok(Json(AskResponse::Error {
            error: NO_RELEVANT_CODE.to_string(),
        }));
    }

    let answer = state.answerer.generate(question, &chunks).await?;
    state.history.record(project_id, question, &answer).await?;

    Ok(Json(AskResponse::Answer {
        answer,
        sources: chunks.into_iter().map(Source::from).collect(),
    }))
}
