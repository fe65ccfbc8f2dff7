use axum::extract::State;
use axum::Json;

use crate::models::StatusResponse;
use crate::state::AppState;

/// GET /status - Health of the database and, in provider mode, the provider.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let database = match state.history.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!("Database health check failed: {e}");
            "error"
        }
    };

    let llm = match &state.provider {
        None => "disabled (local mode)",
        Some(provider) => match provider.list_models().await {
            Ok(_) => "ok",
            Err(e) => {
                tracing::warn!("Provider health check failed: {e:#}");
                "error"
            }
        },
    };

    Json(StatusResponse {
        backend: "ok".to_string(),
        database: database.to_string(),
        llm: llm.to_string(),
        mode: state.config.mode(),
    })
}
