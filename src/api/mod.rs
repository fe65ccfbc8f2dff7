//! HTTP surface: upload, ask, history and status endpoints.

pub mod ask;
pub mod history;
pub mod status;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::error::{HistoryError, ProjectError};
use crate::state::AppState;

/// Error returned by handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => {
                tracing::warn!("Rejected request: {message}");
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::Internal(e) => {
                tracing::error!("Request failed: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl From<ProjectError> for ApiError {
    fn from(e: ProjectError) -> Self {
        match e {
            ProjectError::Io(_) => ApiError::Internal(e.into()),
            _ => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<HistoryError> for ApiError {
    fn from(e: HistoryError) -> Self {
        ApiError::Internal(e.into())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(e.into())
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/", get(root))
        .route("/upload", post(upload::upload))
        .route("/ask", post(ask::ask))
        .route("/history/{project_id}", get(history::history))
        .route("/status", get(status::status))
        .layer(DefaultBodyLimit::max(body_limit))
        // The UI is served from its own origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Codebase Q&A API running" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_renders_error_body() {
        let response = ApiError::bad_request("project_id and question required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "project_id and question required" })
        );
    }

    #[tokio::test]
    async fn test_project_errors_map_to_status() {
        let clone = ApiError::from(ProjectError::Clone("not found".into())).into_response();
        assert_eq!(clone.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(clone).await["error"],
            "Failed to clone repository: not found"
        );

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let io = ApiError::from(ProjectError::Io(io)).into_response();
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_internal_error_carries_chain() {
        let err = anyhow::anyhow!("connection refused").context("Failed to call embeddings API");
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"],
            "Failed to call embeddings API: connection refused"
        );
    }
}
