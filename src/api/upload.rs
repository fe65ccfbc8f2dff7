use std::path::Path;

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde::Deserialize;

use crate::chunking::TokenChunker;
use crate::models::{Chunk, UploadResponse};
use crate::project::files::{read_lossy, relative_path};
use crate::project::{list_code_files, Project};
use crate::state::AppState;

use super::ApiError;

enum UploadSource {
    Archive(Vec<u8>),
    Repository(String),
}

/// Url-encoded upload form; only a repository URL can travel this way.
#[derive(Debug, Deserialize)]
struct UrlForm {
    #[serde(default)]
    github_url: Option<String>,
}

/// POST /upload - Import a zip archive (`file`) or git URL (`github_url`),
/// chunk its code files and, with a provider configured, embed the chunks.
///
/// Accepts `multipart/form-data` and `application/x-www-form-urlencoded`.
pub async fn upload(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<UploadResponse>, ApiError> {
    let source = read_request(request, &state).await?;

    let projects = state.projects.clone();
    let project: Project = tokio::task::spawn_blocking(move || match source {
        UploadSource::Archive(bytes) => projects.import_archive(&bytes),
        UploadSource::Repository(url) => projects.import_repository(&url),
    })
    .await??;

    let chunker = state.chunker.clone();
    let root = project.path.clone();
    let (total_code_files, chunks) =
        tokio::task::spawn_blocking(move || chunk_project(&chunker, &root)).await?;

    tracing::info!(
        "Project {}: {} code files, {} chunks",
        project.id,
        total_code_files,
        chunks.len()
    );

    if let Some(indexer) = &state.indexer {
        if !chunks.is_empty() {
            indexer.reset(&project.id)?;
            indexer.store(&chunks, &project.id).await?;
        }
    }

    Ok(Json(UploadResponse {
        project_id: project.id,
        total_code_files,
        total_chunks: chunks.len(),
        embedding_mode: state.config.mode(),
    }))
}

async fn read_request(request: Request, state: &AppState) -> Result<UploadSource, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        read_multipart(multipart).await
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(form) = Form::<UrlForm>::from_request(request, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        let url = form
            .github_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        select_source(None, url)
    } else {
        Err(ApiError::bad_request(MISSING_SOURCE))
    }
}

const MISSING_SOURCE: &str = "Provide either ZIP file or GitHub URL";

/// Pull the archive or repository URL out of the form. A file part with an
/// empty filename counts as absent.
async fn read_multipart(mut multipart: Multipart) -> Result<UploadSource, ApiError> {
    let mut archive = None;
    let mut url = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                if field.file_name().map_or(true, str::is_empty) {
                    continue;
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
                archive = Some(bytes.to_vec());
            }
            Some("github_url") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read github_url: {e}")))?;
                if !text.trim().is_empty() {
                    url = Some(text.trim().to_string());
                }
            }
            _ => {}
        }
    }

    select_source(archive, url)
}

/// An archive wins over a URL when both are sent.
fn select_source(archive: Option<Vec<u8>>, url: Option<String>) -> Result<UploadSource, ApiError> {
    match (archive, url) {
        (Some(bytes), _) => Ok(UploadSource::Archive(bytes)),
        (None, Some(url)) => Ok(UploadSource::Repository(url)),
        (None, None) => Err(ApiError::bad_request(MISSING_SOURCE)),
    }
}

/// List, read and chunk a project's code files. Returns the number of code
/// files found and the chunks of the readable ones.
pub fn chunk_project(chunker: &TokenChunker, root: &Path) -> (usize, Vec<Chunk>) {
    let files = list_code_files(root);
    tracing::info!("Found {} code files", files.len());

    let mut chunks = Vec::new();
    for path in &files {
        let Some(text) = read_lossy(path) else {
            continue;
        };
        chunks.extend(chunker.chunk_text(&text, &relative_path(root, path)));
    }
    tracing::info!("Created {} chunks", chunks.len());

    (files.len(), chunks)
}
