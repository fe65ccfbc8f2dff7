use std::io::Cursor;
use std::path::Path;

use crate::error::ProjectError;

const ARCHIVE_NAME: &str = "repo.zip";

/// Extract a zip archive into `target`.
///
/// The upload is written to `target/repo.zip` first and removed afterwards,
/// whether or not extraction succeeded. Entries whose names would escape
/// `target` are rejected by the zip reader.
pub fn extract_archive(bytes: &[u8], target: &Path) -> Result<(), ProjectError> {
    std::fs::create_dir_all(target)?;
    let zip_path = target.join(ARCHIVE_NAME);
    std::fs::write(&zip_path, bytes)?;

    let result = extract_file(&zip_path, target);

    if let Err(e) = std::fs::remove_file(&zip_path) {
        tracing::warn!("Failed to remove {}: {e}", zip_path.display());
    }
    result
}

fn extract_file(zip_path: &Path, target: &Path) -> Result<(), ProjectError> {
    let data = std::fs::read(zip_path)?;
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(ProjectError::InvalidArchive)?;
    archive.extract(target).map_err(|e| match e {
        zip::result::ZipError::Io(io) => ProjectError::Io(io),
        other => ProjectError::InvalidArchive(other),
    })?;
    tracing::debug!("Extracted {} archive entries", archive.len());
    Ok(())
}
