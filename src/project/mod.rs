//! Per-project source trees: allocation, zip extraction, git clone, and
//! code-file listing.

pub mod archive;
pub mod clone;
pub mod files;

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::ProjectError;

pub use files::{list_code_files, FileLister, ProjectFiles, SourceFile};

/// Owns the uploads directory; every project gets its own subdirectory.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    uploads_dir: PathBuf,
}

/// A freshly materialized project tree.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: String,
    pub path: PathBuf,
}

impl ProjectStore {
    pub fn open(uploads_dir: &Path) -> Result<Self, ProjectError> {
        std::fs::create_dir_all(uploads_dir)?;
        Ok(Self {
            uploads_dir: uploads_dir.to_path_buf(),
        })
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn project_dir(&self, project_id: &str) -> PathBuf {
        self.uploads_dir.join(project_id)
    }

    /// Allocate a new project id without creating its directory.
    fn allocate(&self) -> Project {
        let id = Uuid::new_v4().to_string();
        let path = self.project_dir(&id);
        Project { id, path }
    }

    /// Allocate a new project id and create its (empty) directory.
    pub fn create_project(&self) -> Result<Project, ProjectError> {
        let project = self.allocate();
        std::fs::create_dir_all(&project.path)?;
        Ok(project)
    }

    /// Store an uploaded zip archive as a new project.
    pub fn import_archive(&self, bytes: &[u8]) -> Result<Project, ProjectError> {
        let project = self.create_project()?;
        archive::extract_archive(bytes, &project.path)?;
        tracing::info!("Extracted archive into {}", project.path.display());
        Ok(project)
    }

    /// Clone a git repository as a new project.
    pub fn import_repository(&self, url: &str) -> Result<Project, ProjectError> {
        clone::validate_url(url)?;
        // git2 creates the target directory itself
        let project = self.allocate();
        clone::clone_repo(url, &project.path)?;
        Ok(project)
    }
}
