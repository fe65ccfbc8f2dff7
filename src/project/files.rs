use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A code file read from a project tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the project root, `/`-separated
    pub relative_path: String,
    pub content: String,
}

/// Which files a walk visits.
#[derive(Debug, Clone, Copy)]
pub struct WalkFilter {
    pub extensions: &'static [&'static str],
    pub excluded_dirs: &'static [&'static str],
    /// Deepest directory level (below the root) whose files are visited
    pub max_dir_depth: Option<usize>,
    /// Stop after this many candidate files
    pub max_files: Option<usize>,
    pub max_file_bytes: Option<u64>,
    pub skip_hidden_files: bool,
    pub case_insensitive_extensions: bool,
}

/// Files chunked and embedded on upload.
pub const INDEX_FILTER: WalkFilter = WalkFilter {
    extensions: &["py", "js", "ts", "tsx", "java", "cpp", "c", "go", "rs"],
    excluded_dirs: &[
        "node_modules",
        ".git",
        "venv",
        "__pycache__",
        "dist",
        "build",
        ".next",
        ".idea",
    ],
    max_dir_depth: None,
    max_files: None,
    max_file_bytes: Some(1024 * 1024),
    skip_hidden_files: true,
    case_insensitive_extensions: true,
};

/// Files scanned by keyword search. Test and fixture trees are left out so
/// they do not drown the code under test.
pub const SEARCH_FILTER: WalkFilter = WalkFilter {
    extensions: &[
        "py", "js", "ts", "tsx", "java", "cpp", "c", "go", "rs", "json", "md",
    ],
    excluded_dirs: &[
        "node_modules",
        ".git",
        "venv",
        "__pycache__",
        "dist",
        "build",
        ".next",
        ".idea",
        "test",
        "tests",
        "samples",
        "resources",
    ],
    max_dir_depth: Some(4),
    max_files: Some(400),
    max_file_bytes: None,
    skip_hidden_files: false,
    case_insensitive_extensions: false,
};

impl WalkFilter {
    fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.contains(&name)
    }

    fn has_supported_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().map(|e| e.to_string_lossy()) else {
            return false;
        };
        if self.case_insensitive_extensions {
            let ext = ext.to_lowercase();
            self.extensions.contains(&ext.as_str())
        } else {
            let ext: &str = &ext;
            self.extensions.contains(&ext)
        }
    }

    /// Paths of the files under `root` this filter admits.
    pub fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(root).sort_by_file_name();
        if let Some(depth) = self.max_dir_depth {
            // A file sits one level below its directory
            walker = walker.max_depth(depth + 1);
        }

        let mut paths = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !self.is_excluded_dir(&e.file_name().to_string_lossy())
            })
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();

            if self.skip_hidden_files && entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            if !self.has_supported_extension(path) {
                continue;
            }
            if let Some(limit) = self.max_files {
                if paths.len() >= limit {
                    break;
                }
            }
            if let Some(max_bytes) = self.max_file_bytes {
                match entry.metadata() {
                    Ok(meta) if meta.len() <= max_bytes => {}
                    _ => continue,
                }
            }

            paths.push(path.to_path_buf());
        }
        paths
    }
}

/// Code files to chunk for a freshly uploaded project.
pub fn list_code_files(project_dir: &Path) -> Vec<PathBuf> {
    INDEX_FILTER.walk(project_dir)
}

/// Path of `path` relative to `root`, with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read a file as text, replacing invalid UTF-8. Unreadable files yield `None`.
pub fn read_lossy(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::debug!("Skipping unreadable file {}: {e}", path.display());
            None
        }
    }
}

/// Source of the files keyword search scans for a project.
pub trait FileLister: Send + Sync {
    fn list_files(&self, project_id: &str) -> Vec<SourceFile>;
}

/// Lists files from the project directories under the uploads root.
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    uploads_dir: PathBuf,
}

impl ProjectFiles {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }
}

impl FileLister for ProjectFiles {
    fn list_files(&self, project_id: &str) -> Vec<SourceFile> {
        // Project ids are generated UUIDs; anything else cannot name a project
        if uuid::Uuid::parse_str(project_id).is_err() {
            return Vec::new();
        }
        let root = self.uploads_dir.join(project_id);
        if !root.is_dir() {
            return Vec::new();
        }

        SEARCH_FILTER
            .walk(&root)
            .into_iter()
            .filter_map(|path| {
                let content = read_lossy(&path)?;
                Some(SourceFile {
                    relative_path: relative_path(&root, &path),
                    content,
                })
            })
            .collect()
    }
}
