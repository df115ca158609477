//! Workspace file discovery.

use std::path::{Path, PathBuf};

use super::ProjectError;

/// Include/exclude policy and fan-out limit for workspace scans.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// File extensions to include (without the dot)
    pub extensions: Vec<String>,
    /// Directory names skipped during the walk
    pub exclude_dirs: Vec<String>,
    /// Maximum number of files extracted concurrently
    pub concurrency: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["craft".to_string(), "dsl".to_string()],
            exclude_dirs: vec!["node_modules".to_string()],
            concurrency: 5,
        }
    }
}

impl ScanOptions {
    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }

    fn is_excluded_dir(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| self.exclude_dirs.iter().any(|d| d == name))
            .unwrap_or(false)
    }
}

/// Collect all DSL file paths under a directory, sorted for determinism.
pub fn collect_file_paths(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>, ProjectError> {
    if !root.exists() || !root.is_dir() {
        return Err(ProjectError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut paths = Vec::new();
    collect_recursive(root, options, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn collect_recursive(
    dir: &Path,
    options: &ScanOptions,
    results: &mut Vec<PathBuf>,
) -> Result<(), ProjectError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ProjectError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ProjectError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            if options.is_excluded_dir(&path) {
                tracing::trace!(path = %path.display(), "skipping excluded directory");
                continue;
            }
            collect_recursive(&path, options, results)?;
        } else if path.is_file() && options.matches_extension(&path) {
            results.push(path);
        }
    }

    Ok(())
}
