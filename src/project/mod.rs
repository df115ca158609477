//! Project management: workspace scanning and multi-file extraction.
//!
//! The file system is treated as a source of `(content, uri)` pairs; the
//! [`Workspace`] owns the loaded pairs and runs extraction over them with a
//! bounded fan-out.

mod file_loader;
mod workspace;

pub use file_loader::{ScanOptions, collect_file_paths};
pub use workspace::{Workspace, extract_dir, load_workspace};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by workspace loading.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
