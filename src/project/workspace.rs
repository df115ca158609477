//! In-memory workspace of DSL files and workspace-wide extraction.

use std::path::Path;

use indexmap::IndexMap;
use rayon::prelude::*;
use smol_str::SmolStr;

use crate::base::BlockRange;
use crate::extract::{combine, extract_from_text};
use crate::fragment::extract_fragments;
use crate::model::{ExtractionResult, FileResult};

use super::file_loader::{ScanOptions, collect_file_paths};
use super::ProjectError;

/// Owns the `(uri → content)` pairs of a workspace.
///
/// Apply changes via [`set_file`](Self::set_file) / [`remove_file`](Self::remove_file),
/// then extract. Each extraction pass rebuilds its results from scratch;
/// nothing is cached between passes.
#[derive(Debug, Clone)]
pub struct Workspace {
    files: IndexMap<SmolStr, String>,
    concurrency: usize,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_concurrency(ScanOptions::default().concurrency)
    }

    /// A workspace whose extraction fan-out is capped at `concurrency`.
    pub fn with_concurrency(concurrency: usize) -> Self {
        Self {
            files: IndexMap::new(),
            concurrency: concurrency.max(1),
        }
    }

    /// Set or replace the content of a file.
    pub fn set_file(&mut self, uri: impl Into<SmolStr>, content: impl Into<String>) {
        self.files.insert(uri.into(), content.into());
    }

    pub fn remove_file(&mut self, uri: &str) {
        self.files.shift_remove(uri);
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.files.contains_key(uri)
    }

    pub fn content(&self, uri: &str) -> Option<&str> {
        self.files.get(uri).map(String::as_str)
    }

    /// Extract the domain model from a single file of the workspace.
    pub fn extract_file(&self, uri: &str) -> Option<ExtractionResult> {
        self.files
            .get(uri)
            .map(|content| extract_from_text(content, uri))
    }

    /// Extract every file and fold the results into one workspace-wide
    /// result.
    ///
    /// Files are processed on a bounded pool (the configured fan-out limit);
    /// each file's extraction is synchronous and isolated, and the fold runs
    /// only after all extractions completed. A pool that fails to start is an
    /// aggregation-level error and surfaces through the `error` field.
    pub fn extract_all(&self) -> ExtractionResult {
        let entries: Vec<(&SmolStr, &String)> = self.files.iter().collect();

        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .build()
        {
            Ok(pool) => pool,
            Err(e) => return ExtractionResult::failed(format!("extraction pool: {e}")),
        };

        let file_results: Vec<FileResult> = pool.install(|| {
            entries
                .par_iter()
                .map(|(uri, content)| {
                    FileResult::new((*uri).clone(), extract_from_text(content, uri))
                })
                .collect()
        });

        combine(file_results)
    }

    /// Extract the whole workspace and group it for presentation.
    ///
    /// When `current_uri` is given, a narrower single-file extraction runs
    /// alongside the workspace-wide one and entities are tagged as belonging
    /// to the current file by set membership against it.
    pub fn discover(&self, current_uri: Option<&str>) -> crate::grouping::GroupedModel {
        let workspace_result = self.extract_all();
        let current = current_uri.and_then(|uri| self.extract_file(uri));
        crate::grouping::group(&workspace_result, current.as_ref())
    }

    /// Build the minimal DSL fragment covering the given block ranges.
    ///
    /// Ranges are grouped by file and the per-file fragments concatenated
    /// with blank lines; ranges pointing at unknown files or stale lines
    /// contribute nothing.
    pub fn fragment_for_ranges(&self, ranges: &[BlockRange]) -> String {
        let files = self
            .files
            .iter()
            .map(|(uri, content)| (uri.as_str(), content.as_str()));
        extract_fragments(files, ranges)
    }
}

/// Load all DSL files under a directory into a workspace.
///
/// Unreadable files are skipped with a log entry so one bad file does not
/// take down the rest of the workspace.
pub fn load_workspace(root: &Path, options: &ScanOptions) -> Result<Workspace, ProjectError> {
    let paths = collect_file_paths(root, options)?;
    let mut workspace = Workspace::with_concurrency(options.concurrency);

    for path in paths {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                workspace.set_file(path.to_string_lossy().to_string(), content);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
            }
        }
    }

    tracing::debug!(files = workspace.file_count(), "workspace loaded");
    Ok(workspace)
}

/// Scan a directory and extract its combined domain model.
///
/// Scan failures surface as a result with `error` set and all lists empty;
/// the caller treats that as "extraction unavailable".
pub fn extract_dir(root: &Path, options: &ScanOptions) -> ExtractionResult {
    match load_workspace(root, options) {
        Ok(workspace) => workspace.extract_all(),
        Err(e) => ExtractionResult::failed(e.to_string()),
    }
}
