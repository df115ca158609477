//! Extraction context: state threaded through the traversal.

use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::base::{BlockRange, LineIndex, TextRange};
use crate::model::{
    Actor, DomainDefinition, ExposureInfo, ExtractionResult, ServiceDefinition, UseCaseInfo,
};

/// Accumulated extraction state for one file.
///
/// The context is an explicit value passed through the visit functions, so
/// the traversal is reentrant and testable node-by-node. Ordered sets keep
/// the first-seen-wins semantics that entry-point determination relies on.
pub(super) struct ExtractionContext {
    pub file: SmolStr,
    pub line_index: LineIndex,
    /// Every subdomain name seen anywhere: domain references in scenarios
    /// plus `domains:` lists in service definitions.
    pub domains: IndexSet<String>,
    pub use_cases: Vec<UseCaseInfo>,
    pub service_definitions: Vec<ServiceDefinition>,
    pub domain_definitions: Vec<DomainDefinition>,
    pub actors: Vec<Actor>,
    pub exposures: Vec<ExposureInfo>,
}

impl ExtractionContext {
    pub fn new(file: impl Into<SmolStr>, source: &str) -> Self {
        Self {
            file: file.into(),
            line_index: LineIndex::new(source),
            domains: IndexSet::new(),
            use_cases: Vec::new(),
            service_definitions: Vec::new(),
            domain_definitions: Vec::new(),
            actors: Vec::new(),
            exposures: Vec::new(),
        }
    }

    /// Derive a block range for a node span in this file.
    pub fn block_range(&self, range: TextRange) -> BlockRange {
        BlockRange::from_text_range(range, &self.line_index, self.file.clone())
    }

    /// Seal the context into a per-file result. Domains come out sorted.
    pub fn into_result(self) -> ExtractionResult {
        let mut domains: Vec<String> = self.domains.into_iter().collect();
        domains.sort();
        ExtractionResult {
            domains,
            use_cases: self.use_cases,
            service_definitions: self.service_definitions,
            domain_definitions: self.domain_definitions,
            actors: self.actors,
            exposures: self.exposures,
            file_results: Vec::new(),
            error: None,
        }
    }
}
