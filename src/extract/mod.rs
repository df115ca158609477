//! Domain/use-case extraction engine.
//!
//! Walks one file's syntax tree and derives the structured model: declared
//! subdomains, use cases with their entry-point subdomain, service
//! definitions, and domain groupings. Per-file results are merged into a
//! workspace-wide result by [`combine`].
//!
//! Failures are data here, never panics: a file that fails to parse yields
//! an empty result, and a traversal fault yields a result whose `error`
//! field is set, without affecting other files.

mod aggregate;
mod context;
mod visitor;

pub use aggregate::{UNKNOWN_DOMAIN, combine, resolve_parent_domain};
pub use visitor::{extract_from_file, extract_from_text};

use thiserror::Error;

/// Faults raised while walking a syntax tree.
///
/// These are caught at the single-file boundary and converted into the
/// `error` field of the file's result.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed syntax tree: expected a source file root")]
    MalformedTree,
}
