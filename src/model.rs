//! Extraction data model.
//!
//! All records here are immutable value types produced fresh on every
//! extraction pass; nothing mutates them in place afterwards. The serde
//! shapes are the wire contract consumed by the presentation layers and the
//! diagram-rendering service.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::base::BlockRange;

/// One `use_case "<name>" { ... }` block.
///
/// `entry_point_sub_domain` is the first subdomain encountered during
/// traversal of the use case body (insertion order, not declaration order);
/// every other subdomain mentioned anywhere in the same use case is involved
/// but not primary. It is `None` only when no domain was referenced at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCaseInfo {
    pub name: String,
    pub entry_point_sub_domain: Option<String>,
    pub all_domains: Vec<String>,
    pub scenarios: Vec<String>,
    pub block_range: BlockRange,
}

/// A service declared inside a `services { }` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    pub name: String,
    pub domains: Vec<String>,
    pub data_stores: Vec<String>,
    pub language: Option<String>,
    /// Explicit parent from the `parent-domain:` property; inferred
    /// downstream when unset.
    pub parent_domain: Option<String>,
    pub block_range: BlockRange,
}

/// An explicit `domain <name> { ... }` declaration grouping subdomains.
///
/// Definitions sharing a name across files are merged (union of subdomains)
/// during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDefinition {
    pub name: String,
    pub sub_domains: Vec<String>,
    pub block_range: BlockRange,
}

/// Kind of a declared actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    User,
    System,
    Service,
}

impl ActorKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "user" => Some(Self::User),
            "system" => Some(Self::System),
            "service" => Some(Self::Service),
            _ => None,
        }
    }
}

/// An actor declared standalone or inside an `actors { }` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub name: String,
    pub kind: ActorKind,
}

/// An `exposure <name> { }` block describing how services are exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureInfo {
    pub name: String,
    pub to: Vec<String>,
    pub of: Vec<String>,
    pub through: Vec<String>,
    pub block_range: BlockRange,
}

/// Extraction output for a single file or a whole workspace.
///
/// The per-file and aggregated shapes are structurally identical;
/// aggregation is a pure fold. `file_results` is populated only on the
/// aggregated form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// All subdomain names, sorted lexicographically
    pub domains: Vec<String>,
    pub use_cases: Vec<UseCaseInfo>,
    pub service_definitions: Vec<ServiceDefinition>,
    pub domain_definitions: Vec<DomainDefinition>,
    pub actors: Vec<Actor>,
    pub exposures: Vec<ExposureInfo>,
    pub file_results: Vec<FileResult>,
    /// Set only for traversal or aggregation faults; a non-empty value means
    /// "extraction unavailable", not "partial data available". Syntax errors
    /// do NOT populate this field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Empty result carrying an error message
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// A per-file extraction result tagged with its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    pub uri: SmolStr,
    pub file_name: String,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

impl FileResult {
    pub fn new(uri: impl Into<SmolStr>, result: ExtractionResult) -> Self {
        let uri = uri.into();
        let file_name = uri
            .rsplit('/')
            .next()
            .map(|s| s.to_string())
            .unwrap_or_else(|| uri.to_string());
        Self {
            uri,
            file_name,
            result,
        }
    }
}
