//! Cross-file aggregation of per-file extraction results.

use std::collections::BTreeSet;

use indexmap::IndexSet;

use crate::model::{DomainDefinition, ExtractionResult, FileResult};

/// Sentinel parent for subdomains whose domain group cannot be resolved.
pub const UNKNOWN_DOMAIN: &str = "Unknown";

/// Fold per-file results into one workspace-wide result.
///
/// Domains are unioned and sorted; use cases, services, actors and exposures
/// are concatenated (duplicates across files are preserved; two files may
/// legitimately declare similarly named but distinct use cases); domain
/// definitions sharing a name are merged with a de-duplicated union of their
/// subdomains, existing entries first. The fold is idempotent over domain
/// definitions: combining the same input twice equals combining it once.
pub fn combine(results: Vec<FileResult>) -> ExtractionResult {
    let mut domains = BTreeSet::new();
    let mut use_cases = Vec::new();
    let mut service_definitions = Vec::new();
    let mut domain_definitions: Vec<DomainDefinition> = Vec::new();
    let mut actors = Vec::new();
    let mut exposures = Vec::new();

    for file in &results {
        let result = &file.result;
        domains.extend(result.domains.iter().cloned());
        use_cases.extend(result.use_cases.iter().cloned());
        service_definitions.extend(result.service_definitions.iter().cloned());
        actors.extend(result.actors.iter().cloned());
        exposures.extend(result.exposures.iter().cloned());

        for incoming in &result.domain_definitions {
            match domain_definitions
                .iter_mut()
                .find(|existing| existing.name == incoming.name)
            {
                Some(existing) => {
                    let merged: IndexSet<String> = existing
                        .sub_domains
                        .iter()
                        .chain(incoming.sub_domains.iter())
                        .cloned()
                        .collect();
                    existing.sub_domains = merged.into_iter().collect();
                }
                None => domain_definitions.push(incoming.clone()),
            }
        }
    }

    tracing::debug!(
        files = results.len(),
        domains = domains.len(),
        use_cases = use_cases.len(),
        "combined extraction results"
    );

    ExtractionResult {
        domains: domains.into_iter().collect(),
        use_cases,
        service_definitions,
        domain_definitions,
        actors,
        exposures,
        file_results: results,
        error: None,
    }
}

/// Resolve the parent domain group of a subdomain.
///
/// Strict priority order, first match wins:
/// 1. an aggregated domain definition listing the subdomain,
/// 2. a per-file domain definition listing it,
/// 3. a service definition declaring it with an explicit parent domain,
/// 4. the sentinel [`UNKNOWN_DOMAIN`].
///
/// Domain definitions always beat service-level parents; skipping a tier
/// changes grouping results.
pub fn resolve_parent_domain<'a>(result: &'a ExtractionResult, sub_domain: &str) -> &'a str {
    for definition in &result.domain_definitions {
        if definition.sub_domains.iter().any(|s| s == sub_domain) {
            return &definition.name;
        }
    }

    for file in &result.file_results {
        for definition in &file.result.domain_definitions {
            if definition.sub_domains.iter().any(|s| s == sub_domain) {
                return &definition.name;
            }
        }
    }

    for file in &result.file_results {
        for service in &file.result.service_definitions {
            if service.domains.iter().any(|d| d == sub_domain) {
                if let Some(parent) = &service.parent_domain {
                    return parent;
                }
            }
        }
    }
    // Also cover results that were never aggregated (no file_results)
    for service in &result.service_definitions {
        if service.domains.iter().any(|d| d == sub_domain) {
            if let Some(parent) = &service.parent_domain {
                return parent;
            }
        }
    }

    UNKNOWN_DOMAIN
}
