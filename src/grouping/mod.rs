//! Hierarchical presentation model over aggregated extraction results.
//!
//! Builds two parallel trees: domain group → subdomain → use case, and
//! service group → service → subdomain references. Nodes are derived, never
//! authoritative; every grouping pass rebuilds them from scratch.

mod selection;

pub use selection::{SelectionState, SelectionView, compute_selection, selected_block_ranges};

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::base::BlockRange;
use crate::extract::{UNKNOWN_DOMAIN, resolve_parent_domain};
use crate::model::{ExtractionResult, UseCaseInfo};

/// The grouped presentation model.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedModel {
    pub domains: Vec<Domain>,
    pub service_groups: Vec<ServiceGroup>,
}

/// A top-level domain group owning its subdomains.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub id: String,
    pub name: String,
    pub in_current_file: bool,
    pub sub_domains: Vec<SubDomain>,
    pub total_use_cases: usize,
}

/// A subdomain with the use cases it owns (entry point) and the ones it
/// merely participates in (`referenced_in`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubDomain {
    pub id: String,
    pub name: String,
    pub in_current_file: bool,
    pub use_cases: Vec<UseCaseView>,
    pub referenced_in: Vec<UseCaseReference>,
}

/// A use case owned by a subdomain (the subdomain is its entry point).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCaseView {
    pub id: String,
    pub name: String,
    pub file_name: String,
    pub block_range: BlockRange,
    pub scenarios: Vec<String>,
    pub involved_sub_domains: Vec<String>,
    pub entry_point_sub_domain: String,
}

/// Role of a subdomain within a referenced use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceRole {
    EntryPoint,
    Involved,
}

/// A lightweight cross-reference to a use case where a subdomain
/// participates without being the entry point.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCaseReference {
    pub use_case_id: String,
    pub use_case_name: String,
    /// Entry-point subdomain of the referenced use case
    pub domain_name: Option<String>,
    pub block_range: BlockRange,
    pub role: ReferenceRole,
}

/// Services partitioned by their resolved parent domain.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceGroup {
    pub name: String,
    pub in_current_file: bool,
    pub services: Vec<Service>,
}

/// A service referencing the subdomains it declares, without duplicating
/// the underlying use-case data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub sub_domain_ids: Vec<String>,
    pub block_range: BlockRange,
    pub in_current_file: bool,
}

fn domain_id(name: &str) -> String {
    format!("domain:{name}")
}

fn sub_domain_id(parent: &str, name: &str) -> String {
    format!("domain:{parent}/sub:{name}")
}

fn use_case_id(parent: &str, sub: &str, name: &str) -> String {
    format!("domain:{parent}/sub:{sub}/uc:{name}")
}

fn service_id(group: &str, name: &str) -> String {
    format!("group:{group}/svc:{name}")
}

fn file_name_of(range: &BlockRange) -> String {
    range
        .file
        .rsplit('/')
        .next()
        .map(|s| s.to_string())
        .unwrap_or_else(|| range.file.to_string())
}

/// Build the presentation model from a workspace-wide result.
///
/// `current` is a narrower extraction of the active file only; entities are
/// tagged `in_current_file` by set membership against it.
pub fn group(workspace: &ExtractionResult, current: Option<&ExtractionResult>) -> GroupedModel {
    let domains = group_domains(workspace, current);
    let service_groups = group_services(workspace, current, &domains);
    GroupedModel {
        domains,
        service_groups,
    }
}

fn group_domains(workspace: &ExtractionResult, current: Option<&ExtractionResult>) -> Vec<Domain> {
    let current_domains: FxHashSet<&str> = current
        .map(|c| c.domains.iter().map(String::as_str).collect())
        .unwrap_or_default();

    // Partition every subdomain name by its resolved parent group
    let mut partitions: IndexMap<String, Vec<&str>> = IndexMap::new();
    for sub_domain in &workspace.domains {
        let parent = resolve_parent_domain(workspace, sub_domain).to_string();
        partitions.entry(parent).or_default().push(sub_domain.as_str());
    }

    let mut domains: Vec<Domain> = partitions
        .into_iter()
        .map(|(parent, sub_domain_names)| {
            let sub_domains: Vec<SubDomain> = sub_domain_names
                .iter()
                .map(|name| build_sub_domain(workspace, &parent, name, &current_domains))
                .collect();
            let total_use_cases = sub_domains.iter().map(|s| s.use_cases.len()).sum();
            Domain {
                id: domain_id(&parent),
                in_current_file: sub_domain_names
                    .iter()
                    .any(|name| current_domains.contains(name)),
                name: parent,
                sub_domains,
                total_use_cases,
            }
        })
        .collect();

    // Alphabetical, with the sentinel group always last
    domains.sort_by(|a, b| {
        let a_unknown = a.name == UNKNOWN_DOMAIN;
        let b_unknown = b.name == UNKNOWN_DOMAIN;
        a_unknown.cmp(&b_unknown).then_with(|| a.name.cmp(&b.name))
    });

    domains
}

fn build_sub_domain(
    workspace: &ExtractionResult,
    parent: &str,
    name: &str,
    current_domains: &FxHashSet<&str>,
) -> SubDomain {
    let use_cases = workspace
        .use_cases
        .iter()
        .filter(|uc| uc.entry_point_sub_domain.as_deref() == Some(name))
        .map(|uc| build_use_case_view(parent, name, uc))
        .collect();

    let referenced_in = workspace
        .use_cases
        .iter()
        .filter(|uc| {
            uc.entry_point_sub_domain.as_deref() != Some(name)
                && uc.all_domains.iter().any(|d| d == name)
        })
        .map(|uc| UseCaseReference {
            use_case_id: use_case_id(parent, name, &uc.name),
            use_case_name: uc.name.clone(),
            domain_name: uc.entry_point_sub_domain.clone(),
            block_range: uc.block_range.clone(),
            role: ReferenceRole::Involved,
        })
        .collect();

    SubDomain {
        id: sub_domain_id(parent, name),
        name: name.to_string(),
        in_current_file: current_domains.contains(name),
        use_cases,
        referenced_in,
    }
}

fn build_use_case_view(parent: &str, sub: &str, uc: &UseCaseInfo) -> UseCaseView {
    UseCaseView {
        id: use_case_id(parent, sub, &uc.name),
        name: uc.name.clone(),
        file_name: file_name_of(&uc.block_range),
        block_range: uc.block_range.clone(),
        scenarios: uc.scenarios.clone(),
        involved_sub_domains: if uc.all_domains.is_empty() {
            vec![sub.to_string()]
        } else {
            uc.all_domains.clone()
        },
        entry_point_sub_domain: sub.to_string(),
    }
}

fn group_services(
    workspace: &ExtractionResult,
    current: Option<&ExtractionResult>,
    domains: &[Domain],
) -> Vec<ServiceGroup> {
    let current_services: FxHashSet<&str> = current
        .map(|c| {
            c.service_definitions
                .iter()
                .map(|s| s.name.as_str())
                .collect()
        })
        .unwrap_or_default();

    let mut groups: IndexMap<String, Vec<Service>> = IndexMap::new();

    for service in &workspace.service_definitions {
        // Explicit parent first, then the first declared domain that
        // resolves to a non-sentinel group
        let parent = service
            .parent_domain
            .clone()
            .or_else(|| {
                service.domains.iter().find_map(|d| {
                    let resolved = resolve_parent_domain(workspace, d);
                    (resolved != UNKNOWN_DOMAIN).then(|| resolved.to_string())
                })
            })
            .unwrap_or_else(|| UNKNOWN_DOMAIN.to_string());

        let sub_domain_ids = domains
            .iter()
            .find(|d| d.name == parent)
            .map(|domain| {
                domain
                    .sub_domains
                    .iter()
                    .filter(|sd| service.domains.iter().any(|d| *d == sd.name))
                    .map(|sd| sd.id.clone())
                    .collect()
            })
            .unwrap_or_default();

        let entry = Service {
            id: service_id(&parent, &service.name),
            name: service.name.clone(),
            domain: parent.clone(),
            sub_domain_ids,
            block_range: service.block_range.clone(),
            in_current_file: current_services.contains(service.name.as_str()),
        };
        groups.entry(parent).or_default().push(entry);
    }

    groups
        .into_iter()
        .map(|(name, services)| ServiceGroup {
            in_current_file: services.iter().any(|s| s.in_current_file),
            name,
            services,
        })
        .collect()
}
