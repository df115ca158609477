//! Grouping Tests - presentation model over aggregated results

use craft::extract::{UNKNOWN_DOMAIN, combine, extract_from_text};
use craft::grouping::{
    ReferenceRole, SelectionState, compute_selection, group, selected_block_ranges,
};
use craft::model::{ExtractionResult, FileResult};
use rustc_hash::FxHashSet;

fn file_result(uri: &str, dsl: &str) -> FileResult {
    FileResult::new(uri, extract_from_text(dsl, uri))
}

fn workspace_of(files: &[(&str, &str)]) -> ExtractionResult {
    combine(
        files
            .iter()
            .map(|(uri, dsl)| file_result(uri, dsl))
            .collect(),
    )
}

#[test]
fn test_unknown_domain_sorts_last() {
    let workspace = workspace_of(&[(
        "file:///a.craft",
        "domain Zeta {\n    Zed\n}\ndomain Alpha {\n    Apex\n}\n\nuse_case \"U\" {\n    when user acts\n        Zed does x\n        Apex does y\n        Orphan does z\n}",
    )]);

    let model = group(&workspace, None);
    let names: Vec<_> = model.domains.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Zeta", UNKNOWN_DOMAIN]);
}

#[test]
fn test_cross_reference_symmetry() {
    let workspace = workspace_of(&[(
        "file:///a.craft",
        "use_case \"Ship It\" {\n    when user orders\n        Orders accepts the order\n        Orders asks Shipping to plan delivery\n}",
    )]);

    let model = group(&workspace, None);
    // Both subdomains land in the Unknown group
    let unknown = &model.domains[0];
    assert_eq!(unknown.name, UNKNOWN_DOMAIN);

    let orders = unknown
        .sub_domains
        .iter()
        .find(|s| s.name == "Orders")
        .unwrap();
    let shipping = unknown
        .sub_domains
        .iter()
        .find(|s| s.name == "Shipping")
        .unwrap();

    // Orders owns the use case
    assert_eq!(orders.use_cases.len(), 1);
    assert_eq!(orders.use_cases[0].name, "Ship It");
    assert!(orders.referenced_in.is_empty());

    // Shipping is involved but does not own it
    assert!(shipping.use_cases.is_empty());
    assert_eq!(shipping.referenced_in.len(), 1);
    let reference = &shipping.referenced_in[0];
    assert_eq!(reference.use_case_name, "Ship It");
    assert_eq!(reference.role, ReferenceRole::Involved);
    assert_eq!(reference.domain_name.as_deref(), Some("Orders"));
}

#[test]
fn test_subdomains_grouped_by_domain_definition() {
    let workspace = workspace_of(&[
        ("file:///defs.craft", "domain Commerce {\n    Orders\n    Payments\n}"),
        (
            "file:///flows.craft",
            "use_case \"Pay\" {\n    when user pays\n        Payments charges the card\n        Orders confirms the order\n}",
        ),
    ]);

    let model = group(&workspace, None);
    assert_eq!(model.domains.len(), 1);
    let commerce = &model.domains[0];
    assert_eq!(commerce.name, "Commerce");
    let names: Vec<_> = commerce.sub_domains.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Orders", "Payments"]);
    assert_eq!(commerce.total_use_cases, 1);
}

#[test]
fn test_current_file_tagging() {
    let current_dsl = "use_case \"Local\" {\n    when user acts\n        Local does x\n}";
    let other_dsl = "use_case \"Remote\" {\n    when user acts\n        Remote does y\n}";

    let workspace = workspace_of(&[
        ("file:///current.craft", current_dsl),
        ("file:///other.craft", other_dsl),
    ]);
    let current = extract_from_text(current_dsl, "file:///current.craft");

    let model = group(&workspace, Some(&current));
    let unknown = &model.domains[0];

    let local = unknown.sub_domains.iter().find(|s| s.name == "Local").unwrap();
    let remote = unknown.sub_domains.iter().find(|s| s.name == "Remote").unwrap();
    assert!(local.in_current_file);
    assert!(!remote.in_current_file);
    // The group is tagged when any of its subdomains is
    assert!(unknown.in_current_file);
}

#[test]
fn test_services_grouped_by_resolved_parent() {
    let workspace = workspace_of(&[(
        "file:///all.craft",
        "domain Commerce {\n    Orders\n}\n\nservices {\n  Checkout {\n    domains: Orders\n  }\n  Mystery {\n    domains: Elsewhere\n  }\n}\n\nuse_case \"U\" {\n    when user acts\n        Orders does x\n        Elsewhere does y\n}",
    )]);

    let model = group(&workspace, None);
    assert_eq!(model.service_groups.len(), 2);

    let commerce = model
        .service_groups
        .iter()
        .find(|g| g.name == "Commerce")
        .unwrap();
    assert_eq!(commerce.services.len(), 1);
    assert_eq!(commerce.services[0].name, "Checkout");
    // The service references the Orders subdomain record from the domain tree
    assert_eq!(commerce.services[0].sub_domain_ids.len(), 1);

    let unknown = model
        .service_groups
        .iter()
        .find(|g| g.name == UNKNOWN_DOMAIN)
        .unwrap();
    assert_eq!(unknown.services[0].name, "Mystery");
}

#[test]
fn test_explicit_service_parent_beats_resolution() {
    let workspace = workspace_of(&[(
        "file:///all.craft",
        "services {\n  Checkout {\n    domains: Orders\n    parent-domain: Retail\n  }\n}\n\nuse_case \"U\" {\n    when user acts\n        Orders does x\n}",
    )]);

    let model = group(&workspace, None);
    let names: Vec<_> = model.service_groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Retail"]);
}

#[test]
fn test_selection_tri_state() {
    let workspace = workspace_of(&[(
        "file:///a.craft",
        "use_case \"One\" {\n    when user acts\n        D does x\n}\n\nuse_case \"Two\" {\n    when user acts\n        D does y\n}",
    )]);
    let model = group(&workspace, None);

    let sub = &model.domains[0].sub_domains[0];
    assert_eq!(sub.use_cases.len(), 2);

    // Selecting one of two use cases makes the subdomain and domain partial
    let mut selected = FxHashSet::default();
    selected.insert(sub.use_cases[0].id.clone());
    let view = compute_selection(&selected, &model);
    assert_eq!(view.state(&sub.use_cases[0].id), SelectionState::Selected);
    assert_eq!(view.state(&sub.id), SelectionState::Partial);
    assert_eq!(view.state(&model.domains[0].id), SelectionState::Partial);
    assert_eq!(view.selected_use_cases, 1);
    assert_eq!(view.total_use_cases, 2);

    // Selecting both completes the chain
    selected.insert(sub.use_cases[1].id.clone());
    let view = compute_selection(&selected, &model);
    assert_eq!(view.state(&sub.id), SelectionState::Selected);
    assert_eq!(view.state(&model.domains[0].id), SelectionState::Selected);
}

#[test]
fn test_selected_block_ranges_follow_tree_order() {
    let workspace = workspace_of(&[(
        "file:///a.craft",
        "use_case \"One\" {\n    when user acts\n        D does x\n}\n\nuse_case \"Two\" {\n    when user acts\n        D does y\n}",
    )]);
    let model = group(&workspace, None);
    let sub = &model.domains[0].sub_domains[0];

    let selected: FxHashSet<String> =
        sub.use_cases.iter().map(|uc| uc.id.clone()).collect();
    let ranges = selected_block_ranges(&selected, &model.domains);
    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0].start_line, 1);
    assert_eq!(ranges[1].start_line, 6);
}
