//! Fragment Tests - partial-source extraction

use craft::base::BlockRange;
use craft::extract::extract_from_text;
use craft::fragment::{extract_fragment, extract_fragments};
use craft::syntax::parse_text;

const TWO_USE_CASES: &str = "use_case \"U1\" {\n    when user does a\n        alpha performs x\n}\n\nuse_case \"U2\" {\n    when user does b\n        beta performs y\n        beta notifies \"done\"\n}\n";

fn range(start: u32, end: u32) -> BlockRange {
    BlockRange::new(start, end, "file:///test.craft")
}

#[test]
fn test_selecting_one_use_case_drops_the_other() {
    // U1 spans lines 1-4, U2 spans lines 6-10
    let fragment = extract_fragment(TWO_USE_CASES, &[range(6, 10)]);

    assert!(fragment.contains("use_case \"U2\""));
    assert!(fragment.contains("beta performs y"));
    assert!(!fragment.contains("U1"));
    assert!(!fragment.contains("alpha"));
}

#[test]
fn test_fragment_reparses_to_equal_use_case() {
    let fragment = extract_fragment(TWO_USE_CASES, &[range(6, 10)]);

    let report = parse_text(&fragment);
    assert!(report.success, "fragment should re-parse: {fragment:?}");

    let original = extract_from_text(TWO_USE_CASES, "file:///test.craft");
    let reduced = extract_from_text(&fragment, "file:///fragment.craft");
    assert_eq!(reduced.use_cases.len(), 1);
    assert_eq!(reduced.use_cases[0].name, "U2");
    assert_eq!(reduced.use_cases[0].scenarios, original.use_cases[1].scenarios);
}

#[test]
fn test_ancestor_wrappers_are_synthesized() {
    let source = "services {\n  Checkout {\n    domains: A, B\n    language: golang\n  }\n}\n";

    // Select only the `domains: A, B` property line
    let fragment = extract_fragment(source, &[range(3, 3)]);

    assert!(fragment.contains("services {"));
    assert!(fragment.contains("Checkout {"));
    assert!(fragment.contains("domains: A, B"));
    // Unselected sibling properties are not pulled in
    assert!(!fragment.contains("language"));

    let report = parse_text(&fragment);
    assert!(report.success, "fragment should re-parse: {fragment:?}");

    let reduced = extract_from_text(&fragment, "file:///fragment.craft");
    assert_eq!(reduced.service_definitions.len(), 1);
    assert_eq!(reduced.service_definitions[0].name, "Checkout");
    assert_eq!(reduced.service_definitions[0].domains, vec!["A", "B"]);
}

#[test]
fn test_unselected_sibling_services_are_omitted() {
    let source = "services {\n  First {\n    domains: A\n  }\n  Second {\n    domains: B\n  }\n}\n";

    // Select only the Second service (lines 5-7)
    let fragment = extract_fragment(source, &[range(5, 7)]);

    assert!(fragment.contains("Second"));
    assert!(!fragment.contains("First"));
    assert!(parse_text(&fragment).success);
}

#[test]
fn test_selecting_one_scenario_inside_use_case() {
    let source = "use_case \"Multi\" {\n    when user registers\n        accounts creates profile\n\n    when user confirms\n        accounts activates profile\n}\n";

    // Select only the second scenario (lines 5-6)
    let fragment = extract_fragment(source, &[range(5, 6)]);

    assert!(fragment.contains("use_case \"Multi\""));
    assert!(fragment.contains("when user confirms"));
    assert!(fragment.contains("accounts activates profile"));
    assert!(!fragment.contains("registers"));
    assert!(parse_text(&fragment).success);
}

#[test]
fn test_whole_file_selection_keeps_everything() {
    let fragment = extract_fragment(TWO_USE_CASES, &[range(1, 10)]);
    assert!(fragment.contains("U1"));
    assert!(fragment.contains("U2"));
    assert!(parse_text(&fragment).success);
}

#[test]
fn test_stale_range_contributes_nothing() {
    let fragment = extract_fragment(TWO_USE_CASES, &[range(400, 500)]);
    assert_eq!(fragment, "");
}

#[test]
fn test_no_ranges_yields_empty_fragment() {
    assert_eq!(extract_fragment(TWO_USE_CASES, &[]), "");
}

#[test]
fn test_domain_definition_is_preserved_verbatim() {
    let source = "domain Billing {\n    Invoicing\n    Payments\n}\n";
    let fragment = extract_fragment(source, &[range(1, 4)]);

    assert!(fragment.contains("domain Billing {"));
    assert!(fragment.contains("Invoicing"));
    assert!(parse_text(&fragment).success);
}

#[test]
fn test_multi_file_fragments_are_joined_with_blank_lines() {
    let file_a = "use_case \"A\" {\n    when user acts\n        a does x\n}\n";
    let file_b = "use_case \"B\" {\n    when user acts\n        b does y\n}\n";

    let ranges = vec![
        BlockRange::new(1, 4, "file:///a.craft"),
        BlockRange::new(1, 4, "file:///b.craft"),
    ];
    let combined = extract_fragments(
        vec![("file:///a.craft", file_a), ("file:///b.craft", file_b)],
        &ranges,
    );

    assert!(combined.contains("use_case \"A\""));
    assert!(combined.contains("use_case \"B\""));
    assert!(combined.contains("\n\n"));
    assert!(parse_text(&combined).success);
}

#[test]
fn test_ranges_for_unknown_files_are_ignored() {
    let file_a = "use_case \"A\" {\n    when user acts\n        a does x\n}\n";
    let ranges = vec![BlockRange::new(1, 4, "file:///elsewhere.craft")];

    let combined = extract_fragments(vec![("file:///a.craft", file_a)], &ranges);
    assert_eq!(combined, "");
}
