//! Partial-source extraction: re-derive a minimal, syntactically valid DSL
//! fragment from a set of selected line ranges.
//!
//! The extractor re-parses the source, finds the most specific nodes fully
//! contained in the selected ranges, marks them (with all descendants and the
//! full ancestor chain) as required, then re-serializes the tree top-down.
//! Structural wrappers (`services { }`, service definitions, `use_case { }`)
//! are reconstructed synthetically; everything else is emitted verbatim from
//! the lossless CST so formatting, identifiers, and modifiers survive
//! unchanged. Containers with no required descendant are omitted entirely.

use rustc_hash::FxHashSet;

use crate::base::{BlockRange, LineIndex};
use crate::parser::{
    AstNode, Scenario, ServiceDef, ServicesBlock, SyntaxKind, SyntaxNode, UseCase, parse,
};

/// Extract a fragment from one file's text, keeping only the blocks covered
/// by `ranges` plus the ancestor structure needed to stay well-formed.
///
/// A range matching no node contributes nothing; this is not an error (stale
/// ranges after a document edit are expected).
pub fn extract_fragment(source: &str, ranges: &[BlockRange]) -> String {
    if ranges.is_empty() {
        return String::new();
    }

    let tree = parse(source).syntax();
    let index = LineIndex::new(source);

    let selected = find_nodes_in_ranges(&tree, ranges, &index);
    if selected.is_empty() {
        return String::new();
    }

    let mut required = FxHashSet::default();
    for node in &selected {
        mark_required(node, &mut required);
    }

    render_source_file(&tree, &required)
}

/// Extract fragments for several files at once.
///
/// Ranges are grouped by file, sorted by start line within each file, and
/// the per-file fragments are joined with blank lines. Files are visited in
/// the order given.
pub fn extract_fragments<'a, I>(files: I, ranges: &[BlockRange]) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut parts = Vec::new();
    for (uri, content) in files {
        let mut file_ranges: Vec<BlockRange> = ranges
            .iter()
            .filter(|r| r.file == uri)
            .cloned()
            .collect();
        if file_ranges.is_empty() {
            continue;
        }
        file_ranges.sort_by_key(|r| r.start_line);

        let fragment = extract_fragment(content, &file_ranges);
        if !fragment.trim().is_empty() {
            parts.push(fragment.trim_end().to_string());
        }
    }
    if parts.is_empty() {
        String::new()
    } else {
        let mut out = parts.join("\n\n");
        out.push('\n');
        out
    }
}

/// 1-indexed inclusive line span of a node
fn node_lines(node: &SyntaxNode, index: &LineIndex) -> (u32, u32) {
    let range = BlockRange::from_text_range(node.text_range(), index, "");
    (range.start_line, range.end_line)
}

/// Find the most specific nodes whose full span falls inside a selected
/// range. Partial overlap never matches a node; the search recurses into
/// children instead. A matched node's children are still searched for
/// strictly narrower matches (selecting one scenario inside an already
/// matched use case).
fn find_nodes_in_ranges(
    root: &SyntaxNode,
    ranges: &[BlockRange],
    index: &LineIndex,
) -> Vec<SyntaxNode> {
    let mut selected = Vec::new();
    traverse(root, ranges, index, &mut selected);
    selected
}

fn traverse(
    node: &SyntaxNode,
    ranges: &[BlockRange],
    index: &LineIndex,
    selected: &mut Vec<SyntaxNode>,
) {
    let (start, end) = node_lines(node, index);
    let matched = ranges.iter().any(|r| r.contains_span(start, end));

    if matched {
        selected.push(node.clone());
        for child in node.children() {
            let (child_start, child_end) = node_lines(&child, index);
            let narrower = child_start > start || child_end < end;
            if narrower && ranges.iter().any(|r| r.contains_span(child_start, child_end)) {
                traverse(&child, ranges, index, selected);
            }
        }
    } else {
        for child in node.children() {
            traverse(&child, ranges, index, selected);
        }
    }
}

/// Mark a selected node, its whole subtree, and its ancestor chain.
fn mark_required(node: &SyntaxNode, required: &mut FxHashSet<SyntaxNode>) {
    for descendant in node.descendants() {
        required.insert(descendant);
    }
    let mut current = node.parent();
    while let Some(parent) = current {
        current = parent.parent();
        required.insert(parent);
    }
}

fn is_required(node: &SyntaxNode, required: &FxHashSet<SyntaxNode>) -> bool {
    required.contains(node)
}

/// Verbatim source text of a node, trimmed (used for single-line items
/// that get re-indented).
fn verbatim_line(node: &SyntaxNode) -> String {
    node.text().to_string().trim().to_string()
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn render_source_file(root: &SyntaxNode, required: &FxHashSet<SyntaxNode>) -> String {
    let mut blocks = Vec::new();

    for child in root.children() {
        if !is_required(&child, required) {
            continue;
        }
        let text = match child.kind() {
            SyntaxKind::SERVICES_BLOCK => {
                ServicesBlock::cast(child).map(|b| render_services(&b, required))
            }
            SyntaxKind::USE_CASE => UseCase::cast(child).map(|u| render_use_case(&u, required)),
            // Domain definitions, actors, exposures: preserved verbatim
            _ => Some(child.text().to_string().trim_end().to_string()),
        };
        if let Some(text) = text {
            if !text.trim().is_empty() {
                blocks.push(text);
            }
        }
    }

    if blocks.is_empty() {
        String::new()
    } else {
        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }
}

fn render_services(block: &ServicesBlock, required: &FxHashSet<SyntaxNode>) -> String {
    let services: Vec<String> = block
        .services()
        .filter(|s| is_required(s.syntax(), required))
        .map(|s| render_service_def(&s, 1, required))
        .collect();

    let mut out = String::from("services {\n");
    out.push_str(&services.join("\n"));
    out.push_str("\n}");
    out
}

fn render_service_def(
    service: &ServiceDef,
    depth: usize,
    required: &FxHashSet<SyntaxNode>,
) -> String {
    let name = service
        .name()
        .and_then(|n| n.text())
        .unwrap_or_default();

    let properties: Vec<String> = service
        .properties()
        .filter(|p| is_required(p, required))
        .map(|p| format!("{}{}", indent(depth + 1), verbatim_line(&p)))
        .collect();

    let mut out = format!("{}{} {{\n", indent(depth), name);
    out.push_str(&properties.join("\n"));
    out.push('\n');
    out.push_str(&indent(depth));
    out.push('}');
    out
}

fn render_use_case(use_case: &UseCase, required: &FxHashSet<SyntaxNode>) -> String {
    let name = use_case.name().unwrap_or_default();

    let scenarios: Vec<String> = use_case
        .scenarios()
        .filter(|s| is_required(s.syntax(), required))
        .map(|s| render_scenario(&s, 1, required))
        .collect();

    let mut out = format!("use_case \"{name}\" {{\n");
    out.push_str(&scenarios.join("\n\n"));
    out.push_str("\n}");
    out
}

fn render_scenario(scenario: &Scenario, depth: usize, required: &FxHashSet<SyntaxNode>) -> String {
    let mut lines = Vec::new();

    if let Some(trigger) = scenario.trigger() {
        lines.push(format!("{}{}", indent(depth), verbatim_line(trigger.syntax())));
    }

    for action in scenario.actions() {
        if is_required(action.syntax(), required) {
            lines.push(format!(
                "{}{}",
                indent(depth + 1),
                verbatim_line(action.syntax())
            ));
        }
    }

    lines.join("\n")
}
