//! Selection state as a pure function over the grouped model.
//!
//! Selection is held externally as a flat set of entity ids; the tri-state
//! view (selected / partially selected / unselected) is recomputed from that
//! set on demand instead of being stored on the tree nodes.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::base::BlockRange;

use super::{Domain, GroupedModel};

/// Tri-state selection of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Selected,
    Partial,
    Unselected,
}

/// Computed selection view: per-node states plus use-case counts.
#[derive(Debug, Clone, Default)]
pub struct SelectionView {
    pub states: FxHashMap<String, SelectionState>,
    pub selected_use_cases: usize,
    pub total_use_cases: usize,
}

impl SelectionView {
    pub fn state(&self, id: &str) -> SelectionState {
        self.states
            .get(id)
            .copied()
            .unwrap_or(SelectionState::Unselected)
    }
}

/// Compute the tri-state view for a set of selected entity ids.
///
/// A use case is selected when its id is in the set. A subdomain is selected
/// when all of its use cases are (or its own id is in the set); a domain is
/// selected when all of its subdomains are. Any selected descendant makes
/// the ancestors partial.
pub fn compute_selection(selected: &FxHashSet<String>, model: &GroupedModel) -> SelectionView {
    let mut view = SelectionView::default();

    for domain in &model.domains {
        let mut selected_subs = 0;
        let mut partial_subs = 0;

        for sub in &domain.sub_domains {
            let total = sub.use_cases.len();
            let mut picked = 0;
            for uc in &sub.use_cases {
                view.total_use_cases += 1;
                if selected.contains(&uc.id) {
                    picked += 1;
                    view.selected_use_cases += 1;
                    view.states.insert(uc.id.clone(), SelectionState::Selected);
                }
            }

            let state = if selected.contains(&sub.id) || (total > 0 && picked == total) {
                SelectionState::Selected
            } else if picked > 0 {
                SelectionState::Partial
            } else {
                SelectionState::Unselected
            };
            match state {
                SelectionState::Selected => selected_subs += 1,
                SelectionState::Partial => partial_subs += 1,
                SelectionState::Unselected => {}
            }
            view.states.insert(sub.id.clone(), state);
        }

        let sub_count = domain.sub_domains.len();
        let state = if selected.contains(&domain.id) || (sub_count > 0 && selected_subs == sub_count)
        {
            SelectionState::Selected
        } else if selected_subs > 0 || partial_subs > 0 {
            SelectionState::Partial
        } else {
            SelectionState::Unselected
        };
        view.states.insert(domain.id.clone(), state);
    }

    view
}

/// Block ranges of the selected use cases, in tree order.
///
/// This is the input handed to the partial-source extractor when previewing
/// a selection.
pub fn selected_block_ranges(
    selected: &FxHashSet<String>,
    domains: &[Domain],
) -> Vec<BlockRange> {
    let mut ranges = Vec::new();
    for domain in domains {
        for sub in &domain.sub_domains {
            for uc in &sub.use_cases {
                if selected.contains(&uc.id) {
                    ranges.push(uc.block_range.clone());
                }
            }
        }
    }
    ranges
}
