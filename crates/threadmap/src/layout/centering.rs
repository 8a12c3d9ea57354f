//! Parent re-centering.

use std::collections::HashMap;

use log::trace;

use threadmap_core::{geometry::Span, identifier::ThreadId};

use crate::{measure::Heights, tree::ThreadTree};

/// Parents with at least one existing child, in tree order.
pub(super) fn child_index(tree: &ThreadTree) -> Vec<(ThreadId, Vec<ThreadId>)> {
    let mut index: HashMap<ThreadId, Vec<ThreadId>> = HashMap::new();
    for thread in tree.iter() {
        if let Some(parent) = thread.parent().filter(|&parent| tree.contains(parent)) {
            index.entry(parent).or_default().push(thread.id());
        }
    }

    tree.iter()
        .filter_map(|thread| index.remove_entry(&thread.id()))
        .collect()
}

/// Moves the preferred position of every non-manual parent so that it is
/// centered over the union of its children's packed spans.
///
/// Only preferred positions change; the caller repacks. Returns how many
/// parents moved by more than `tolerance`.
pub(super) fn center_parents(
    tree: &mut ThreadTree,
    heights: &Heights,
    families: &[(ThreadId, Vec<ThreadId>)],
    tolerance: f32,
) -> usize {
    let mut updates = Vec::new();

    for (parent, children) in families {
        let Some(parent_thread) = tree.get(*parent) else {
            continue;
        };
        if parent_thread.is_manual() {
            continue;
        }

        let extent = children
            .iter()
            .filter_map(|&child| {
                let top = tree.get(child)?.resolved_y()?;
                Some(Span::from_top(top, heights.get(child)))
            })
            .reduce(|acc, span| acc.union(&span));
        let Some(extent) = extent else {
            continue;
        };

        let centered = extent.center() - heights.get(*parent) / 2.0;
        let moved = parent_thread
            .pref_y()
            .is_none_or(|pref_y| (pref_y - centered).abs() > tolerance);
        if moved {
            updates.push((*parent, centered));
        }
    }

    for &(parent, centered) in &updates {
        if let Ok(thread) = tree.get_mut(parent) {
            trace!(id:% = parent, pref_y = centered; "Parent centered over children");
            thread.set_pref_y(centered);
        }
    }

    updates.len()
}
