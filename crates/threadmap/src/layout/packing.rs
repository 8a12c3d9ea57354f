//! Column grouping and collision resolution.

use std::{cmp::Ordering, collections::BTreeMap};

use log::trace;

use threadmap_core::{geometry::Span, identifier::ThreadId};

use crate::{layout::settled, measure::Heights, tree::ThreadTree};

/// Thread ids grouped by depth, shallowest column first.
///
/// Only depths that hold a thread have a column. Built once per recompute;
/// the tree must not change shape while it is in use.
#[derive(Debug, Default)]
pub(super) struct Columns {
    columns: BTreeMap<usize, Vec<ThreadId>>,
}

impl Columns {
    pub(super) fn from_tree(tree: &ThreadTree) -> Self {
        let mut columns: BTreeMap<usize, Vec<ThreadId>> = BTreeMap::new();
        for thread in tree.iter() {
            columns.entry(thread.depth()).or_default().push(thread.id());
        }
        Self { columns }
    }

    /// Number of populated columns.
    pub(super) fn len(&self) -> usize {
        self.columns.len()
    }

    /// `(depth, column)` pairs in increasing depth.
    pub(super) fn iter(&self) -> impl Iterator<Item = (usize, &[ThreadId])> {
        self.columns
            .iter()
            .map(|(&depth, column)| (depth, column.as_slice()))
    }
}

/// Sort key placing siblings under their parent, then by anchor, then by age.
#[derive(Debug, Clone, Copy)]
struct PackKey {
    parent_y: f32,
    anchor_frac: f32,
    created_at: u64,
}

impl PackKey {
    fn of(tree: &ThreadTree, id: ThreadId) -> Option<Self> {
        let thread = tree.get(id)?;
        let parent_y = thread
            .parent()
            .and_then(|parent| tree.get(parent))
            .and_then(|parent| parent.resolved_y())
            .unwrap_or(0.0);

        Some(Self {
            parent_y,
            anchor_frac: thread.anchor_frac(),
            created_at: thread.created_at().get(),
        })
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.parent_y
            .total_cmp(&other.parent_y)
            .then(self.anchor_frac.total_cmp(&other.anchor_frac))
            .then(self.created_at.cmp(&other.created_at))
    }
}

/// Packs one column and returns how many threads had to be pushed down.
///
/// Each thread starts at its preferred position (`fallback_y` if it has none,
/// which also becomes its preferred position) and is moved down just enough to
/// sit `min_gap` below the previous thread of the sorted column. A thread whose
/// stored `y` is already within tolerance of that target keeps it.
pub(super) fn pack_column(
    tree: &mut ThreadTree,
    heights: &Heights,
    column: &[ThreadId],
    min_gap: f32,
    fallback_y: f32,
) -> usize {
    let mut ordered: Vec<(PackKey, ThreadId)> = column
        .iter()
        .filter_map(|&id| PackKey::of(tree, id).map(|key| (key, id)))
        .collect();
    ordered.sort_by(|(a, _), (b, _)| a.compare(b));

    let mut previous: Option<Span> = None;
    let mut pushes = 0;

    for (_, id) in ordered {
        let height = heights.get(id);
        let Ok(thread) = tree.get_mut(id) else {
            continue;
        };

        let preferred = match thread.pref_y() {
            Some(pref_y) => pref_y,
            None => {
                thread.set_pref_y(fallback_y);
                fallback_y
            }
        };

        let wanted = Span::from_top(preferred, height);
        let target = match previous {
            Some(above) if above.gap_to(&wanted) < min_gap => {
                let pushed = above.bottom() + min_gap;
                pushes += 1;
                trace!(id:% = id, preferred, y = pushed; "Thread pushed down");
                pushed
            }
            _ => preferred,
        };

        let y = match thread.y() {
            Some(current) if settled(current, target) => current,
            _ => {
                thread.set_y(target);
                target
            }
        };
        previous = Some(Span::from_top(y, height));
    }

    pushes
}
