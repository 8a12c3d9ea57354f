//! The position store: the authoritative, mutable set of threads.
//!
//! [`ThreadTree`] owns every [`Thread`] and is the only way to add, remove or
//! pin threads. Each mutation keeps the forest referentially intact: no
//! surviving thread points at a removed parent, and no highlight points at a
//! removed branch.
//!
//! Threads are kept in insertion order, so iteration is deterministic.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use log::{debug, trace, warn};

use threadmap_core::identifier::{StampClock, ThreadId};

use crate::{
    error::TreeError,
    thread::{Highlight, Thread},
};

/// Attributes of a thread about to be inserted.
///
/// # Examples
///
/// ```
/// use threadmap::{NewThread, ThreadTree};
///
/// let mut tree = ThreadTree::new();
/// let root = tree.insert(None, NewThread::new().with_title("main")).unwrap();
/// let child = tree
///     .insert(Some(root), NewThread::new().with_anchor_frac(0.3))
///     .unwrap();
///
/// assert_eq!(tree.get(child).unwrap().depth(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NewThread {
    anchor_frac: Option<f32>,
    pref_y: Option<f32>,
    title: String,
}

impl NewThread {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records where in the parent this thread originated.
    pub fn with_anchor_frac(mut self, anchor_frac: f32) -> Self {
        self.anchor_frac = Some(anchor_frac);
        self
    }

    /// Gives the thread an initial preferred position.
    pub fn with_pref_y(mut self, pref_y: f32) -> Self {
        self.pref_y = Some(pref_y);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Owned forest of threads.
#[derive(Debug, Clone, Default)]
pub struct ThreadTree {
    threads: IndexMap<ThreadId, Thread>,
    next_id: u64,
    clock: StampClock,
}

impl ThreadTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from a snapshot of existing threads.
    ///
    /// Ids, depths, stamps and parent links are kept exactly as given. Parent
    /// references that do not resolve are kept too; the layout engine treats
    /// such threads as unanchored. Newly inserted threads receive ids and
    /// stamps after the largest ones in the snapshot.
    pub fn from_threads(threads: impl IntoIterator<Item = Thread>) -> Self {
        let mut tree = Self::new();

        for thread in threads {
            tree.next_id = tree.next_id.max(thread.id().get().saturating_add(1));
            tree.clock.observe(thread.created_at());
            if let Some(previous) = tree.threads.insert(thread.id(), thread) {
                warn!(id:% = previous.id(); "Duplicate thread id in snapshot, keeping the later one");
            }
        }

        let dangling = tree.threads.values().filter_map(|thread| {
            thread
                .parent()
                .filter(|parent| !tree.threads.contains_key(parent))
                .map(|parent| (thread.id(), parent))
        });
        for (id, parent) in dangling {
            warn!(id:% = id, parent:% = parent; "Snapshot thread has a dangling parent");
        }

        debug!(threads_count = tree.threads.len(); "Tree restored from snapshot");
        tree
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn contains(&self, id: ThreadId) -> bool {
        self.threads.contains_key(&id)
    }

    pub fn get(&self, id: ThreadId) -> Option<&Thread> {
        self.threads.get(&id)
    }

    /// Iterates over all threads in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Thread> {
        self.threads.values()
    }

    /// Iterates over the depth-0 threads in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &Thread> {
        self.threads.values().filter(|thread| thread.is_root())
    }

    /// Iterates over the immediate children of `id`.
    pub fn children(&self, id: ThreadId) -> impl Iterator<Item = &Thread> {
        self.threads
            .values()
            .filter(move |thread| thread.parent() == Some(id))
    }

    /// Returns `id` followed by all of its transitive descendants, breadth first.
    ///
    /// Returns an empty list if `id` is not in the tree.
    pub fn descendants(&self, id: ThreadId) -> Vec<ThreadId> {
        if !self.contains(id) {
            return Vec::new();
        }

        let mut child_index: HashMap<ThreadId, Vec<ThreadId>> = HashMap::new();
        for thread in self.threads.values() {
            if let Some(parent) = thread.parent() {
                child_index.entry(parent).or_default().push(thread.id());
            }
        }

        let mut found = vec![id];
        let mut seen = HashSet::from([id]);
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            for &child in child_index.get(&current).into_iter().flatten() {
                // Guards against cycles in hand-built snapshots.
                if seen.insert(child) {
                    found.push(child);
                    queue.push_back(child);
                }
            }
        }

        found
    }

    /// The deepest column index, or `None` for an empty tree.
    pub fn max_depth(&self) -> Option<usize> {
        self.threads.values().map(Thread::depth).max()
    }

    /// Adds a thread under `parent`, or as a new root if `parent` is `None`.
    ///
    /// The new thread gets a fresh id, the next creation stamp and a depth one
    /// deeper than its parent.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownThread`] if `parent` is not in the tree.
    /// - [`TreeError::AnchorOutOfRange`] if the anchor fraction is not in `[0, 1]`.
    /// - [`TreeError::InvalidPosition`] if the initial `pref_y` is not finite.
    pub fn insert(
        &mut self,
        parent: Option<ThreadId>,
        new: NewThread,
    ) -> Result<ThreadId, TreeError> {
        let depth = match parent {
            Some(parent_id) => {
                self.get(parent_id)
                    .ok_or(TreeError::UnknownThread(parent_id))?
                    .depth()
                    .saturating_add(1)
            }
            None => 0,
        };
        if let Some(anchor_frac) = new.anchor_frac {
            check_anchor(anchor_frac)?;
        }
        if let Some(pref_y) = new.pref_y {
            check_position(pref_y)?;
        }

        let id = ThreadId::new(self.next_id);
        self.next_id += 1;

        let mut thread = Thread::new(id, parent, depth, self.clock.tick()).with_title(new.title);
        if let Some(anchor_frac) = new.anchor_frac {
            thread = thread.with_anchor_frac(anchor_frac);
        }
        if let Some(pref_y) = new.pref_y {
            thread = thread.with_pref_y(pref_y);
        }

        trace!(id:% = id, parent:? = parent.map(|p| p.get()), depth; "Thread inserted");
        self.threads.insert(id, thread);
        Ok(id)
    }

    /// Spawns a branch from `parent` and records a highlight on the parent
    /// pointing at it.
    ///
    /// The branch's anchor fraction is set to `anchor_frac`, overriding any
    /// anchor given in `new`.
    ///
    /// # Errors
    ///
    /// Same as [`ThreadTree::insert`].
    pub fn branch(
        &mut self,
        parent: ThreadId,
        anchor_frac: f32,
        excerpt: impl Into<String>,
        new: NewThread,
    ) -> Result<ThreadId, TreeError> {
        let child = self.insert(Some(parent), new.with_anchor_frac(anchor_frac))?;
        if let Some(parent_thread) = self.threads.get_mut(&parent) {
            parent_thread.push_highlight(Highlight::new(child, anchor_frac, excerpt));
        }
        Ok(child)
    }

    /// Removes `id` and every transitive descendant.
    ///
    /// Highlights on surviving threads that point at any removed thread are
    /// dropped as well. Nothing is removed if `id` is unknown.
    ///
    /// Returns the removed ids, `id` first.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownThread`] if `id` is not in the tree.
    pub fn remove_subtree(&mut self, id: ThreadId) -> Result<Vec<ThreadId>, TreeError> {
        if !self.contains(id) {
            return Err(TreeError::UnknownThread(id));
        }

        let removed = self.descendants(id);
        let removed_set: HashSet<ThreadId> = removed.iter().copied().collect();

        self.threads
            .retain(|thread_id, _| !removed_set.contains(thread_id));

        let scrubbed: usize = self
            .threads
            .values_mut()
            .map(|thread| thread.retain_highlights(|target| !removed_set.contains(&target)))
            .sum();

        debug!(
            root:% = id,
            removed_count = removed.len(),
            highlights_scrubbed = scrubbed;
            "Subtree removed"
        );
        Ok(removed)
    }

    /// Sets or clears the manual flag without touching positions.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownThread`] if `id` is not in the tree.
    pub fn set_manual(&mut self, id: ThreadId, manual: bool) -> Result<(), TreeError> {
        self.get_mut(id)?.set_manual(manual);
        Ok(())
    }

    /// Pins a thread at `y`: marks it manual and sets both `pref_y` and `y`.
    ///
    /// No other thread is moved; run a recompute afterwards to restore the
    /// no-overlap guarantee.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownThread`] if `id` is not in the tree.
    /// - [`TreeError::InvalidPosition`] if `y` is not finite.
    pub fn set_manual_position(&mut self, id: ThreadId, y: f32) -> Result<(), TreeError> {
        check_position(y)?;
        let thread = self.get_mut(id)?;
        thread.set_manual(true);
        thread.set_pref_y(y);
        thread.set_y(y);
        Ok(())
    }

    /// Verifies that every parent link resolves and every depth is one more
    /// than its parent's (roots at depth 0).
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in insertion order.
    pub fn check_integrity(&self) -> Result<(), TreeError> {
        for thread in self.threads.values() {
            let expected = match thread.parent() {
                Some(parent) => {
                    self.get(parent)
                        .ok_or(TreeError::DanglingParent {
                            id: thread.id(),
                            parent,
                        })?
                        .depth()
                        .saturating_add(1)
                }
                None => 0,
            };

            if thread.depth() != expected {
                return Err(TreeError::DepthMismatch {
                    id: thread.id(),
                    expected,
                    found: thread.depth(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn get_mut(&mut self, id: ThreadId) -> Result<&mut Thread, TreeError> {
        self.threads
            .get_mut(&id)
            .ok_or(TreeError::UnknownThread(id))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Thread> {
        self.threads.values_mut()
    }
}

fn check_anchor(anchor_frac: f32) -> Result<f32, TreeError> {
    if (0.0..=1.0).contains(&anchor_frac) {
        Ok(anchor_frac)
    } else {
        Err(TreeError::AnchorOutOfRange(anchor_frac))
    }
}

fn check_position(y: f32) -> Result<f32, TreeError> {
    if y.is_finite() {
        Ok(y)
    } else {
        Err(TreeError::InvalidPosition(y))
    }
}
