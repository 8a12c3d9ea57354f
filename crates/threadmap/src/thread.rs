//! The thread node type stored in a [`ThreadTree`](crate::tree::ThreadTree).

use threadmap_core::identifier::{Stamp, ThreadId};

/// Anchor fraction assumed when a thread does not record one: the vertical
/// center of its parent.
pub const DEFAULT_ANCHOR: f32 = 0.5;

/// A back-reference from a thread to a branch that was spawned from it.
///
/// The excerpt is the piece of the parent's content the branch was created
/// from; `anchor_frac` is where that excerpt sits vertically within the parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    target: ThreadId,
    anchor_frac: f32,
    excerpt: String,
}

impl Highlight {
    pub fn new(target: ThreadId, anchor_frac: f32, excerpt: impl Into<String>) -> Self {
        Self {
            target,
            anchor_frac,
            excerpt: excerpt.into(),
        }
    }

    /// The branch this highlight spawned.
    pub fn target(&self) -> ThreadId {
        self.target
    }

    pub fn anchor_frac(&self) -> f32 {
        self.anchor_frac
    }

    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }
}

/// A single conversation thread: one positioned box in the layout.
///
/// Structural fields (`id`, `parent`, `depth`, `created_at`) are fixed at
/// construction. Position fields are written by the layout engine and by
/// manual drags through [`ThreadTree`](crate::tree::ThreadTree).
///
/// # Examples
///
/// ```
/// use threadmap::Thread;
/// use threadmap::identifier::{Stamp, ThreadId};
///
/// let thread = Thread::new(ThreadId::new(3), Some(ThreadId::new(1)), 1, Stamp::new(3))
///     .with_anchor_frac(0.25)
///     .with_title("follow-up");
///
/// assert_eq!(thread.anchor_frac(), 0.25);
/// assert!(!thread.is_root());
/// assert_eq!(thread.y(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    id: ThreadId,
    parent: Option<ThreadId>,
    depth: usize,
    created_at: Stamp,
    anchor_frac: Option<f32>,
    manual: bool,
    pref_y: Option<f32>,
    y: Option<f32>,
    title: String,
    highlights: Vec<Highlight>,
}

impl Thread {
    /// Creates an unpositioned thread.
    ///
    /// `depth` is trusted as given; use
    /// [`ThreadTree::check_integrity`](crate::tree::ThreadTree::check_integrity)
    /// to verify a hand-built forest.
    pub fn new(id: ThreadId, parent: Option<ThreadId>, depth: usize, created_at: Stamp) -> Self {
        Self {
            id,
            parent,
            depth,
            created_at,
            anchor_frac: None,
            manual: false,
            pref_y: None,
            y: None,
            title: String::new(),
            highlights: Vec::new(),
        }
    }

    pub fn with_anchor_frac(mut self, anchor_frac: f32) -> Self {
        self.anchor_frac = Some(anchor_frac);
        self
    }

    pub fn with_pref_y(mut self, pref_y: f32) -> Self {
        self.pref_y = Some(pref_y);
        self
    }

    pub fn with_y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlights.push(highlight);
        self
    }

    pub fn id(&self) -> ThreadId {
        self.id
    }

    pub fn parent(&self) -> Option<ThreadId> {
        self.parent
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    pub fn created_at(&self) -> Stamp {
        self.created_at
    }

    /// The recorded anchor fraction, or [`DEFAULT_ANCHOR`] if none was recorded.
    pub fn anchor_frac(&self) -> f32 {
        self.anchor_frac.unwrap_or(DEFAULT_ANCHOR)
    }

    /// The anchor fraction exactly as recorded.
    pub fn recorded_anchor_frac(&self) -> Option<f32> {
        self.anchor_frac
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Desired position before collision resolution.
    pub fn pref_y(&self) -> Option<f32> {
        self.pref_y
    }

    /// Resolved position after packing.
    pub fn y(&self) -> Option<f32> {
        self.y
    }

    /// `y` if resolved, else `pref_y`.
    pub fn resolved_y(&self) -> Option<f32> {
        self.y.or(self.pref_y)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub(crate) fn set_manual(&mut self, manual: bool) {
        self.manual = manual;
    }

    pub(crate) fn set_pref_y(&mut self, pref_y: f32) {
        self.pref_y = Some(pref_y);
    }

    pub(crate) fn set_y(&mut self, y: f32) {
        self.y = Some(y);
    }

    pub(crate) fn push_highlight(&mut self, highlight: Highlight) {
        self.highlights.push(highlight);
    }

    /// Drops highlights whose target fails `keep`; returns how many were dropped.
    pub(crate) fn retain_highlights(&mut self, mut keep: impl FnMut(ThreadId) -> bool) -> usize {
        let before = self.highlights.len();
        self.highlights.retain(|highlight| keep(highlight.target));
        before - self.highlights.len()
    }

    /// Moves both position fields by `dy`, leaving unset fields unset.
    pub(crate) fn shift(&mut self, dy: f32) {
        if let Some(pref_y) = self.pref_y.as_mut() {
            *pref_y += dy;
        }
        if let Some(y) = self.y.as_mut() {
            *y += dy;
        }
    }

    /// Moves `y` onto `line` if it lies within `tolerance` of it. `pref_y`
    /// follows when it was within `tolerance` of `y`.
    pub(crate) fn snap_to(&mut self, line: f32, tolerance: f32) {
        let Some(y) = self.y.filter(|y| (y - line).abs() <= tolerance) else {
            return;
        };
        if let Some(pref_y) = self
            .pref_y
            .as_mut()
            .filter(|pref_y| (**pref_y - y).abs() <= tolerance)
        {
            *pref_y = line;
        }
        self.y = Some(line);
    }
}
