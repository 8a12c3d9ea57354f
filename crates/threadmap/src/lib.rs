//! Threadmap - incremental column layout for forests of conversation threads.
//!
//! Threads are placed in fixed-width columns by depth. Within a column they
//! are packed top to bottom without overlap, anchored near the point of the
//! parent they were branched from, and threads a user has dragged keep their
//! position across recomputes.
//!
//! The crate is a pure in-memory transformation: a [`ThreadTree`] holds the
//! threads, a [`MeasureHeight`](measure::MeasureHeight) provider reports
//! rendered heights, and the [`layout::Engine`] writes positions back into the
//! tree. [`Canvas`] ties these together with the drag lifecycle of an
//! interactive surface.

pub mod config;
pub mod layout;
pub mod measure;
pub mod placement;

mod error;
mod thread;
mod tree;

pub use threadmap_core::{geometry, identifier};

pub use error::{ConfigError, ThreadmapError, TreeError};
pub use thread::{DEFAULT_ANCHOR, Highlight, Thread};
pub use tree::{NewThread, ThreadTree};

use log::{debug, info, warn};

use config::LayoutConfig;
use identifier::ThreadId;
use layout::{Engine, RecomputeOptions, RecomputeStats};
use measure::MeasureHeight;
use placement::Layout;

/// An interactive layout surface.
///
/// A canvas owns an [`Engine`] and, once attached, the [`ThreadTree`] being
/// displayed. Dragging a thread is a sequence of cheap position updates
/// followed by a single recompute when the drag ends.
///
/// # Examples
///
/// ```
/// use threadmap::{Canvas, NewThread, ThreadTree, measure::FixedHeight};
///
/// let mut tree = ThreadTree::new();
/// let root = tree.insert(None, NewThread::new()).unwrap();
/// let child = tree.insert(Some(root), NewThread::new()).unwrap();
///
/// let mut canvas = Canvas::default();
/// canvas.attach(tree);
/// canvas.recompute(&FixedHeight(100.0));
///
/// canvas.begin_drag(child).unwrap();
/// canvas.drag_to(300.0).unwrap();
/// canvas.drag_to(320.0).unwrap();
/// canvas.end_drag(&FixedHeight(100.0));
///
/// let dragged = canvas.tree().unwrap().get(child).unwrap();
/// assert!(dragged.is_manual());
/// assert_eq!(dragged.y(), Some(320.0));
/// ```
#[derive(Debug, Default)]
pub struct Canvas {
    engine: Engine,
    options: RecomputeOptions,
    tree: Option<ThreadTree>,
    dragging: Option<ThreadId>,
}

impl Canvas {
    /// Creates a canvas whose engine and default options come from `config`.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            options: RecomputeOptions::from_config(&config),
            engine: Engine::new(config),
            tree: None,
            dragging: None,
        }
    }

    /// Overrides the options used by [`Canvas::recompute`] and
    /// [`Canvas::end_drag`].
    pub fn with_options(mut self, options: RecomputeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn options(&self) -> RecomputeOptions {
        self.options
    }

    /// Attaches a tree, returning the previously attached one.
    pub fn attach(&mut self, tree: ThreadTree) -> Option<ThreadTree> {
        debug!(threads_count = tree.len(); "Tree attached");
        self.dragging = None;
        self.tree.replace(tree)
    }

    /// Detaches and returns the current tree.
    pub fn detach(&mut self) -> Option<ThreadTree> {
        self.dragging = None;
        self.tree.take()
    }

    pub fn tree(&self) -> Option<&ThreadTree> {
        self.tree.as_ref()
    }

    /// Mutable access for structural edits between recomputes.
    pub fn tree_mut(&mut self) -> Option<&mut ThreadTree> {
        self.tree.as_mut()
    }

    /// The thread currently being dragged, if any.
    pub fn dragging(&self) -> Option<ThreadId> {
        self.dragging
    }

    /// Recomputes the attached tree.
    ///
    /// Returns `None` without doing anything if no tree is attached.
    pub fn recompute<M>(&mut self, measure: &M) -> Option<RecomputeStats>
    where
        M: MeasureHeight + ?Sized,
    {
        let Some(tree) = self.tree.as_mut() else {
            debug!("No tree attached, skipping recompute");
            return None;
        };
        Some(self.engine.recompute(tree, measure, self.options))
    }

    /// Starts dragging `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownThread`] if no tree is attached or the
    /// thread is not in it.
    pub fn begin_drag(&mut self, id: ThreadId) -> Result<(), TreeError> {
        match &self.tree {
            Some(tree) if tree.contains(id) => {
                if let Some(previous) = self.dragging.replace(id) {
                    warn!(previous:% = previous, id:% = id; "Drag restarted before the previous one ended");
                }
                debug!(id:% = id; "Drag started");
                Ok(())
            }
            _ => Err(TreeError::UnknownThread(id)),
        }
    }

    /// Moves the dragged thread to `y` and pins it there.
    ///
    /// Nothing else is repositioned until [`Canvas::end_drag`].
    ///
    /// # Errors
    ///
    /// - [`TreeError::NoActiveDrag`] if no drag is in progress.
    /// - [`TreeError::UnknownThread`] if the thread has been removed meanwhile.
    /// - [`TreeError::InvalidPosition`] if `y` is not finite.
    pub fn drag_to(&mut self, y: f32) -> Result<(), TreeError> {
        let id = self.dragging.ok_or(TreeError::NoActiveDrag)?;
        let tree = self.tree.as_mut().ok_or(TreeError::UnknownThread(id))?;
        tree.set_manual_position(id, y)
    }

    /// Ends the current drag with one recompute.
    ///
    /// Returns `None` if no tree is attached.
    pub fn end_drag<M>(&mut self, measure: &M) -> Option<RecomputeStats>
    where
        M: MeasureHeight + ?Sized,
    {
        if let Some(id) = self.dragging.take() {
            info!(id:% = id; "Drag ended");
        }
        self.recompute(measure)
    }

    /// Placements of the attached tree as last computed.
    pub fn placements<M>(&self, measure: &M) -> Option<Layout>
    where
        M: MeasureHeight + ?Sized,
    {
        self.tree
            .as_ref()
            .map(|tree| self.engine.placements(tree, measure))
    }
}
