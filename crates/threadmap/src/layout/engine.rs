//! The layout engine and its configuration surface.

use log::{debug, info, trace, warn};

use threadmap_core::identifier::ThreadId;

use crate::{
    config::LayoutConfig,
    error::{ConfigError, TreeError},
    layout::{
        centering::{center_parents, child_index},
        POSITION_TOLERANCE, column_left,
        packing::{Columns, pack_column},
        settled,
    },
    measure::{Heights, MeasureHeight},
    placement::Layout,
    tree::ThreadTree,
};

/// Parents that move less than this during centering count as settled.
const CENTERING_TOLERANCE: f32 = 0.01;

/// Per-call switches for [`Engine::recompute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecomputeOptions {
    center_parents: bool,
    centering_passes: usize,
}

impl Default for RecomputeOptions {
    fn default() -> Self {
        Self {
            center_parents: false,
            centering_passes: 1,
        }
    }
}

impl RecomputeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying the centering defaults of `config`.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            center_parents: config.center_parents(),
            centering_passes: config.centering_passes(),
        }
    }

    /// Enables or disables the parent centering pass.
    pub fn with_center_parents(mut self, center: bool) -> Self {
        self.center_parents = center;
        self
    }

    /// Sets how many centering rounds may run.
    ///
    /// One round reproduces the classic single-pass behavior. More rounds
    /// iterate toward a fixed point and stop early once no parent moves.
    /// Zero is treated as one.
    pub fn with_centering_passes(mut self, passes: usize) -> Self {
        self.centering_passes = passes;
        self
    }

    pub fn center_parents(&self) -> bool {
        self.center_parents
    }

    pub fn centering_passes(&self) -> usize {
        self.centering_passes.max(1)
    }
}

/// Summary of one [`Engine::recompute`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecomputeStats {
    /// Threads laid out.
    pub threads: usize,
    /// Depth columns visited.
    pub columns: usize,
    /// Threads pushed below their preferred position, summed over all packings.
    pub pushes: usize,
    /// Centering rounds that moved at least one parent.
    pub centering_rounds: usize,
    /// Vertical shift applied by normalization.
    pub shift: f32,
}

/// Column layout engine.
///
/// The engine holds only configuration; all layout state lives in the
/// [`ThreadTree`] passed to [`Engine::recompute`].
///
/// # Examples
///
/// ```
/// use threadmap::{
///     NewThread, ThreadTree,
///     layout::{Engine, RecomputeOptions},
///     measure::FixedHeight,
/// };
///
/// let mut tree = ThreadTree::new();
/// let root = tree.insert(None, NewThread::new()).unwrap();
///
/// let engine = Engine::default();
/// engine.recompute(&mut tree, &FixedHeight(200.0), RecomputeOptions::new());
///
/// assert_eq!(tree.get(root).unwrap().y(), Some(40.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: LayoutConfig,
}

impl Engine {
    /// Creates an engine using `config` as is.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Starts an [`EngineBuilder`] from the default configuration.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Left edge of the column holding threads at `depth`.
    pub fn column_left(&self, depth: usize) -> f32 {
        column_left(depth, self.config.thread_width(), self.config.column_gap())
    }

    /// Recomputes `pref_y` and `y` for every thread of `tree`.
    ///
    /// Heights are measured once at the start of the call; failed
    /// measurements fall back to the configured default height. An empty
    /// tree is left untouched.
    ///
    /// With centering disabled, calling this twice without changing the tree
    /// or the measurements leaves every position where the first call put it.
    pub fn recompute<M>(
        &self,
        tree: &mut ThreadTree,
        measure: &M,
        options: RecomputeOptions,
    ) -> RecomputeStats
    where
        M: MeasureHeight + ?Sized,
    {
        if tree.is_empty() {
            debug!("Nothing to lay out");
            return RecomputeStats::default();
        }

        let heights = Heights::measure(tree, measure, self.config.default_height());
        let columns = Columns::from_tree(tree);
        let mut stats = RecomputeStats {
            threads: tree.len(),
            columns: columns.len(),
            ..RecomputeStats::default()
        };

        self.seed_roots(tree, &heights);

        for (depth, column) in columns.iter() {
            if depth > 0 {
                self.propagate(tree, &heights, column);
            }
            stats.pushes += self.pack(tree, &heights, column);
        }
        debug!(pushes = stats.pushes; "Columns packed");

        if options.center_parents() {
            stats.centering_rounds = self.center(
                tree,
                &heights,
                &columns,
                options.centering_passes(),
                &mut stats.pushes,
            );
        }

        stats.shift = self.normalize(tree);

        info!(
            threads = stats.threads,
            columns = stats.columns,
            pushes = stats.pushes,
            centering_rounds = stats.centering_rounds,
            shift = stats.shift;
            "Layout recomputed"
        );
        stats
    }

    /// Recomputes `tree` and returns the resulting placements and connectors.
    pub fn layout<M>(
        &self,
        tree: &mut ThreadTree,
        measure: &M,
        options: RecomputeOptions,
    ) -> Layout
    where
        M: MeasureHeight + ?Sized,
    {
        self.recompute(tree, measure, options);
        self.placements(tree, measure)
    }

    /// Reads the current positions of `tree` into placements, without
    /// recomputing anything.
    pub fn placements<M>(&self, tree: &ThreadTree, measure: &M) -> Layout
    where
        M: MeasureHeight + ?Sized,
    {
        let heights = Heights::measure(tree, measure, self.config.default_height());
        Layout::from_tree(self, tree, &heights)
    }

    /// Pins `id` at `y` as a manual thread without repacking anything.
    ///
    /// Siblings may overlap the pinned thread until the next
    /// [`Engine::recompute`].
    ///
    /// # Errors
    ///
    /// Same as [`ThreadTree::set_manual_position`].
    pub fn set_manual_position(
        &self,
        tree: &mut ThreadTree,
        id: ThreadId,
        y: f32,
    ) -> Result<(), TreeError> {
        tree.set_manual_position(id, y)?;
        debug!(id:% = id, y; "Thread pinned");
        Ok(())
    }

    /// Pass 1: stacks roots without a preferred position below the previous
    /// root, in creation order.
    fn seed_roots(&self, tree: &mut ThreadTree, heights: &Heights) {
        let mut roots: Vec<(ThreadId, _, Option<f32>)> = tree
            .roots()
            .map(|root| (root.id(), root.created_at(), root.pref_y()))
            .collect();
        roots.sort_by_key(|&(_, created_at, _)| created_at);

        let mut previous_bottom: Option<f32> = None;
        let mut seeded = 0usize;
        for (id, _, pref_y) in roots {
            let top = match pref_y {
                Some(pref_y) => pref_y,
                None => {
                    let top = previous_bottom
                        .map_or(self.config.top_margin(), |bottom| {
                            bottom + self.config.root_gap()
                        });
                    if let Ok(root) = tree.get_mut(id) {
                        root.set_pref_y(top);
                    }
                    seeded += 1;
                    trace!(id:% = id, pref_y = top; "Root seeded");
                    top
                }
            };
            previous_bottom = Some(top + heights.get(id));
        }

        if seeded > 0 {
            debug!(seeded; "Roots seeded");
        }
    }

    /// Pass 2 for one column: anchors every non-manual thread to the point
    /// inside its parent it was branched from.
    fn propagate(&self, tree: &mut ThreadTree, heights: &Heights, column: &[ThreadId]) {
        let mut updates = Vec::with_capacity(column.len());

        for &id in column {
            let Some(thread) = tree.get(id) else {
                continue;
            };
            if thread.is_manual() {
                continue;
            }
            let Some(parent_id) = thread.parent() else {
                continue;
            };
            let Some(parent) = tree.get(parent_id) else {
                warn!(id:% = id, parent:% = parent_id; "Parent missing, keeping previous position");
                continue;
            };

            let parent_top = parent.resolved_y().unwrap_or(self.config.top_margin());
            let anchor_y = parent_top + thread.anchor_frac() * heights.get(parent_id);
            let pref_y = anchor_y - heights.get(id) / 2.0;
            if !thread
                .pref_y()
                .is_some_and(|current| settled(current, pref_y))
            {
                updates.push((id, pref_y));
            }
        }

        for (id, pref_y) in updates {
            if let Ok(thread) = tree.get_mut(id) {
                thread.set_pref_y(pref_y);
            }
        }
    }

    /// Pass 3 for one column.
    fn pack(&self, tree: &mut ThreadTree, heights: &Heights, column: &[ThreadId]) -> usize {
        pack_column(
            tree,
            heights,
            column,
            self.config.min_gap(),
            self.config.top_margin(),
        )
    }

    /// Pass 4: centers parents over their children and repacks, up to
    /// `passes` times. Returns the number of rounds that moved a parent.
    fn center(
        &self,
        tree: &mut ThreadTree,
        heights: &Heights,
        columns: &Columns,
        passes: usize,
        pushes: &mut usize,
    ) -> usize {
        let families = child_index(tree);
        let mut rounds = 0;

        for _ in 0..passes {
            let moved = center_parents(tree, heights, &families, CENTERING_TOLERANCE);
            if moved == 0 {
                break;
            }
            rounds += 1;

            for (_, column) in columns.iter() {
                *pushes += self.pack(tree, heights, column);
            }
            debug!(round = rounds, moved; "Parents centered");
        }

        rounds
    }

    /// Pass 5: shifts everything so the topmost thread sits at the top margin.
    /// Returns the applied shift.
    ///
    /// Shifts within [`POSITION_TOLERANCE`] are skipped. Threads that end up
    /// within the tolerance of the margin are snapped onto it, so the topmost
    /// thread sits exactly at the margin.
    fn normalize(&self, tree: &mut ThreadTree) -> f32 {
        let Some(min_y) = tree
            .iter()
            .filter_map(|thread| thread.y())
            .reduce(f32::min)
        else {
            return 0.0;
        };

        let top = self.config.top_margin();
        let mut shift = top - min_y;
        if shift.abs() > POSITION_TOLERANCE {
            for thread in tree.iter_mut() {
                thread.shift(shift);
            }
        } else {
            shift = 0.0;
        }

        for thread in tree.iter_mut() {
            thread.snap_to(top, POSITION_TOLERANCE);
        }
        shift
    }
}

/// Builder for [`Engine`] that validates the configuration on
/// [`EngineBuilder::build`].
///
/// # Examples
///
/// ```
/// use threadmap::layout::EngineBuilder;
///
/// let engine = EngineBuilder::new()
///     .with_thread_width(300.0)
///     .with_min_gap(20.0)
///     .build()
///     .unwrap();
/// assert_eq!(engine.column_left(1), 380.0);
///
/// assert!(EngineBuilder::new().with_root_gap(-1.0).build().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: LayoutConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn with_thread_width(mut self, width: f32) -> Self {
        self.config = self.config.with_thread_width(width);
        self
    }

    pub fn with_column_gap(mut self, gap: f32) -> Self {
        self.config = self.config.with_column_gap(gap);
        self
    }

    pub fn with_min_gap(mut self, gap: f32) -> Self {
        self.config = self.config.with_min_gap(gap);
        self
    }

    pub fn with_root_gap(mut self, gap: f32) -> Self {
        self.config = self.config.with_root_gap(gap);
        self
    }

    pub fn with_top_margin(mut self, margin: f32) -> Self {
        self.config = self.config.with_top_margin(margin);
        self
    }

    pub fn with_default_height(mut self, height: f32) -> Self {
        self.config = self.config.with_default_height(height);
        self
    }

    /// Validates the configuration and creates the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for unusable constants.
    pub fn build(self) -> Result<Engine, ConfigError> {
        self.config.validate()?;
        Ok(Engine::new(self.config))
    }
}
