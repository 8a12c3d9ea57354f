//! Incremental column layout.
//!
//! Threads are placed in columns by depth and packed vertically within each
//! column. The horizontal position is a pure function of depth
//! ([`column_left`]); the vertical position is computed by
//! [`Engine::recompute`], which runs these passes over the whole forest:
//!
//! 1. **Root seeding** - unpositioned roots are stacked below the roots that
//!    already have a preferred position, in creation order.
//! 2. **Propagation** - every non-manual thread prefers to have its vertical
//!    center at its anchor point inside the parent.
//! 3. **Packing** - each column is sorted and swept top to bottom, pushing
//!    threads down until the minimum gap holds.
//! 4. **Centering** (optional) - parents are centered over their children and
//!    every column is packed again.
//! 5. **Normalization** - the whole forest is shifted so that the topmost
//!    thread sits at the top margin.
//!
//! Propagation and packing walk the columns together, shallowest first, so a
//! thread always anchors to a parent that has already been packed in the same
//! call.
//!
//! Positions that a pass would move by no more than [`POSITION_TOLERANCE`]
//! keep their stored value. Rounding in the passes therefore cannot make a
//! second recompute disagree with the first.

mod centering;
mod engine;
mod packing;

pub use engine::{Engine, EngineBuilder, RecomputeOptions, RecomputeStats};

/// Largest change to a stored position that counts as no change.
pub const POSITION_TOLERANCE: f32 = 0.01;

/// Whether `current` is already within [`POSITION_TOLERANCE`] of `target`.
fn settled(current: f32, target: f32) -> bool {
    (current - target).abs() <= POSITION_TOLERANCE
}

/// Left edge of the column at `depth`.
///
/// # Examples
///
/// ```
/// use threadmap::layout::column_left;
///
/// assert_eq!(column_left(0, 420.0, 80.0), 0.0);
/// assert_eq!(column_left(2, 420.0, 80.0), 1000.0);
/// ```
pub fn column_left(depth: usize, thread_width: f32, column_gap: f32) -> f32 {
    depth as f32 * (thread_width + column_gap)
}
