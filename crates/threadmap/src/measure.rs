//! Height measurement.
//!
//! The engine never measures anything itself; it asks a [`MeasureHeight`]
//! provider for each thread's rendered height. Providers may fail, for example
//! when the rendering surface is not available yet. Failed, zero, negative and
//! non-finite measurements are replaced with the configured default height.

use std::collections::HashMap;

use log::debug;

use threadmap_core::identifier::ThreadId;

use crate::tree::ThreadTree;

/// Source of rendered thread heights.
///
/// Implemented for closures, for height maps, and by [`FixedHeight`] and
/// [`Unmeasured`].
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use threadmap::{identifier::ThreadId, measure::MeasureHeight};
///
/// let heights: HashMap<ThreadId, f32> = HashMap::from([(ThreadId::new(0), 120.0)]);
/// assert_eq!(heights.measure(ThreadId::new(0)), Some(120.0));
/// assert_eq!(heights.measure(ThreadId::new(1)), None);
///
/// let tall = |_id: ThreadId| Some(500.0_f32);
/// assert_eq!(tall.measure(ThreadId::new(1)), Some(500.0));
/// ```
pub trait MeasureHeight {
    /// Returns the rendered height of `id`, or `None` if it cannot be measured.
    fn measure(&self, id: ThreadId) -> Option<f32>;
}

impl<F> MeasureHeight for F
where
    F: Fn(ThreadId) -> Option<f32>,
{
    fn measure(&self, id: ThreadId) -> Option<f32> {
        self(id)
    }
}

impl MeasureHeight for HashMap<ThreadId, f32> {
    fn measure(&self, id: ThreadId) -> Option<f32> {
        self.get(&id).copied()
    }
}

/// Reports the same height for every thread.
#[derive(Debug, Clone, Copy)]
pub struct FixedHeight(pub f32);

impl MeasureHeight for FixedHeight {
    fn measure(&self, _id: ThreadId) -> Option<f32> {
        Some(self.0)
    }
}

/// Never measures anything, so every thread gets the default height.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unmeasured;

impl MeasureHeight for Unmeasured {
    fn measure(&self, _id: ThreadId) -> Option<f32> {
        None
    }
}

/// Heights for every thread of a tree, measured once.
#[derive(Debug, Clone, Default)]
pub(crate) struct Heights {
    heights: HashMap<ThreadId, f32>,
    default_height: f32,
}

impl Heights {
    /// Measures every thread in `tree`, substituting `default_height` for
    /// unusable measurements.
    pub(crate) fn measure<M>(tree: &ThreadTree, measure: &M, default_height: f32) -> Self
    where
        M: MeasureHeight + ?Sized,
    {
        let mut fallbacks = 0usize;
        let heights = tree
            .iter()
            .map(|thread| {
                let height = match measure.measure(thread.id()) {
                    Some(height) if height.is_finite() && height > 0.0 => height,
                    _ => {
                        fallbacks += 1;
                        default_height
                    }
                };
                (thread.id(), height)
            })
            .collect();

        if fallbacks > 0 {
            debug!(fallbacks, default_height; "Substituted default heights");
        }

        Self {
            heights,
            default_height,
        }
    }

    /// Height of `id`; the default for threads that were not measured.
    pub(crate) fn get(&self, id: ThreadId) -> f32 {
        self.heights
            .get(&id)
            .copied()
            .unwrap_or(self.default_height)
    }
}
