//! Placements handed to a renderer.
//!
//! After a recompute a renderer needs, per thread, a rectangle: the column
//! offset of its depth, its resolved `y`, the configured width and its measured
//! height. Connectors between a parent and a child start on the parent's right
//! edge at the child's anchor point and end on the child's left edge at its
//! vertical center.

use std::collections::HashMap;

use threadmap_core::{
    geometry::{Bounds, Point, Size},
    identifier::ThreadId,
};

use crate::{layout::Engine, measure::Heights, tree::ThreadTree};

/// Final rectangle of one thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    id: ThreadId,
    depth: usize,
    bounds: Bounds,
    manual: bool,
}

impl Placement {
    pub fn id(&self) -> ThreadId {
        self.id
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }
}

/// Line from a parent's anchor point to a child.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    parent: ThreadId,
    child: ThreadId,
    start: Point,
    end: Point,
}

impl Connector {
    pub fn parent(&self) -> ThreadId {
        self.parent
    }

    pub fn child(&self) -> ThreadId {
        self.child
    }

    /// Start point on the parent's right edge.
    pub fn start(&self) -> Point {
        self.start
    }

    /// End point on the child's left edge.
    pub fn end(&self) -> Point {
        self.end
    }
}

/// Every placement and connector of a laid out tree, in tree order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    placements: Vec<Placement>,
    connectors: Vec<Connector>,
}

impl Layout {
    /// Reads positions from `tree`. Threads that were never laid out are
    /// placed at their preferred position, or at the top margin.
    pub(crate) fn from_tree(engine: &Engine, tree: &ThreadTree, heights: &Heights) -> Self {
        let config = engine.config();

        let placements: Vec<Placement> = tree
            .iter()
            .map(|thread| {
                let top_left = Point::new(
                    engine.column_left(thread.depth()),
                    thread.resolved_y().unwrap_or(config.top_margin()),
                );
                let size = Size::new(config.thread_width(), heights.get(thread.id()));
                Placement {
                    id: thread.id(),
                    depth: thread.depth(),
                    bounds: top_left.to_bounds(size),
                    manual: thread.is_manual(),
                }
            })
            .collect();

        let by_id: HashMap<ThreadId, &Placement> = placements
            .iter()
            .map(|placement| (placement.id, placement))
            .collect();

        let connectors = tree
            .iter()
            .filter_map(|thread| {
                let parent_id = thread.parent()?;
                let parent = by_id.get(&parent_id)?.bounds;
                let child = by_id.get(&thread.id())?.bounds;

                Some(Connector {
                    parent: parent_id,
                    child: thread.id(),
                    start: Point::new(
                        parent.max_x(),
                        parent.min_y() + thread.anchor_frac() * parent.height(),
                    ),
                    end: Point::new(child.min_x(), child.vertical_span().center()),
                })
            })
            .collect();

        Self {
            placements,
            connectors,
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn placement(&self, id: ThreadId) -> Option<&Placement> {
        self.placements.iter().find(|placement| placement.id == id)
    }

    /// Smallest bounds containing every placement, or `None` when empty.
    pub fn bounds(&self) -> Option<Bounds> {
        self.placements
            .iter()
            .map(Placement::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{layout::RecomputeOptions, tree::NewThread};

    #[test]
    fn test_placements_and_connectors() {
        let mut tree = ThreadTree::new();
        let root = tree.insert(None, NewThread::new()).unwrap();
        let child = tree
            .branch(root, 0.2, "excerpt", NewThread::new())
            .unwrap();
        let heights: HashMap<ThreadId, f32> = HashMap::from([(root, 300.0), (child, 100.0)]);

        let engine = Engine::default();
        let layout = engine.layout(&mut tree, &heights, RecomputeOptions::new());

        let root_bounds = layout.placement(root).unwrap().bounds();
        assert_approx_eq!(f32, root_bounds.min_x(), 0.0);
        assert_approx_eq!(f32, root_bounds.min_y(), 40.0);
        assert_approx_eq!(f32, root_bounds.width(), 420.0);
        assert_approx_eq!(f32, root_bounds.height(), 300.0);

        let child_placement = layout.placement(child).unwrap();
        assert_eq!(child_placement.depth(), 1);
        assert_approx_eq!(f32, child_placement.bounds().min_x(), 500.0);
        assert_approx_eq!(f32, child_placement.bounds().min_y(), 50.0);

        assert_eq!(layout.connectors().len(), 1);
        let connector = &layout.connectors()[0];
        assert_eq!(connector.parent(), root);
        assert_eq!(connector.child(), child);
        assert_approx_eq!(f32, connector.start().x(), 420.0);
        assert_approx_eq!(f32, connector.start().y(), 100.0);
        assert_approx_eq!(f32, connector.end().x(), 500.0);
        assert_approx_eq!(f32, connector.end().y(), 100.0);

        let bounds = layout.bounds().unwrap();
        assert_approx_eq!(f32, bounds.min_y(), 40.0);
        assert_approx_eq!(f32, bounds.max_y(), 340.0);
        assert_approx_eq!(f32, bounds.max_x(), 920.0);
    }

    #[test]
    fn test_empty_layout() {
        let tree = ThreadTree::new();
        let heights: HashMap<ThreadId, f32> = HashMap::new();
        let layout = Engine::default().placements(&tree, &heights);
        assert!(layout.placements().is_empty());
        assert!(layout.bounds().is_none());
    }
}
