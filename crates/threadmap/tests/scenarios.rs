//! Worked layout scenarios with hand-checked positions.

use std::collections::HashMap;

use float_cmp::assert_approx_eq;

use threadmap::{
    NewThread, ThreadTree,
    identifier::ThreadId,
    layout::{Engine, RecomputeOptions},
    measure::FixedHeight,
};

fn y_of(tree: &ThreadTree, id: ThreadId) -> f32 {
    tree.get(id).unwrap().y().unwrap()
}

fn pref_of(tree: &ThreadTree, id: ThreadId) -> f32 {
    tree.get(id).unwrap().pref_y().unwrap()
}

#[test]
fn scenario_single_root() {
    let mut tree = ThreadTree::new();
    let root = tree.insert(None, NewThread::new()).unwrap();

    Engine::default().recompute(&mut tree, &FixedHeight(200.0), RecomputeOptions::new());

    assert_approx_eq!(f32, y_of(&tree, root), 40.0);
}

#[test]
fn scenario_two_roots() {
    let mut tree = ThreadTree::new();
    let first = tree.insert(None, NewThread::new()).unwrap();
    let second = tree.insert(None, NewThread::new()).unwrap();
    let heights: HashMap<ThreadId, f32> = HashMap::from([(first, 200.0), (second, 150.0)]);

    Engine::default().recompute(&mut tree, &heights, RecomputeOptions::new());

    assert_approx_eq!(f32, y_of(&tree, first), 40.0);
    assert_approx_eq!(f32, y_of(&tree, second), 280.0);
}

#[test]
fn scenario_anchored_children_without_collision() {
    let mut tree = ThreadTree::new();
    let root = tree.insert(None, NewThread::new()).unwrap();
    let a = tree.branch(root, 0.2, "early point", NewThread::new()).unwrap();
    let b = tree.branch(root, 0.8, "late point", NewThread::new()).unwrap();
    let heights: HashMap<ThreadId, f32> = HashMap::from([(root, 300.0), (a, 100.0), (b, 100.0)]);

    Engine::default().recompute(&mut tree, &heights, RecomputeOptions::new());

    assert_approx_eq!(f32, y_of(&tree, root), 40.0);
    assert_approx_eq!(f32, pref_of(&tree, a), 50.0);
    assert_approx_eq!(f32, pref_of(&tree, b), 230.0);
    assert_approx_eq!(f32, y_of(&tree, a), 50.0);
    assert_approx_eq!(f32, y_of(&tree, b), 230.0);
}

#[test]
fn scenario_children_targeting_the_same_point() {
    let mut tree = ThreadTree::new();
    let root = tree
        .insert(None, NewThread::new().with_pref_y(100.0))
        .unwrap();
    // Both center on the middle of the parent, so both prefer a top of 100.
    let a = tree.insert(Some(root), NewThread::new()).unwrap();
    let b = tree.insert(Some(root), NewThread::new()).unwrap();

    let engine = Engine::builder().with_top_margin(100.0).build().unwrap();
    let stats = engine.recompute(&mut tree, &FixedHeight(100.0), RecomputeOptions::new());

    assert_approx_eq!(f32, pref_of(&tree, a), 100.0);
    assert_approx_eq!(f32, pref_of(&tree, b), 100.0);
    assert_approx_eq!(f32, y_of(&tree, a), 100.0);
    assert_approx_eq!(f32, y_of(&tree, b), 100.0 + 100.0 + 14.0);
    assert_eq!(stats.pushes, 1);
}

#[test]
fn scenario_cascade_delete_scrubs_back_references() {
    let mut tree = ThreadTree::new();
    let root = tree.insert(None, NewThread::new()).unwrap();
    let doomed = tree.branch(root, 0.1, "tangent", NewThread::new()).unwrap();
    let grandchild = tree
        .branch(doomed, 0.5, "deeper", NewThread::new())
        .unwrap();
    let survivor = tree.branch(root, 0.9, "keep me", NewThread::new()).unwrap();

    let engine = Engine::default();
    engine.recompute(&mut tree, &FixedHeight(100.0), RecomputeOptions::new());

    let removed = tree.remove_subtree(doomed).unwrap();
    assert_eq!(removed, vec![doomed, grandchild]);
    assert_eq!(tree.len(), 2);

    let targets: Vec<_> = tree
        .get(root)
        .unwrap()
        .highlights()
        .iter()
        .map(|highlight| highlight.target())
        .collect();
    assert_eq!(targets, vec![survivor]);
    assert!(tree.check_integrity().is_ok());

    // The remaining forest still lays out.
    engine.recompute(&mut tree, &FixedHeight(100.0), RecomputeOptions::new());
    assert!(tree.iter().all(|thread| thread.y().is_some()));
}

#[test]
fn scenario_drag_then_release_restores_spacing() {
    let mut tree = ThreadTree::new();
    let root = tree.insert(None, NewThread::new()).unwrap();
    let a = tree.branch(root, 0.2, "a", NewThread::new()).unwrap();
    let b = tree.branch(root, 0.8, "b", NewThread::new()).unwrap();
    let heights: HashMap<ThreadId, f32> = HashMap::from([(root, 300.0), (a, 100.0), (b, 100.0)]);
    let engine = Engine::default();
    engine.recompute(&mut tree, &heights, RecomputeOptions::new());

    // Drag `a` below `b`'s top; `b` keeps its place until release.
    tree.set_manual_position(a, 200.0).unwrap();
    assert_approx_eq!(f32, y_of(&tree, b), 230.0);

    engine.recompute(&mut tree, &heights, RecomputeOptions::new());

    // `a` still sorts first (smaller anchor), so `b` is pushed below it.
    assert_approx_eq!(f32, y_of(&tree, a), 200.0);
    assert_approx_eq!(f32, y_of(&tree, b), 314.0);
    assert_approx_eq!(f32, pref_of(&tree, b), 230.0);
}
