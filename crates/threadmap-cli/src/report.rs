//! Layout reports written by the CLI.

use std::collections::HashMap;

use serde::Serialize;

use threadmap::{
    Highlight,
    geometry::Bounds,
    identifier::ThreadId,
    layout::RecomputeStats,
    placement::{Connector, Layout, Placement},
};

use crate::scene::SceneForest;

/// Serializable result of laying out a scene.
#[derive(Debug, Serialize)]
pub struct Report {
    stats: StatsEntry,
    #[serde(rename = "thread")]
    threads: Vec<ThreadEntry>,
    #[serde(rename = "connector")]
    connectors: Vec<ConnectorEntry>,
    #[serde(rename = "highlight", skip_serializing_if = "Vec::is_empty")]
    highlights: Vec<HighlightEntry>,
}

#[derive(Debug, Serialize)]
struct StatsEntry {
    threads: usize,
    columns: usize,
    pushes: usize,
    centering_rounds: usize,
    shift: f32,
}

#[derive(Debug, Serialize)]
struct ThreadEntry {
    key: String,
    id: ThreadId,
    depth: usize,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    manual: bool,
}

#[derive(Debug, Serialize)]
struct ConnectorEntry {
    from: String,
    to: String,
    start: [f32; 2],
    end: [f32; 2],
}

/// An excerpt inside a thread that spawned a branch, located on the
/// thread's left edge.
#[derive(Debug, Serialize)]
struct HighlightEntry {
    on: String,
    target: String,
    excerpt: String,
    at: [f32; 2],
}

impl Report {
    pub fn new(forest: &SceneForest, layout: &Layout, stats: RecomputeStats) -> Self {
        let key_of = |id: ThreadId| {
            forest
                .key(id)
                .map_or_else(|| id.to_string(), str::to_string)
        };

        Self {
            stats: StatsEntry {
                threads: stats.threads,
                columns: stats.columns,
                pushes: stats.pushes,
                centering_rounds: stats.centering_rounds,
                shift: stats.shift,
            },
            threads: layout
                .placements()
                .iter()
                .map(|placement| ThreadEntry::new(placement, key_of(placement.id())))
                .collect(),
            connectors: layout
                .connectors()
                .iter()
                .map(|connector| ConnectorEntry::new(connector, &key_of))
                .collect(),
            highlights: HighlightEntry::collect(forest, layout, &key_of),
        }
    }

    /// Renders the report as a TOML document.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if a value cannot be represented.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

impl ThreadEntry {
    fn new(placement: &Placement, key: String) -> Self {
        let bounds = placement.bounds();
        Self {
            key,
            id: placement.id(),
            depth: placement.depth(),
            x: bounds.min_x(),
            y: bounds.min_y(),
            width: bounds.width(),
            height: bounds.height(),
            manual: placement.is_manual(),
        }
    }
}

impl ConnectorEntry {
    fn new(connector: &Connector, key_of: &impl Fn(ThreadId) -> String) -> Self {
        let start = connector.start();
        let end = connector.end();
        Self {
            from: key_of(connector.parent()),
            to: key_of(connector.child()),
            start: [start.x(), start.y()],
            end: [end.x(), end.y()],
        }
    }
}

impl HighlightEntry {
    fn collect(
        forest: &SceneForest,
        layout: &Layout,
        key_of: &impl Fn(ThreadId) -> String,
    ) -> Vec<Self> {
        let bounds_of: HashMap<ThreadId, Bounds> = layout
            .placements()
            .iter()
            .map(|placement| (placement.id(), placement.bounds()))
            .collect();

        let mut entries = Vec::new();
        for thread in forest.tree().iter() {
            let Some(&bounds) = bounds_of.get(&thread.id()) else {
                continue;
            };
            entries.extend(
                thread
                    .highlights()
                    .iter()
                    .map(|highlight| Self::new(key_of(thread.id()), bounds, highlight, key_of)),
            );
        }
        entries
    }

    fn new(
        on: String,
        bounds: Bounds,
        highlight: &Highlight,
        key_of: &impl Fn(ThreadId) -> String,
    ) -> Self {
        let at = bounds
            .min_point()
            .translate_y(highlight.anchor_frac() * bounds.height());
        Self {
            on,
            target: key_of(highlight.target()),
            excerpt: highlight.excerpt().to_string(),
            at: [at.x(), at.y()],
        }
    }
}

#[cfg(test)]
mod tests {
    use threadmap::layout::{Engine, RecomputeOptions};

    use super::*;
    use crate::scene::Scene;

    #[test]
    fn test_report_lists_threads_and_connectors() {
        let src = r#"
[[thread]]
key = "root"
height = 300.0

[[thread]]
key = "a"
parent = "root"
anchor = 0.2
height = 100.0
"#;
        let mut forest = Scene::parse(src).unwrap().build().unwrap();
        let heights = forest.heights().clone();
        let engine = Engine::default();
        let stats = engine.recompute(forest.tree_mut(), &heights, RecomputeOptions::new());
        let layout = engine.placements(forest.tree(), &heights);

        let report = Report::new(&forest, &layout, stats);
        let text = report.to_toml().unwrap();

        assert!(text.contains("[[thread]]"));
        assert!(text.contains("[[connector]]"));
        assert!(text.contains("key = \"root\""));
        assert!(text.contains("from = \"root\""));
        assert!(text.contains("to = \"a\""));

        let parsed: toml::Table = toml::from_str(&text).unwrap();
        let threads = parsed["thread"].as_array().unwrap();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[1]["x"].as_float(), Some(500.0));
        assert_eq!(threads[1]["y"].as_float(), Some(50.0));
        assert_eq!(parsed["stats"]["threads"].as_integer(), Some(2));
        assert!(!parsed.contains_key("highlight"));
    }

    #[test]
    fn test_report_locates_highlights_on_their_thread() {
        let src = r#"
[[thread]]
key = "root"
height = 300.0

[[thread]]
key = "a"
parent = "root"
anchor = 0.2
excerpt = "why?"
height = 100.0
"#;
        let mut forest = Scene::parse(src).unwrap().build().unwrap();
        let heights = forest.heights().clone();
        let engine = Engine::default();
        let layout = engine.layout(forest.tree_mut(), &heights, RecomputeOptions::new());
        let stats = RecomputeStats::default();

        let text = Report::new(&forest, &layout, stats).to_toml().unwrap();
        let parsed: toml::Table = toml::from_str(&text).unwrap();
        let highlights = parsed["highlight"].as_array().unwrap();

        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0]["on"].as_str(), Some("root"));
        assert_eq!(highlights[0]["target"].as_str(), Some("a"));
        assert_eq!(highlights[0]["excerpt"].as_str(), Some("why?"));
        // 40 + 0.2 * 300 on the root's left edge.
        let at = highlights[0]["at"].as_array().unwrap();
        assert_eq!(at[0].as_float(), Some(0.0));
        assert_eq!(at[1].as_float(), Some(100.0));
    }
}
