//! Scene files: a TOML description of a thread forest.
//!
//! A scene lists threads in `[[thread]]` tables. A thread names its parent by
//! key, and the parent must appear earlier in the file, so every scene
//! describes a forest by construction.
//!
//! ```toml
//! [[thread]]
//! key = "root"
//! title = "Main chat"
//! height = 300.0
//!
//! [[thread]]
//! key = "tangent"
//! parent = "root"
//! anchor = 0.2
//! excerpt = "the selected sentence"
//! ```

use std::{collections::HashMap, ops::Range};

use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;
use toml::Spanned;

use threadmap::{DEFAULT_ANCHOR, NewThread, ThreadTree, TreeError, identifier::ThreadId};

/// Errors found while reading a scene. Every variant that can be tied to a
/// location in the source carries its byte span.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("{message}")]
    Syntax {
        message: String,
        span: Option<Range<usize>>,
    },

    #[error("duplicate thread key `{key}`")]
    DuplicateKey {
        key: String,
        span: Range<usize>,
        first: Range<usize>,
    },

    #[error("unknown parent `{parent}`")]
    UnknownParent {
        parent: String,
        span: Range<usize>,
    },

    #[error("invalid thread `{key}`: {source}")]
    Thread {
        key: String,
        source: TreeError,
        span: Range<usize>,
    },
}

impl SceneError {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            SceneError::Syntax { .. } => "threadmap::scene::syntax",
            SceneError::DuplicateKey { .. } => "threadmap::scene::duplicate_key",
            SceneError::UnknownParent { .. } => "threadmap::scene::unknown_parent",
            SceneError::Thread { .. } => "threadmap::scene::thread",
        }
    }

    /// Location of the offending text, if known.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            SceneError::Syntax { span, .. } => span.clone(),
            SceneError::DuplicateKey { span, .. }
            | SceneError::UnknownParent { span, .. }
            | SceneError::Thread { span, .. } => Some(span.clone()),
        }
    }

    /// Short label attached to [`SceneError::span`].
    pub fn label(&self) -> &'static str {
        match self {
            SceneError::Syntax { .. } => "here",
            SceneError::DuplicateKey { .. } => "redefined here",
            SceneError::UnknownParent { .. } => "not declared before this thread",
            SceneError::Thread { .. } => "rejected value",
        }
    }

    /// Additional location related to the error.
    pub fn secondary(&self) -> Option<(Range<usize>, &'static str)> {
        match self {
            SceneError::DuplicateKey { first, .. } => Some((first.clone(), "first defined here")),
            _ => None,
        }
    }

    pub fn help(&self) -> Option<&'static str> {
        match self {
            SceneError::UnknownParent { .. } => {
                Some("parents must be declared before the threads that branch from them")
            }
            SceneError::DuplicateKey { .. } => Some("every thread needs a unique key"),
            _ => None,
        }
    }
}

/// A parsed scene file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    #[serde(default, rename = "thread")]
    threads: Vec<SceneThread>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneThread {
    key: Spanned<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    height: Option<f32>,
    #[serde(default)]
    parent: Option<Spanned<String>>,
    #[serde(default)]
    anchor: Option<Spanned<f32>>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    y: Option<Spanned<f32>>,
}

/// The forest described by a scene, ready to be laid out.
#[derive(Debug, Default)]
pub struct SceneForest {
    tree: ThreadTree,
    heights: HashMap<ThreadId, f32>,
    keys: HashMap<ThreadId, String>,
}

impl SceneForest {
    pub fn tree(&self) -> &ThreadTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ThreadTree {
        &mut self.tree
    }

    /// Heights declared in the scene. Threads without one are absent.
    pub fn heights(&self) -> &HashMap<ThreadId, f32> {
        &self.heights
    }

    /// Scene key of a thread.
    pub fn key(&self, id: ThreadId) -> Option<&str> {
        self.keys.get(&id).map(String::as_str)
    }
}

impl Scene {
    /// Parses scene source text.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Syntax`] for malformed TOML or unexpected fields.
    pub fn parse(src: &str) -> Result<Self, SceneError> {
        toml::from_str(src).map_err(|err| SceneError::Syntax {
            message: err.message().to_string(),
            span: err.span(),
        })
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Builds the forest, inserting threads in file order.
    ///
    /// A thread with an `excerpt` is created as a branch of its parent, which
    /// records a highlight on the parent. A thread with `y` is pinned there
    /// as a manual thread.
    ///
    /// # Errors
    ///
    /// Returns the first duplicate key, unknown parent, or value the tree
    /// rejects.
    pub fn build(&self) -> Result<SceneForest, SceneError> {
        let mut forest = SceneForest::default();
        let mut declared: HashMap<&str, (ThreadId, Range<usize>)> = HashMap::new();

        for entry in &self.threads {
            let key = entry.key.get_ref().as_str();
            if let Some((_, first)) = declared.get(key) {
                return Err(SceneError::DuplicateKey {
                    key: key.to_string(),
                    span: entry.key.span(),
                    first: first.clone(),
                });
            }

            let parent = match &entry.parent {
                Some(parent) => {
                    let (parent_id, _) = declared.get(parent.get_ref().as_str()).ok_or_else(|| {
                        SceneError::UnknownParent {
                            parent: parent.get_ref().clone(),
                            span: parent.span(),
                        }
                    })?;
                    Some(*parent_id)
                }
                None => None,
            };

            let id = entry.insert_into(&mut forest.tree, parent)?;

            if let Some(y) = &entry.y {
                forest
                    .tree
                    .set_manual_position(id, *y.get_ref())
                    .map_err(|source| entry.error(source, y.span()))?;
            }
            if let Some(height) = entry.height {
                forest.heights.insert(id, height);
            }

            forest.keys.insert(id, key.to_string());
            declared.insert(key, (id, entry.key.span()));
        }

        debug!(
            threads_count = forest.tree.len(),
            measured_count = forest.heights.len();
            "Scene built"
        );
        Ok(forest)
    }
}

impl SceneThread {
    fn insert_into(
        &self,
        tree: &mut ThreadTree,
        parent: Option<ThreadId>,
    ) -> Result<ThreadId, SceneError> {
        let mut new = NewThread::new();
        if let Some(title) = &self.title {
            new = new.with_title(title.clone());
        }

        let anchor = self.anchor.as_ref().map(|anchor| *anchor.get_ref());
        let anchor_span = self
            .anchor
            .as_ref()
            .map_or_else(|| self.key.span(), Spanned::span);

        let inserted = match (parent, &self.excerpt) {
            (Some(parent), Some(excerpt)) => tree.branch(
                parent,
                anchor.unwrap_or(DEFAULT_ANCHOR),
                excerpt.clone(),
                new,
            ),
            (None, Some(_)) => {
                warn!(key = self.key.get_ref().as_str(); "Excerpt on a root thread ignored");
                tree.insert(None, new)
            }
            (parent, None) => {
                if let Some(anchor) = anchor {
                    new = new.with_anchor_frac(anchor);
                }
                tree.insert(parent, new)
            }
        };

        inserted.map_err(|source| self.error(source, anchor_span))
    }

    fn error(&self, source: TreeError, span: Range<usize>) -> SceneError {
        SceneError::Thread {
            key: self.key.get_ref().clone(),
            source,
            span,
        }
    }
}
