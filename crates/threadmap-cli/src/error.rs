//! Error type returned by [`run`](crate::run).

use thiserror::Error;

use threadmap::ThreadmapError;

use crate::{config::ConfigError, scene::SceneError};

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Threadmap(#[from] ThreadmapError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A scene that failed to load, together with its source text so the
    /// error can point into it.
    #[error("Scene error: {err}")]
    Scene { err: SceneError, src: String },

    #[error("Failed to serialize layout report: {0}")]
    Report(#[from] toml::ser::Error),
}

impl CliError {
    pub fn new_scene_error(err: SceneError, src: impl Into<String>) -> Self {
        Self::Scene {
            err,
            src: src.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Threadmap(ThreadmapError::Io(err))
    }
}
