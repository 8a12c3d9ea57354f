//! Error types for Threadmap operations.
//!
//! The layout engine itself never fails: bad heights and dangling parents are
//! degraded around, not reported. Errors here come from caller mistakes when
//! mutating the [`ThreadTree`](crate::tree::ThreadTree) and from invalid
//! configuration.

use std::io;

use thiserror::Error;

use threadmap_core::identifier::ThreadId;

/// Errors raised by [`ThreadTree`](crate::tree::ThreadTree) mutations and
/// integrity checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("unknown thread {0}")]
    UnknownThread(ThreadId),

    #[error("anchor fraction {0} is outside [0, 1]")]
    AnchorOutOfRange(f32),

    #[error("position {0} is not a finite number")]
    InvalidPosition(f32),

    #[error("thread {id} has depth {found}, expected {expected}")]
    DepthMismatch {
        id: ThreadId,
        expected: usize,
        found: usize,
    },

    #[error("thread {id} references missing parent {parent}")]
    DanglingParent { id: ThreadId, parent: ThreadId },

    #[error("no drag in progress")]
    NoActiveDrag,
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),
}

/// The main error type for Threadmap operations.
#[derive(Debug, Error)]
pub enum ThreadmapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
