//! Error types surfaced at the border engine's call boundaries.
//!
//! The core state machines never fail once a mutation is accepted; these
//! errors only reject malformed input before it reaches them.

use std::path::PathBuf;

use thiserror::Error;

use crate::world_handle::WorldId;

/// Rejected border mutation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BorderError {
    /// A wall-clock duration below zero. The border is left untouched.
    #[error("transition duration must not be negative (got {millis} ms)")]
    InvalidDuration {
        /// Duration supplied by the caller.
        millis: i64,
    },
    /// A size or center component that is NaN or infinite.
    #[error("{what} must be finite")]
    NonFinite {
        /// Name of the rejected quantity.
        what: &'static str,
    },
}

/// Rejected tracker membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// The border is already linked to a tracker.
    #[error("border for world {world} is already tracked")]
    AlreadyTracked {
        /// World owning the border.
        world: WorldId,
    },
}

/// Failure loading an engine configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The file is not a valid configuration document.
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying JSON failure.
        source: serde_json::Error,
    },
}
