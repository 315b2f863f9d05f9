//! Application error types.

use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors for mindmesh.
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed graph snapshot: {0}")]
    MalformedSnapshot(String),

    // Visualizer errors
    #[error("Mount target {0} is missing or has no window")]
    MissingMountTarget(String),
}

impl AppError {
    /// Wrap an I/O failure with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a JSON failure with the path that caused it.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
