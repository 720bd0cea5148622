//! Error types for the notification pipeline
//!
//! Errors are classified by how the pipeline reacts:
//! - Invariant violations: returned to the caller, never swallowed
//! - Configuration: reported at startup, defaults are used where possible
//! - Dispatch: logged as warnings, never propagated into pipeline state

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while grouping or ranking notifications
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Group {group} belongs to package {expected}, refusing record from {found}")]
    PackageMismatch {
        group: String,
        expected: String,
        found: String,
    },
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors reported by the host when sending a click or action intent
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Intent was canceled by its owner")]
    Canceled,

    #[error("Failed to send intent: {0}")]
    Failed(String),
}
