//! Error types with fix suggestions
//!
//! Every failure aborts the current phase and is handed back to the
//! lifecycle adapter in `main`, which prints it and picks the exit code.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HandlerError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum HandlerError {
    // ─────────────────────────────────────────────────────────────
    // Detection
    // ─────────────────────────────────────────────────────────────
    /// Not a real error: tells the lifecycle to skip this buildpack.
    #[error("{message}")]
    DetectionFailed { message: String },

    // ─────────────────────────────────────────────────────────────
    // Bindings
    // ─────────────────────────────────────────────────────────────
    #[error("{reason}")]
    BindingResolution { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Filesystem and formats
    // ─────────────────────────────────────────────────────────────
    #[error("{}: {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid port in {}: {source}", .path.display())]
    InvalidPortFormat {
        path: PathBuf,
        #[source]
        source: ParseIntError,
    },

    #[error("failed to parse PHP redis config template: {reason}")]
    Template { reason: String },

    #[error("failed to process {}: {reason}", .path.display())]
    Metadata { path: PathBuf, reason: String },
}

impl HandlerError {
    /// Wrap an I/O error with the path that produced it
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HandlerError::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// True when detection declined rather than errored
    pub fn is_detect_failure(&self) -> bool {
        matches!(self, HandlerError::DetectionFailed { .. })
    }
}

impl FixSuggestion for HandlerError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            HandlerError::DetectionFailed { .. } => None,
            HandlerError::BindingResolution { .. } => {
                Some("Bind exactly one service of type `php-redis-session` (check SERVICE_BINDING_ROOT)")
            }
            HandlerError::FileSystem { .. } => Some("Check file path and permissions"),
            HandlerError::InvalidPortFormat { .. } => {
                Some("The binding's `port` file must contain a base-10 integer")
            }
            HandlerError::Template { .. } => {
                Some("Check config/php-redis.ini in the buildpack: placeholders are written {{.}}")
            }
            HandlerError::Metadata { .. } => Some("Check the TOML file is well formed"),
        }
    }
}
