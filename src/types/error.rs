//! Unified Error Type System
//!
//! Centralized error type for the whole crate.
//!
//! ## Error Categories
//!
//! - **Parse**: an input file could not be read or parsed (fatal, no report)
//! - **Render**: the remote renderer failed for a diagram identity
//! - **Configuration**: a required option is missing or invalid
//! - **Io**: local filesystem failures outside of parsing
//!
//! Nothing in this crate retries automatically; cache hits are the only
//! way remote work is skipped.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Coarse error classes, used by the binary to choose an exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input file unreadable or rejected by the parser
    Parse,
    /// Remote diagram rendering failed
    Render,
    /// Missing or invalid configuration
    Configuration,
    /// Local I/O and everything else
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse => write!(f, "PARSE"),
            Self::Render => write!(f, "RENDER"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Io => write!(f, "IO"),
        }
    }
}

impl ErrorCategory {
    /// Process exit code for this category
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration => 2,
            Self::Parse => 3,
            Self::Render => 4,
            Self::Io => 1,
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum GherkifyError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Render failed for diagram {identity}: {message}")]
    Render { identity: String, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),

    /// Operation timeout with context
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },
}

pub type Result<T> = std::result::Result<T, GherkifyError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl GherkifyError {
    /// Create a parse error for a file
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a render error for a diagram identity
    pub fn render(identity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            identity: identity.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Parse { .. } | Self::Input(_) => ErrorCategory::Parse,
            Self::Render { .. } => ErrorCategory::Render,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Io(_) | Self::Json(_) | Self::Timeout { .. } => ErrorCategory::Io,
        }
    }
}

/// Context extension trait for attaching a file path to errors
pub trait ResultExt<T> {
    /// Convert any error into a parse error for `path`
    fn parse_context(self, path: &std::path::Path) -> Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn parse_context(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|e| GherkifyError::parse(path.display().to_string(), e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
