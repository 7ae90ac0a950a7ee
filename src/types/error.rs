//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Design Principles
//!
//! - Single unified error type (GuideError) for the entire application
//! - Failures inside the detection/composition pipeline are contained at the
//!   smallest scope (per-module, per-reference) and reported through the
//!   diagnostics collector instead of aborting the run
//! - Only registration-time misconfiguration (duplicate module id) and
//!   caller-level I/O surface as hard errors
//! - No panic/unwrap in library code - all errors are recoverable

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuideError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // -------------------------------------------------------------------------
    // Catalog Errors
    // -------------------------------------------------------------------------
    /// A module with the same id is already registered
    #[error("duplicate module id: {id}")]
    DuplicateModule { id: String },

    /// An operation referenced a module id the catalog does not know
    #[error("unknown module id: {id}")]
    UnknownModule { id: String },

    // -------------------------------------------------------------------------
    // Pipeline Errors
    // -------------------------------------------------------------------------
    /// Operation timeout with context
    #[error("timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// The run was cancelled by an upstream signal before completion
    #[error("generation cancelled")]
    Cancelled,

    /// One module's probe failed; recovered locally by the orchestrator
    #[error("probe failure for '{id}': {message}")]
    Probe { id: String, message: String },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("snapshot error at {path}: {message}")]
    Snapshot { path: String, message: String },

    /// A section name that does not exist, or a document whose markers for
    /// that section are missing or malformed
    #[error("unknown or unmarked section: {name}")]
    Section { name: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("not initialized: run 'guideweave init' first")]
    NotInitialized,
}

impl GuideError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a snapshot error
    pub fn snapshot(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Snapshot {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a section error
    pub fn section(name: impl Into<String>) -> Self {
        Self::Section { name: name.into() }
    }

    /// Create a probe failure error
    pub fn probe(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Probe {
            id: id.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GuideError>;

// =============================================================================
// Tests
// =============================================================================
