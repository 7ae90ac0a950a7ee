//! Project Snapshot Construction
//!
//! Builds the read-only [`crate::types::ProjectSnapshot`] a pipeline run
//! consumes: gitignore-aware file walking plus manifest parsing for the
//! npm, python, php, and dart ecosystems.

mod manifest;
mod scanner;

pub use manifest::{parse_composer_json, parse_package_json, parse_pubspec, parse_pyproject};
pub use scanner::SnapshotScanner;
