//! Guideweave - Technology Detection and Guideline Composition
//!
//! Inspects a source project, determines which frameworks, languages, and
//! libraries it uses, and composes a single guideline document from
//! per-technology fragments.
//!
//! ## Core Features
//!
//! - **Module Contract**: table-driven technology plugins with confidence-
//!   scored detection and cross-module exclusion
//! - **Parallel Detection**: isolated, timeout-bounded probes per module
//! - **Version-Aware Composition**: guideline fragments selected by
//!   resolved major (or major.minor) version
//! - **Stable Sections**: marker-delimited document sections that
//!   regenerate independently and deterministically
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use guideweave::{GenerationPipeline, ModuleCatalog, SnapshotScanner, StoreChain};
//!
//! let snapshot = SnapshotScanner::new(&project_root).scan()?;
//! let pipeline = GenerationPipeline::new(
//!     ModuleCatalog::with_builtins(),
//!     Arc::new(StoreChain::embedded()),
//! );
//! let report = pipeline.run(Arc::new(snapshot)).await;
//! std::fs::write("GUIDELINES.md", report.document.render())?;
//! ```
//!
//! ## Modules
//!
//! - [`modules`]: the technology plugin contract and built-in definitions
//! - [`catalog`]: module registration and canonical ordering
//! - [`detect`]: concurrent probing, exclusion resolution, version lookup
//! - [`compose`]: content stores, section composition, document markers
//! - [`snapshot`]: project scanning into the read-only snapshot
//! - [`config`]: layered configuration

pub mod catalog;
pub mod cli;
pub mod compose;
pub mod config;
pub mod constants;
pub mod detect;
pub mod diagnostics;
pub mod modules;
pub mod pipeline;
pub mod snapshot;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, DetectionConfig, OutputConfig};

// Error Types
pub use types::{GuideError, Result};

// Data Model
pub use types::{
    CommandSet, DetectionResult, Ecosystem, GuidelineCategory, GuidelineReference, ModuleKind,
    PriorityClass, ProjectSnapshot, SnapshotBuilder,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use catalog::ModuleCatalog;
pub use diagnostics::Diagnostics;
pub use pipeline::{GenerationPipeline, PipelineReport};

// =============================================================================
// Phase Re-exports
// =============================================================================

pub use compose::{
    CommandGenerator, ComposedDocument, DirStore, EmbeddedStore, GuidelineComposer,
    GuidelineStore, Section, StoreChain,
};
pub use detect::{DetectionOrchestrator, DetectionOutcome, VersionResolver};
pub use modules::{DeclarativeModule, SharedModule, TechModule};
pub use snapshot::SnapshotScanner;
