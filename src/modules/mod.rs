//! Technology Modules
//!
//! The plugin contract of the engine. A module is a self-contained
//! detector/guideline-provider for one technology; modules are stateless
//! between runs and registered once per process through the catalog.
//!
//! ## Modules
//!
//! - `builtin`: the static registration table of built-in technologies
//! - `declarative`: the table-driven [`TechModule`] implementation
//! - `def`: definition types the tables are written in
//! - `version`: version range normalization

pub mod builtin;
mod declarative;
mod def;
mod version;

pub use declarative::DeclarativeModule;
pub use def::{CommandTemplates, DetectSignal, ModuleDef, VersionGranularity, VersionProbe};
pub use version::normalize_range;

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{
    CommandSet, DetectionResult, GuidelineReference, ModuleKind, PriorityClass, ProjectSnapshot,
    Result,
};

/// Shared handle to a registered module
pub type SharedModule = Arc<dyn TechModule>;

/// Contract every technology module satisfies.
///
/// `probe` and `resolve_version` may read files and are async for that
/// reason, but must never mutate the snapshot. Errors from either are
/// contained by the orchestrator; a failing module degrades to
/// not-accepted / no-version without affecting its peers.
#[async_trait]
pub trait TechModule: Send + Sync {
    /// Stable unique id (e.g. `"nextjs"`)
    fn id(&self) -> &str;

    fn kind(&self) -> ModuleKind;

    fn priority_class(&self) -> PriorityClass;

    /// Display name used in stack listings and for ordering ties
    fn display_name(&self) -> &str;

    fn keywords(&self) -> &[&str] {
        &[]
    }

    /// Versions with a dedicated guideline fragment
    fn supported_versions(&self) -> &[&str] {
        &[]
    }

    /// Score this technology against the snapshot.
    ///
    /// Returns a raw result; the orchestrator clamps confidence and applies
    /// the uniform acceptance threshold.
    async fn probe(&self, snapshot: &ProjectSnapshot) -> Result<DetectionResult>;

    /// Extract a normalized version from the snapshot, if any
    async fn resolve_version(&self, snapshot: &ProjectSnapshot) -> Result<Option<String>>;

    /// Ordered guideline references for this module. Convention: the core
    /// reference first, then the version-specific one when present. The
    /// composer preserves this internal order.
    fn guideline_refs(&self, version: Option<&str>) -> Vec<GuidelineReference>;

    /// Command capability, exposed only by Framework/Library modules.
    /// Language modules return `None`.
    fn command_source(&self) -> Option<&dyn CommandSource> {
        None
    }
}

/// Optional capability: shell command suggestions for the five buckets
pub trait CommandSource: Send + Sync {
    fn commands(&self, snapshot: &ProjectSnapshot) -> CommandSet;
}
