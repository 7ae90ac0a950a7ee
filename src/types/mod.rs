pub mod error;
pub mod module;
pub mod snapshot;

pub use error::{GuideError, Result};
pub use module::{
    CommandSet, DetectionResult, GuidelineCategory, GuidelineReference, ModuleKind, PriorityClass,
};
pub use snapshot::{Ecosystem, ManifestDeps, PackageManager, ProjectSnapshot, SnapshotBuilder};
