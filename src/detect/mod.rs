//! Detection Phase
//!
//! Concurrent, isolated module probing with uniform threshold acceptance
//! and post-barrier exclusion resolution, followed by concurrent version
//! resolution for the accepted set.

mod orchestrator;
mod timeout;
mod version;

pub use orchestrator::{DetectionOrchestrator, DetectionOutcome};
pub use timeout::with_timeout;
pub use version::VersionResolver;
