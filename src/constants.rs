//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Detection engine constants
pub mod detection {
    /// Confidence threshold for accepting a module.
    ///
    /// Applied uniformly by the orchestrator: a module is accepted iff its
    /// clamped confidence is strictly greater than this value. Modules never
    /// decide acceptance themselves.
    pub const ACCEPT_THRESHOLD: f32 = 0.3;

    /// Default number of probes running concurrently
    pub const DEFAULT_PROBE_CONCURRENCY: usize = 8;

    /// Default per-module probe timeout (seconds).
    ///
    /// Generous on purpose: a timeout fails only the slow module, never the
    /// whole phase.
    pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

    /// Default per-module version resolution timeout (seconds)
    pub const DEFAULT_VERSION_TIMEOUT_SECS: u64 = 10;

    /// Signal weight table.
    ///
    /// Confidence scoring is incremental float addition clamped to 1.0.
    /// These weights are tuning configuration: tests pin only the accepted
    /// boundary, never exact scores.
    pub mod weights {
        /// A runtime dependency declared in a manifest
        pub const DEPENDENCY: f32 = 0.6;

        /// A dev-only dependency declared in a manifest
        pub const DEV_DEPENDENCY: f32 = 0.5;

        /// A technology-specific config file at the project root
        pub const CONFIG_FILE: f32 = 0.35;

        /// A matching source-file extension present above the count floor
        pub const FILE_EXTENSION: f32 = 0.25;

        /// A manifest file characteristic of the ecosystem
        pub const MANIFEST: f32 = 0.55;
    }
}

/// Snapshot scanning constants
pub mod scan {
    /// Maximum number of files recorded in a snapshot
    pub const MAX_FILES: usize = 50_000;

    /// Minimum matching files for a file-extension signal to fire
    pub const EXTENSION_COUNT_FLOOR: usize = 3;
}

/// Composition constants
pub mod compose {
    /// Separator between adjacent guideline fragments
    pub const FRAGMENT_SEPARATOR: &str = "\n\n";

    /// Default output document file name
    pub const DEFAULT_OUTPUT_FILE: &str = "GUIDELINES.md";
}
