//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/guideweave/) and project (.guideweave/) level
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{compose, detection};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Project-specific settings
    pub project: ProjectConfig,

    /// Detection engine settings
    pub detection: DetectionConfig,

    /// Document output settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            project: ProjectConfig::default(),
            detection: DetectionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `GuideError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if self.detection.concurrency == 0 {
            return Err(crate::types::GuideError::Config(
                "detection concurrency must be greater than 0".to_string(),
            ));
        }

        if self.detection.probe_timeout_secs == 0 {
            return Err(crate::types::GuideError::Config(
                "detection probe_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Project Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project name (defaults to directory name)
    pub name: Option<String>,
}

// =============================================================================
// Detection Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Number of module probes running concurrently
    pub concurrency: usize,

    /// Per-module probe timeout in seconds
    pub probe_timeout_secs: u64,

    /// Module ids excluded from every run
    pub disabled_modules: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            concurrency: detection::DEFAULT_PROBE_CONCURRENCY,
            probe_timeout_secs: detection::DEFAULT_PROBE_TIMEOUT_SECS,
            disabled_modules: Vec::new(),
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the composed document, relative to the project root
    pub file: PathBuf,

    /// Directory of guideline fragment overrides. Fragments found here take
    /// precedence over the embedded set; missing paths fall back to it.
    pub guideline_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(compose::DEFAULT_OUTPUT_FILE),
            guideline_dir: None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
