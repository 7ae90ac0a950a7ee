//! Pipeline Diagnostics
//!
//! Structured collector for everything that degraded during a run: failed
//! probes, failed version lookups, missing guideline fragments, ignored
//! self-exclusions, applied exclusions. Failure information is an explicit
//! output of the pipeline, reported alongside the document; the document
//! itself is never corrupted by a partial failure.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    /// Module id -> probe failure cause
    pub probe_failures: BTreeMap<String, String>,
    /// Module id -> version resolution failure cause
    pub version_failures: BTreeMap<String, String>,
    /// Guideline reference paths whose content could not be located
    pub missing_guidelines: Vec<String>,
    /// Module ids that tried to exclude themselves
    pub self_exclusions: Vec<String>,
    /// Excluded module id -> excluding module id
    pub exclusions: BTreeMap<String, String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_probe_failure(&mut self, id: &str, cause: impl Into<String>) {
        self.probe_failures.insert(id.to_string(), cause.into());
    }

    pub fn record_version_failure(&mut self, id: &str, cause: impl Into<String>) {
        self.version_failures.insert(id.to_string(), cause.into());
    }

    pub fn record_missing_guideline(&mut self, path: &str) {
        self.missing_guidelines.push(path.to_string());
    }

    pub fn record_self_exclusion(&mut self, id: &str) {
        self.self_exclusions.push(id.to_string());
    }

    pub fn record_exclusion(&mut self, excluded: &str, by: &str) {
        self.exclusions
            .insert(excluded.to_string(), by.to_string());
    }

    /// True when nothing degraded during the run
    pub fn is_clean(&self) -> bool {
        self.probe_failures.is_empty()
            && self.version_failures.is_empty()
            && self.missing_guidelines.is_empty()
            && self.self_exclusions.is_empty()
    }

    /// Human-readable report lines for the verbose channel.
    ///
    /// Applied exclusions are part of normal operation and listed last.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (id, cause) in &self.probe_failures {
            lines.push(format!("probe failed for '{}': {}", id, cause));
        }
        for (id, cause) in &self.version_failures {
            lines.push(format!("version resolution failed for '{}': {}", id, cause));
        }
        for path in &self.missing_guidelines {
            lines.push(format!("guideline content not found: {}", path));
        }
        for id in &self.self_exclusions {
            lines.push(format!("ignored self-exclusion by '{}'", id));
        }
        for (excluded, by) in &self.exclusions {
            lines.push(format!("'{}' excluded by '{}'", excluded, by));
        }
        lines
    }
}

// =============================================================================
// Tests
// =============================================================================
