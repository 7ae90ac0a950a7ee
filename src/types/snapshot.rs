//! Project Snapshot
//!
//! The read-only, pre-parsed view of a project that detection logic consumes.
//! Built once per invocation (see [`crate::snapshot`]) and never mutated
//! afterwards; modules only read it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// =============================================================================
// Ecosystems
// =============================================================================

/// Dependency ecosystems a snapshot can carry manifests for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// `package.json`
    Npm,
    /// `pyproject.toml`
    Python,
    /// `composer.json`
    Php,
    /// `pubspec.yaml`
    Dart,
}

/// Package manager inferred from lockfiles at the project root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// The shell command for this package manager
    pub fn command(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }
}

/// Parsed dependency tables for one ecosystem's manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestDeps {
    /// Runtime dependencies: name -> declared version range
    pub dependencies: BTreeMap<String, String>,
    /// Development-only dependencies: name -> declared version range
    pub dev_dependencies: BTreeMap<String, String>,
}

// =============================================================================
// Snapshot
// =============================================================================

/// Immutable view of a project's manifests and files.
///
/// Owned by the caller; the engine only reads it. All collections are
/// ordered so that iteration is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    root: PathBuf,
    manifests: BTreeMap<Ecosystem, ManifestDeps>,
    /// `package.json` scripts: name -> command line
    scripts: BTreeMap<String, String>,
    /// Relative paths of files present in the project
    files: BTreeSet<String>,
    /// Names of recognized config files at the project root
    config_files: BTreeSet<String>,
    /// `requires-python` from pyproject.toml, if declared
    python_requires: Option<String>,
}

impl ProjectSnapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Declared range for a runtime dependency
    pub fn dependency(&self, ecosystem: Ecosystem, name: &str) -> Option<&str> {
        self.manifests
            .get(&ecosystem)
            .and_then(|m| m.dependencies.get(name))
            .map(String::as_str)
    }

    /// Declared range for a dev-only dependency
    pub fn dev_dependency(&self, ecosystem: Ecosystem, name: &str) -> Option<&str> {
        self.manifests
            .get(&ecosystem)
            .and_then(|m| m.dev_dependencies.get(name))
            .map(String::as_str)
    }

    /// Declared range for a dependency in either table, runtime first
    pub fn dependency_version(&self, ecosystem: Ecosystem, name: &str) -> Option<&str> {
        self.dependency(ecosystem, name)
            .or_else(|| self.dev_dependency(ecosystem, name))
    }

    /// Whether any manifest was parsed for this ecosystem
    pub fn has_manifest(&self, ecosystem: Ecosystem) -> bool {
        self.manifests.contains_key(&ecosystem)
    }

    pub fn has_file(&self, relative_path: &str) -> bool {
        self.files.contains(relative_path)
    }

    pub fn has_config_file(&self, name: &str) -> bool {
        self.config_files.contains(name)
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of files with the given extension (no leading dot)
    pub fn files_with_extension(&self, ext: &str) -> usize {
        self.files
            .iter()
            .filter(|f| {
                Path::new(f.as_str())
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e == ext)
            })
            .count()
    }

    pub fn script(&self, name: &str) -> Option<&str> {
        self.scripts.get(name).map(String::as_str)
    }

    pub fn python_requires(&self) -> Option<&str> {
        self.python_requires.as_deref()
    }

    /// Package manager inferred from lockfiles, most specific first
    pub fn package_manager(&self) -> PackageManager {
        if self.has_file("bun.lockb") || self.has_file("bun.lock") {
            PackageManager::Bun
        } else if self.has_file("pnpm-lock.yaml") {
            PackageManager::Pnpm
        } else if self.has_file("yarn.lock") {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`ProjectSnapshot`].
///
/// The scanner populates it from disk; tests populate it directly.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    snapshot: ProjectSnapshot,
}

impl SnapshotBuilder {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.snapshot.root = root.into();
        self
    }

    pub fn dependency(
        mut self,
        ecosystem: Ecosystem,
        name: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        self.snapshot
            .manifests
            .entry(ecosystem)
            .or_default()
            .dependencies
            .insert(name.into(), range.into());
        self
    }

    pub fn dev_dependency(
        mut self,
        ecosystem: Ecosystem,
        name: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        self.snapshot
            .manifests
            .entry(ecosystem)
            .or_default()
            .dev_dependencies
            .insert(name.into(), range.into());
        self
    }

    /// Record a manifest as present even if it declared no dependencies
    pub fn manifest(mut self, ecosystem: Ecosystem) -> Self {
        self.snapshot.manifests.entry(ecosystem).or_default();
        self
    }

    pub fn file(mut self, relative_path: impl Into<String>) -> Self {
        self.snapshot.files.insert(relative_path.into());
        self
    }

    pub fn config_file(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.snapshot.files.insert(name.clone());
        self.snapshot.config_files.insert(name);
        self
    }

    pub fn script(mut self, name: impl Into<String>, command: impl Into<String>) -> Self {
        self.snapshot.scripts.insert(name.into(), command.into());
        self
    }

    pub fn python_requires(mut self, spec: impl Into<String>) -> Self {
        self.snapshot.python_requires = Some(spec.into());
        self
    }

    pub fn build(self) -> ProjectSnapshot {
        self.snapshot
    }
}

// =============================================================================
// Tests
// =============================================================================
