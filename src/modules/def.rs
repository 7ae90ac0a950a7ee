//! Module Definition Tables
//!
//! Static, declarative descriptions of technology modules. One
//! [`ModuleDef`] captures everything a built-in module needs: detection
//! signals with weights, subsumption relations, guideline layout, version
//! probing, and command templates. [`super::DeclarativeModule`] turns a
//! definition into a live module; the tables live in [`super::builtin`].

use crate::types::{Ecosystem, ModuleKind, PriorityClass};

/// A single weighted detection signal.
///
/// Weights come from `constants::detection::weights` and act as documented
/// configuration; matched signals add up and the orchestrator clamps the sum.
#[derive(Debug, Clone, Copy)]
pub enum DetectSignal {
    /// A runtime dependency declared in a manifest
    Dependency {
        ecosystem: Ecosystem,
        name: &'static str,
        weight: f32,
    },
    /// A dev-only dependency declared in a manifest
    DevDependency {
        ecosystem: Ecosystem,
        name: &'static str,
        weight: f32,
    },
    /// A config file by exact name at the project root
    ConfigFile { name: &'static str, weight: f32 },
    /// Source files with this extension, above the count floor
    FileExtension { ext: &'static str, weight: f32 },
    /// A manifest characteristic of the ecosystem was parsed at all
    Manifest { ecosystem: Ecosystem, weight: f32 },
}

/// How a module extracts a concrete version from the snapshot
#[derive(Debug, Clone, Copy)]
pub enum VersionProbe {
    /// The module has no meaningful version
    None,
    /// Read the declared range of this dependency (runtime table first)
    Dependency {
        ecosystem: Ecosystem,
        name: &'static str,
    },
    /// Read `requires-python` from pyproject.toml
    PythonRequires,
}

/// Normalization granularity for resolved versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionGranularity {
    /// `"^18.2.0"` resolves to `"18"`
    Major,
    /// `"^8.4"` resolves to `"8.4"`, for technologies whose guidelines
    /// change per minor release
    MajorMinor,
}

/// Per-bucket shell command templates.
///
/// Templates may contain the `{pm}` placeholder, substituted with the
/// package manager inferred from the snapshot's lockfiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandTemplates {
    pub dev: &'static [&'static str],
    pub build: &'static [&'static str],
    pub test: &'static [&'static str],
    pub lint: &'static [&'static str],
    pub install: &'static [&'static str],
}

/// Complete static definition of one technology module
#[derive(Debug, Clone, Copy)]
pub struct ModuleDef {
    /// Stable unique id (e.g. `"nextjs"`)
    pub id: &'static str,
    /// Display name used for stack listings and tie-breaking
    pub display_name: &'static str,
    pub kind: ModuleKind,
    pub priority: PriorityClass,
    pub keywords: &'static [&'static str],
    /// Versions with a dedicated guideline fragment
    pub supported_versions: &'static [&'static str],
    pub signals: &'static [DetectSignal],
    /// Ids of modules this one subsumes when accepted
    pub excludes: &'static [&'static str],
    /// Directory of this module's fragments in the content store
    pub guideline_dir: &'static str,
    pub version_probe: VersionProbe,
    pub granularity: VersionGranularity,
    /// Command templates; `None` for modules that suggest no commands
    pub commands: Option<CommandTemplates>,
}
