//! Declarative Module
//!
//! Bridges a static [`ModuleDef`] to the [`TechModule`] contract. All
//! built-in technology modules are instances of this one type; behavior
//! differences live entirely in the definition tables.

use async_trait::async_trait;

use super::def::{CommandTemplates, DetectSignal, ModuleDef, VersionProbe};
use super::version::normalize_range;
use super::{CommandSource, TechModule};
use crate::constants::scan;
use crate::types::{
    CommandSet, DetectionResult, GuidelineCategory, GuidelineReference, ModuleKind, PriorityClass,
    ProjectSnapshot, Result,
};

/// A technology module driven entirely by its static definition
#[derive(Debug, Clone, Copy)]
pub struct DeclarativeModule {
    def: &'static ModuleDef,
}

impl DeclarativeModule {
    pub fn new(def: &'static ModuleDef) -> Self {
        Self { def }
    }

    pub fn def(&self) -> &'static ModuleDef {
        self.def
    }

    fn category(&self) -> GuidelineCategory {
        GuidelineCategory::from(self.def.kind)
    }

    /// Evaluate one signal against the snapshot, returning its evidence line
    fn match_signal(signal: &DetectSignal, snapshot: &ProjectSnapshot) -> Option<(f32, String)> {
        match *signal {
            DetectSignal::Dependency {
                ecosystem,
                name,
                weight,
            } => snapshot
                .dependency(ecosystem, name)
                .map(|range| (weight, format!("dependency {} {}", name, range))),
            DetectSignal::DevDependency {
                ecosystem,
                name,
                weight,
            } => snapshot
                .dev_dependency(ecosystem, name)
                .map(|range| (weight, format!("dev dependency {} {}", name, range))),
            DetectSignal::ConfigFile { name, weight } => snapshot
                .has_config_file(name)
                .then(|| (weight, format!("config file {}", name))),
            DetectSignal::FileExtension { ext, weight } => {
                let count = snapshot.files_with_extension(ext);
                (count >= scan::EXTENSION_COUNT_FLOOR)
                    .then(|| (weight, format!("{} .{} files", count, ext)))
            }
            DetectSignal::Manifest { ecosystem, weight } => snapshot
                .has_manifest(ecosystem)
                .then(|| (weight, format!("{:?} manifest present", ecosystem).to_lowercase())),
        }
    }
}

#[async_trait]
impl TechModule for DeclarativeModule {
    fn id(&self) -> &str {
        self.def.id
    }

    fn kind(&self) -> ModuleKind {
        self.def.kind
    }

    fn priority_class(&self) -> PriorityClass {
        self.def.priority
    }

    fn display_name(&self) -> &str {
        self.def.display_name
    }

    fn keywords(&self) -> &[&str] {
        self.def.keywords
    }

    fn supported_versions(&self) -> &[&str] {
        self.def.supported_versions
    }

    async fn probe(&self, snapshot: &ProjectSnapshot) -> Result<DetectionResult> {
        let mut result = DetectionResult::rejected();
        for signal in self.def.signals {
            if let Some((weight, evidence)) = Self::match_signal(signal, snapshot) {
                result.add_signal(weight, evidence);
            }
        }
        for id in self.def.excludes {
            result = result.exclude(*id);
        }
        Ok(result)
    }

    async fn resolve_version(&self, snapshot: &ProjectSnapshot) -> Result<Option<String>> {
        let range = match self.def.version_probe {
            VersionProbe::None => return Ok(None),
            VersionProbe::Dependency { ecosystem, name } => {
                snapshot.dependency_version(ecosystem, name)
            }
            VersionProbe::PythonRequires => snapshot.python_requires(),
        };

        Ok(range.and_then(|r| normalize_range(r, self.def.granularity)))
    }

    fn guideline_refs(&self, version: Option<&str>) -> Vec<GuidelineReference> {
        let mut refs = vec![GuidelineReference::new(
            format!("{}/core.md", self.def.guideline_dir),
            self.def.priority,
            self.category(),
        )];

        if let Some(version) = version
            && self.def.supported_versions.contains(&version)
        {
            refs.push(
                GuidelineReference::new(
                    format!("{}/{}.md", self.def.guideline_dir, version),
                    self.def.priority,
                    self.category(),
                )
                .with_version(version),
            );
        }

        refs
    }

    fn command_source(&self) -> Option<&dyn CommandSource> {
        // Languages never suggest commands; the tables uphold this, the
        // kind check backstops hand-edited definitions.
        match (self.def.kind, &self.def.commands) {
            (ModuleKind::Language, _) | (_, None) => None,
            (_, Some(_)) => Some(self),
        }
    }
}

impl CommandSource for DeclarativeModule {
    fn commands(&self, snapshot: &ProjectSnapshot) -> CommandSet {
        let Some(templates) = &self.def.commands else {
            return CommandSet::default();
        };
        let pm = snapshot.package_manager().command();

        let expand = |bucket: &[&str]| -> Vec<String> {
            bucket.iter().map(|t| t.replace("{pm}", pm)).collect()
        };

        render_commands(templates, expand)
    }
}

fn render_commands(
    templates: &CommandTemplates,
    expand: impl Fn(&[&str]) -> Vec<String>,
) -> CommandSet {
    CommandSet {
        dev: expand(templates.dev),
        build: expand(templates.build),
        test: expand(templates.test),
        lint: expand(templates.lint),
        install: expand(templates.install),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::detection::ACCEPT_THRESHOLD;
    use crate::modules::builtin;
    use crate::types::Ecosystem;

    fn module(id: &str) -> DeclarativeModule {
        builtin::find(id).expect("builtin module")
    }

    #[tokio::test]
    async fn test_react_probe_accepts_on_dependency() {
        let snapshot = ProjectSnapshot::builder()
            .dependency(Ecosystem::Npm, "react", "^18.2.0")
            .build();

        let result = module("react")
            .probe(&snapshot)
            .await
            .unwrap()
            .finalize(ACCEPT_THRESHOLD);

        assert!(result.accepted);
        assert!(result.confidence <= 1.0);
        assert!(result.evidence.iter().any(|e| e.contains("react")));
    }

    #[tokio::test]
    async fn test_probe_rejects_on_empty_snapshot() {
        let snapshot = ProjectSnapshot::builder().build();
        let result = module("react")
            .probe(&snapshot)
            .await
            .unwrap()
            .finalize(ACCEPT_THRESHOLD);
        assert!(!result.accepted);
        assert_eq!(result.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_nextjs_probe_excludes_react() {
        let snapshot = ProjectSnapshot::builder()
            .dependency(Ecosystem::Npm, "next", "^14.0.0")
            .build();

        let result = module("nextjs").probe(&snapshot).await.unwrap();
        assert!(result.excludes.contains("react"));
    }

    #[tokio::test]
    async fn test_resolve_version_major() {
        let snapshot = ProjectSnapshot::builder()
            .dependency(Ecosystem::Npm, "react", "^18.2.0")
            .build();

        let version = module("react").resolve_version(&snapshot).await.unwrap();
        assert_eq!(version.as_deref(), Some("18"));
    }

    #[tokio::test]
    async fn test_resolve_version_absent_degrades() {
        let snapshot = ProjectSnapshot::builder().build();
        let version = module("react").resolve_version(&snapshot).await.unwrap();
        assert_eq!(version, None);
    }

    #[test]
    fn test_guideline_refs_core_first_then_version() {
        let refs = module("react").guideline_refs(Some("18"));
        assert_eq!(refs[0].relative_path, "react/core.md");
        assert_eq!(refs[1].relative_path, "react/18.md");
        assert_eq!(refs[1].version.as_deref(), Some("18"));
    }

    #[test]
    fn test_guideline_refs_skip_unsupported_version() {
        let refs = module("react").guideline_refs(Some("3"));
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].relative_path, "react/core.md");
    }

    #[test]
    fn test_language_has_no_command_source() {
        assert!(module("typescript").command_source().is_none());
        assert!(module("react").command_source().is_some());
    }

    #[test]
    fn test_commands_substitute_package_manager() {
        let snapshot = ProjectSnapshot::builder().file("pnpm-lock.yaml").build();
        let react = module("react");
        let source = react.command_source().unwrap();
        let commands = source.commands(&snapshot);
        assert!(commands.dev.iter().any(|c| c.starts_with("pnpm ")));
    }
}
