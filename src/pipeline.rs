//! Generation Pipeline
//!
//! The single forward pass from snapshot to composed document.
//!
//! ## Pipeline Architecture
//!
//! ```text
//! Snapshot → Detection (parallel probes → exclusion resolution)
//!          → Version Resolution (parallel, accepted modules only)
//!          → Guideline Composition ∥ Command Generation
//!          → Document Assembly
//! ```
//!
//! Two synchronization barriers: all probes complete before exclusions are
//! resolved, and all version lookups complete before any composition,
//! since guideline references depend on resolved versions. There is no
//! retry state and nothing is persisted between invocations.
//!
//! ## Guarantees
//!
//! - A document is always produced, possibly nearly empty; per-module and
//!   per-reference failures land in the diagnostics, never in the output
//! - Full generation is deterministic and idempotent for unchanged inputs
//! - Section regeneration is purely a function of snapshot + section name

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::catalog::ModuleCatalog;
use crate::compose::{
    CommandGenerator, ComposedDocument, GuidelineComposer, GuidelineStore, Section, StoreChain,
};
use crate::config::Config;
use crate::detect::{DetectionOrchestrator, DetectionOutcome, VersionResolver};
use crate::diagnostics::Diagnostics;
use crate::modules::SharedModule;
use crate::types::ProjectSnapshot;

/// Everything one pipeline run produced
pub struct PipelineReport {
    pub document: ComposedDocument,
    pub detection: DetectionOutcome,
    pub versions: BTreeMap<String, Option<String>>,
    pub diagnostics: Diagnostics,
}

impl PipelineReport {
    /// Accepted module ids in catalog order
    pub fn accepted_ids(&self) -> Vec<&str> {
        self.detection.accepted.iter().map(String::as_str).collect()
    }
}

pub struct GenerationPipeline {
    catalog: ModuleCatalog,
    orchestrator: DetectionOrchestrator,
    resolver: VersionResolver,
    store: Arc<dyn GuidelineStore>,
}

impl GenerationPipeline {
    pub fn new(catalog: ModuleCatalog, store: Arc<dyn GuidelineStore>) -> Self {
        Self {
            catalog,
            orchestrator: DetectionOrchestrator::default(),
            resolver: VersionResolver::default(),
            store,
        }
    }

    /// Pipeline configured from the merged config: built-in modules minus
    /// disables, directory overrides ahead of embedded fragments.
    pub fn from_config(config: &Config) -> Self {
        let catalog = ModuleCatalog::with_builtins_filtered(&config.detection.disabled_modules);
        let store: Arc<dyn GuidelineStore> = match &config.output.guideline_dir {
            Some(dir) => Arc::new(StoreChain::with_overrides(dir)),
            None => Arc::new(StoreChain::embedded()),
        };

        Self {
            catalog,
            orchestrator: DetectionOrchestrator::from_config(&config.detection),
            resolver: VersionResolver::from_config(&config.detection),
            store,
        }
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Run the full forward pass and assemble the document.
    ///
    /// Cancellation: this future does no cleanup of its own; the caller may
    /// drop it on an upstream signal, abandoning in-flight module work and
    /// producing no document.
    pub async fn run(&self, snapshot: Arc<ProjectSnapshot>) -> PipelineReport {
        let mut diagnostics = Diagnostics::new();
        let modules = self.catalog.enabled_modules();

        info!("Detection: probing {} modules", modules.len());
        let detection = self
            .orchestrator
            .detect(Arc::clone(&snapshot), &modules, &mut diagnostics)
            .await;

        // Catalog order filtered to the accepted set; this ordering carries
        // through every downstream phase.
        let accepted: Vec<SharedModule> = modules
            .iter()
            .filter(|m| detection.is_accepted(m.id()))
            .cloned()
            .collect();

        info!("Version resolution: {} accepted modules", accepted.len());
        let versions = self
            .resolver
            .resolve(Arc::clone(&snapshot), &accepted, &mut diagnostics)
            .await;

        // Composition and command generation run concurrently after the
        // version barrier.
        let composer = GuidelineComposer::new(Arc::clone(&self.store));
        let (guidelines, commands) = tokio::join!(
            async { composer.compose_guidelines(&accepted, &versions, &mut diagnostics) },
            async { CommandGenerator::collect(&accepted, &snapshot) },
        );

        let mut document = ComposedDocument::new();
        document.set_section(
            Section::Stack,
            GuidelineComposer::compose_stack(&accepted, &versions),
        );
        document.set_section(Section::Commands, CommandGenerator::render(&commands));
        document.set_section(Section::Workflow, composer.compose_workflow(&mut diagnostics));
        document.set_section(Section::Guidelines, guidelines);

        info!(
            "Composed document: {} accepted, {} diagnostics entries",
            accepted.len(),
            diagnostics.summary().len()
        );

        PipelineReport {
            document,
            detection,
            versions,
            diagnostics,
        }
    }

    /// Compose a single section body for regeneration.
    ///
    /// Runs the same forward pass and extracts one section, so the result
    /// depends only on the current snapshot and the section name, never on
    /// the rest of an existing document.
    pub async fn compose_section(
        &self,
        snapshot: Arc<ProjectSnapshot>,
        section: Section,
    ) -> (String, Diagnostics) {
        let report = self.run(snapshot).await;
        (
            report.document.section(section).to_string(),
            report.diagnostics,
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ecosystem;

    fn pipeline() -> GenerationPipeline {
        GenerationPipeline::new(
            ModuleCatalog::with_builtins(),
            Arc::new(StoreChain::embedded()),
        )
    }

    fn react_snapshot() -> Arc<ProjectSnapshot> {
        Arc::new(
            ProjectSnapshot::builder()
                .dependency(Ecosystem::Npm, "react", "^18.2.0")
                .build(),
        )
    }

    #[tokio::test]
    async fn test_react_scenario_end_to_end() {
        let report = pipeline().run(react_snapshot()).await;

        assert!(report.detection.is_accepted("react"));
        assert_eq!(report.versions["react"].as_deref(), Some("18"));

        let rendered = report.document.render();
        assert!(rendered.contains("- **React** 18 (framework)"));
        assert_eq!(rendered.matches("guideline: react/core.md").count(), 1);
        assert!(rendered.contains("guideline: react/18.md"));
    }

    #[tokio::test]
    async fn test_next_subsumes_react_in_document() {
        let snapshot = Arc::new(
            ProjectSnapshot::builder()
                .dependency(Ecosystem::Npm, "next", "^14.0.0")
                .dependency(Ecosystem::Npm, "react", "^18.0.0")
                .build(),
        );

        let report = pipeline().run(snapshot).await;

        assert!(report.detection.is_accepted("nextjs"));
        assert!(!report.detection.is_accepted("react"));
        let rendered = report.document.render();
        assert!(rendered.contains("guideline: nextjs/core.md"));
        assert!(!rendered.contains("guideline: react/"));
    }

    #[tokio::test]
    async fn test_empty_snapshot_produces_generic_document() {
        let report = pipeline()
            .run(Arc::new(ProjectSnapshot::builder().build()))
            .await;

        assert!(report.detection.accepted.is_empty());
        let rendered = report.document.render();
        assert!(rendered.contains("Generic"));
        assert!(rendered.contains("<!-- BEGIN: Guidelines -->"));
        assert!(report.diagnostics.probe_failures.is_empty());
    }

    #[tokio::test]
    async fn test_full_generation_is_idempotent() {
        let first = pipeline().run(react_snapshot()).await.document.render();
        let second = pipeline().run(react_snapshot()).await.document.render();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_section_regeneration_isolated() {
        let original = pipeline().run(react_snapshot()).await.document.render();

        let (commands_body, _) = pipeline()
            .compose_section(react_snapshot(), Section::Commands)
            .await;
        let replaced =
            ComposedDocument::replace_section(&original, Section::Commands, &commands_body)
                .unwrap();

        // Unchanged inputs: regeneration reproduces the original bytes.
        assert_eq!(original, replaced);

        // Changed inputs: only the Commands body differs.
        let pnpm_snapshot = Arc::new(
            ProjectSnapshot::builder()
                .dependency(Ecosystem::Npm, "react", "^18.2.0")
                .file("pnpm-lock.yaml")
                .build(),
        );
        let (pnpm_commands, _) = pipeline()
            .compose_section(pnpm_snapshot, Section::Commands)
            .await;
        let updated =
            ComposedDocument::replace_section(&original, Section::Commands, &pnpm_commands)
                .unwrap();

        for section in [Section::Stack, Section::Workflow, Section::Guidelines] {
            assert_eq!(
                ComposedDocument::section_body(&original, section),
                ComposedDocument::section_body(&updated, section)
            );
        }
        assert_ne!(
            ComposedDocument::section_body(&original, Section::Commands),
            ComposedDocument::section_body(&updated, Section::Commands)
        );
    }

    #[tokio::test]
    async fn test_tie_break_preserved_in_output() {
        // Vue.js and Svelte share the Framework class; catalog order is
        // case-insensitive display name: Svelte before Vue.js.
        let snapshot = Arc::new(
            ProjectSnapshot::builder()
                .dependency(Ecosystem::Npm, "vue", "^3.4.0")
                .dependency(Ecosystem::Npm, "svelte", "^5.0.0")
                .build(),
        );

        let report = pipeline().run(snapshot).await;
        let rendered = report.document.render();
        let svelte = rendered.find("guideline: svelte/core.md").unwrap();
        let vue = rendered.find("guideline: vuejs/core.md").unwrap();
        assert!(svelte < vue);
    }
}
