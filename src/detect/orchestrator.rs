//! Detection Orchestrator
//!
//! Runs every enabled module's probe concurrently against the shared
//! read-only snapshot, applies the uniform acceptance threshold, then
//! resolves cross-module exclusions after all probes have completed.
//!
//! Isolation rule: one module's failure (error, panic, or timeout) must
//! never abort detection for the rest. Each probe runs in its own task and
//! writes to its own slot in the results map.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::StreamExt;
use tracing::{debug, warn};

use super::timeout::with_timeout;
use crate::config::DetectionConfig;
use crate::constants::detection;
use crate::diagnostics::Diagnostics;
use crate::modules::SharedModule;
use crate::types::{DetectionResult, GuideError, ProjectSnapshot};

/// Result of the detection phase: every module's finalized probe result,
/// plus the accepted set after exclusion resolution.
///
/// `results` preserves the threshold invariant
/// (`accepted == confidence > threshold`) for every probe; `accepted` is
/// the post-exclusion subset downstream phases operate on.
#[derive(Debug, Clone, Default)]
pub struct DetectionOutcome {
    pub results: BTreeMap<String, DetectionResult>,
    pub accepted: BTreeSet<String>,
}

impl DetectionOutcome {
    pub fn is_accepted(&self, id: &str) -> bool {
        self.accepted.contains(id)
    }
}

pub struct DetectionOrchestrator {
    concurrency: usize,
    probe_timeout: Duration,
}

impl Default for DetectionOrchestrator {
    fn default() -> Self {
        Self {
            concurrency: detection::DEFAULT_PROBE_CONCURRENCY,
            probe_timeout: Duration::from_secs(detection::DEFAULT_PROBE_TIMEOUT_SECS),
        }
    }
}

impl DetectionOrchestrator {
    pub fn new(concurrency: usize, probe_timeout: Duration) -> Self {
        Self {
            concurrency: concurrency.max(1),
            probe_timeout,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(
            config.concurrency,
            Duration::from_secs(config.probe_timeout_secs),
        )
    }

    /// Probe every module and resolve exclusions.
    ///
    /// Phase barrier: exclusion resolution starts only after every probe
    /// has completed (or failed); `excludes` may name modules that are
    /// evaluated later in the stream.
    pub async fn detect(
        &self,
        snapshot: Arc<ProjectSnapshot>,
        modules: &[SharedModule],
        diagnostics: &mut Diagnostics,
    ) -> DetectionOutcome {
        let mut results: BTreeMap<String, DetectionResult> = BTreeMap::new();

        // Fan out probes, one spawned task per module so that a panicking
        // probe is contained by the task boundary.
        let mut stream = futures::stream::iter(modules.iter().cloned())
            .map(|module| {
                let snapshot = Arc::clone(&snapshot);
                let probe_timeout = self.probe_timeout;
                async move {
                    let id = module.id().to_string();
                    let handle = tokio::spawn(async move {
                        with_timeout(probe_timeout, module.probe(&snapshot), "module probe").await
                    });
                    let outcome = match handle.await {
                        Ok(result) => result,
                        Err(join_err) if join_err.is_panic() => {
                            Err(GuideError::probe(&id, "probe panicked"))
                        }
                        Err(join_err) => Err(GuideError::probe(&id, join_err.to_string())),
                    };
                    (id, outcome)
                }
            })
            .buffer_unordered(self.concurrency);

        while let Some((id, outcome)) = stream.next().await {
            let result = match outcome {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Probe failed for '{}': {}", id, e);
                    diagnostics.record_probe_failure(&id, e.to_string());
                    DetectionResult::rejected()
                }
            };
            results.insert(id, result.finalize(detection::ACCEPT_THRESHOLD));
        }

        let accepted = Self::resolve_exclusions(&results, diagnostics);

        debug!(
            "Detection complete: {} probed, {} accepted",
            results.len(),
            accepted.len()
        );

        DetectionOutcome { results, accepted }
    }

    /// Remove every id named in an accepted module's `excludes` from the
    /// accepted set. Exclusion always wins over the excluded module's own
    /// confidence: it encodes subsumption, not a score comparison.
    fn resolve_exclusions(
        results: &BTreeMap<String, DetectionResult>,
        diagnostics: &mut Diagnostics,
    ) -> BTreeSet<String> {
        let accepted_as_probed: BTreeSet<String> = results
            .iter()
            .filter(|(_, r)| r.accepted)
            .map(|(id, _)| id.clone())
            .collect();

        // Union of exclusions declared by accepted modules, computed from
        // the pre-removal accepted set in a single pass.
        let mut removals: BTreeMap<String, String> = BTreeMap::new();
        for id in &accepted_as_probed {
            for excluded in &results[id].excludes {
                if excluded == id {
                    warn!("Module '{}' tried to exclude itself; ignored", id);
                    diagnostics.record_self_exclusion(id);
                    continue;
                }
                if accepted_as_probed.contains(excluded) {
                    removals.entry(excluded.clone()).or_insert_with(|| id.clone());
                }
                // Excluding a never-accepted id is a no-op.
            }
        }

        let mut accepted = accepted_as_probed;
        for (excluded, by) in &removals {
            accepted.remove(excluded);
            debug!("'{}' excluded by '{}'", excluded, by);
            diagnostics.record_exclusion(excluded, by);
        }

        accepted
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::catalog::ModuleCatalog;
    use crate::modules::TechModule;
    use crate::types::{
        Ecosystem, GuidelineReference, ModuleKind, PriorityClass, Result as GuideResult,
    };

    /// Test module with scripted probe behavior
    struct ScriptedModule {
        id: &'static str,
        behavior: Behavior,
    }

    enum Behavior {
        Confidence(f32),
        ConfidenceExcluding(f32, &'static [&'static str]),
        Fails,
        Panics,
        Hangs,
    }

    #[async_trait]
    impl TechModule for ScriptedModule {
        fn id(&self) -> &str {
            self.id
        }
        fn kind(&self) -> ModuleKind {
            ModuleKind::Framework
        }
        fn priority_class(&self) -> PriorityClass {
            PriorityClass::Framework
        }
        fn display_name(&self) -> &str {
            self.id
        }
        async fn probe(&self, _snapshot: &ProjectSnapshot) -> GuideResult<DetectionResult> {
            match self.behavior {
                Behavior::Confidence(c) => Ok(DetectionResult::with_confidence(c)),
                Behavior::ConfidenceExcluding(c, ids) => {
                    let mut result = DetectionResult::with_confidence(c);
                    for id in ids {
                        result = result.exclude(*id);
                    }
                    Ok(result)
                }
                Behavior::Fails => Err(GuideError::Config("scripted failure".to_string())),
                Behavior::Panics => panic!("scripted panic"),
                Behavior::Hangs => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(DetectionResult::with_confidence(1.0))
                }
            }
        }
        async fn resolve_version(&self, _snapshot: &ProjectSnapshot) -> GuideResult<Option<String>> {
            Ok(None)
        }
        fn guideline_refs(&self, _version: Option<&str>) -> Vec<GuidelineReference> {
            Vec::new()
        }
    }

    fn scripted(id: &'static str, behavior: Behavior) -> SharedModule {
        Arc::new(ScriptedModule { id, behavior })
    }

    fn snapshot() -> Arc<ProjectSnapshot> {
        Arc::new(ProjectSnapshot::builder().build())
    }

    #[tokio::test]
    async fn test_react_dependency_scenario() {
        let snapshot = Arc::new(
            ProjectSnapshot::builder()
                .dependency(Ecosystem::Npm, "react", "^18.2.0")
                .build(),
        );
        let catalog = ModuleCatalog::with_builtins();
        let orchestrator = DetectionOrchestrator::default();
        let mut diagnostics = Diagnostics::new();

        let outcome = orchestrator
            .detect(snapshot, &catalog.enabled_modules(), &mut diagnostics)
            .await;

        assert!(outcome.is_accepted("react"));
        let react = &outcome.results["react"];
        assert!(react.confidence > 0.3 && react.confidence <= 1.0);
        assert!(!outcome.is_accepted("django"));
    }

    #[tokio::test]
    async fn test_next_excludes_react_scenario() {
        let snapshot = Arc::new(
            ProjectSnapshot::builder()
                .dependency(Ecosystem::Npm, "next", "^14.0.0")
                .dependency(Ecosystem::Npm, "react", "^18.0.0")
                .build(),
        );
        let catalog = ModuleCatalog::with_builtins();
        let orchestrator = DetectionOrchestrator::default();
        let mut diagnostics = Diagnostics::new();

        let outcome = orchestrator
            .detect(snapshot, &catalog.enabled_modules(), &mut diagnostics)
            .await;

        assert!(outcome.is_accepted("nextjs"));
        assert!(!outcome.is_accepted("react"));
        // React's own probe still cleared the threshold
        assert!(outcome.results["react"].accepted);
        assert_eq!(diagnostics.exclusions.get("react").unwrap(), "nextjs");
    }

    #[tokio::test]
    async fn test_exclusion_beats_higher_confidence() {
        let modules = vec![
            scripted("low", Behavior::ConfidenceExcluding(0.4, &["high"])),
            scripted("high", Behavior::Confidence(0.9)),
        ];
        let orchestrator = DetectionOrchestrator::default();
        let mut diagnostics = Diagnostics::new();

        let outcome = orchestrator
            .detect(snapshot(), &modules, &mut diagnostics)
            .await;

        assert!(outcome.is_accepted("low"));
        assert!(!outcome.is_accepted("high"));
    }

    #[tokio::test]
    async fn test_self_exclusion_is_ignored() {
        let modules = vec![scripted(
            "selfish",
            Behavior::ConfidenceExcluding(0.8, &["selfish"]),
        )];
        let orchestrator = DetectionOrchestrator::default();
        let mut diagnostics = Diagnostics::new();

        let outcome = orchestrator
            .detect(snapshot(), &modules, &mut diagnostics)
            .await;

        assert!(outcome.is_accepted("selfish"));
        assert_eq!(diagnostics.self_exclusions, vec!["selfish"]);
    }

    #[tokio::test]
    async fn test_excluding_unaccepted_module_is_noop() {
        let modules = vec![
            scripted("winner", Behavior::ConfidenceExcluding(0.8, &["absent"])),
            scripted("bystander", Behavior::Confidence(0.5)),
        ];
        let orchestrator = DetectionOrchestrator::default();
        let mut diagnostics = Diagnostics::new();

        let outcome = orchestrator
            .detect(snapshot(), &modules, &mut diagnostics)
            .await;

        assert!(outcome.is_accepted("winner"));
        assert!(outcome.is_accepted("bystander"));
        assert!(diagnostics.exclusions.is_empty());
    }

    #[tokio::test]
    async fn test_threshold_applied_uniformly() {
        // A module reporting exactly the threshold is not accepted.
        let modules = vec![
            scripted("at", Behavior::Confidence(0.3)),
            scripted("above", Behavior::Confidence(0.31)),
        ];
        let orchestrator = DetectionOrchestrator::default();
        let mut diagnostics = Diagnostics::new();

        let outcome = orchestrator
            .detect(snapshot(), &modules, &mut diagnostics)
            .await;

        assert!(!outcome.is_accepted("at"));
        assert!(outcome.is_accepted("above"));
        for result in outcome.results.values() {
            assert_eq!(result.accepted, result.confidence > 0.3);
        }
    }

    #[tokio::test]
    async fn test_failing_probe_does_not_abort_others() {
        let modules = vec![
            scripted("broken", Behavior::Fails),
            scripted("healthy", Behavior::Confidence(0.8)),
        ];
        let orchestrator = DetectionOrchestrator::default();
        let mut diagnostics = Diagnostics::new();

        let outcome = orchestrator
            .detect(snapshot(), &modules, &mut diagnostics)
            .await;

        assert!(!outcome.is_accepted("broken"));
        assert!(outcome.is_accepted("healthy"));
        assert!(diagnostics.probe_failures.contains_key("broken"));
    }

    #[tokio::test]
    async fn test_panicking_probe_is_contained() {
        let modules = vec![
            scripted("bomb", Behavior::Panics),
            scripted("healthy", Behavior::Confidence(0.8)),
        ];
        let orchestrator = DetectionOrchestrator::default();
        let mut diagnostics = Diagnostics::new();

        let outcome = orchestrator
            .detect(snapshot(), &modules, &mut diagnostics)
            .await;

        assert!(!outcome.is_accepted("bomb"));
        assert!(outcome.is_accepted("healthy"));
        assert!(diagnostics.probe_failures.contains_key("bomb"));
    }

    #[tokio::test]
    async fn test_hanging_probe_times_out_alone() {
        let modules = vec![
            scripted("stuck", Behavior::Hangs),
            scripted("healthy", Behavior::Confidence(0.8)),
        ];
        let orchestrator = DetectionOrchestrator::new(4, Duration::from_millis(50));
        let mut diagnostics = Diagnostics::new();

        let outcome = orchestrator
            .detect(snapshot(), &modules, &mut diagnostics)
            .await;

        assert!(!outcome.is_accepted("stuck"));
        assert!(outcome.is_accepted("healthy"));
        assert!(diagnostics.probe_failures.contains_key("stuck"));
    }
}
