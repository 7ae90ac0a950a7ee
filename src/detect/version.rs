//! Version Resolver
//!
//! For each accepted module (post-exclusion), asks the owning module to
//! extract a concrete version from the snapshot. Lookups run concurrently
//! and independently; an error degrades that one module to "no version"
//! rather than propagating. Absence is valid; downstream composition
//! falls back to core-only guidelines.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::StreamExt;
use tracing::{debug, warn};

use super::timeout::with_timeout;
use crate::config::DetectionConfig;
use crate::constants::detection;
use crate::diagnostics::Diagnostics;
use crate::modules::SharedModule;
use crate::types::ProjectSnapshot;

pub struct VersionResolver {
    concurrency: usize,
    lookup_timeout: Duration,
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self {
            concurrency: detection::DEFAULT_PROBE_CONCURRENCY,
            lookup_timeout: Duration::from_secs(detection::DEFAULT_VERSION_TIMEOUT_SECS),
        }
    }
}

impl VersionResolver {
    pub fn new(concurrency: usize, lookup_timeout: Duration) -> Self {
        Self {
            concurrency: concurrency.max(1),
            lookup_timeout,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(
            config.concurrency,
            Duration::from_secs(config.probe_timeout_secs),
        )
    }

    /// Resolve versions for the given (accepted) modules.
    ///
    /// Every module gets an entry in the returned map, even when the
    /// version is absent.
    pub async fn resolve(
        &self,
        snapshot: Arc<ProjectSnapshot>,
        modules: &[SharedModule],
        diagnostics: &mut Diagnostics,
    ) -> BTreeMap<String, Option<String>> {
        let mut versions: BTreeMap<String, Option<String>> = BTreeMap::new();

        let mut stream = futures::stream::iter(modules.iter().cloned())
            .map(|module| {
                let snapshot = Arc::clone(&snapshot);
                let lookup_timeout = self.lookup_timeout;
                async move {
                    let id = module.id().to_string();
                    let outcome = with_timeout(
                        lookup_timeout,
                        module.resolve_version(&snapshot),
                        "version resolution",
                    )
                    .await;
                    (id, outcome)
                }
            })
            .buffer_unordered(self.concurrency);

        while let Some((id, outcome)) = stream.next().await {
            let version = match outcome {
                Ok(version) => version,
                Err(e) => {
                    warn!("Version resolution failed for '{}': {}", id, e);
                    diagnostics.record_version_failure(&id, e.to_string());
                    None
                }
            };
            debug!("Version for '{}': {:?}", id, version);
            versions.insert(id, version);
        }

        versions
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
        DetectionResult, Ecosystem, GuideError, GuidelineReference, ModuleKind, PriorityClass,
        Result as GuideResult,
    };

    #[tokio::test]
    async fn test_resolves_react_major() {
        let snapshot = Arc::new(
            ProjectSnapshot::builder()
                .dependency(Ecosystem::Npm, "react", "^18.2.0")
                .build(),
        );
        let catalog = ModuleCatalog::with_builtins();
        let react = catalog.module("react").unwrap().clone();
        let mut diagnostics = Diagnostics::new();

        let versions = VersionResolver::default()
            .resolve(snapshot, &[react], &mut diagnostics)
            .await;

        assert_eq!(versions["react"].as_deref(), Some("18"));
        assert!(diagnostics.is_clean());
    }

    struct BrokenVersionModule;

    #[async_trait]
    impl TechModule for BrokenVersionModule {
        fn id(&self) -> &str {
            "broken"
        }
        fn kind(&self) -> ModuleKind {
            ModuleKind::Framework
        }
        fn priority_class(&self) -> PriorityClass {
            PriorityClass::Framework
        }
        fn display_name(&self) -> &str {
            "Broken"
        }
        async fn probe(&self, _snapshot: &ProjectSnapshot) -> GuideResult<DetectionResult> {
            Ok(DetectionResult::with_confidence(1.0))
        }
        async fn resolve_version(&self, _snapshot: &ProjectSnapshot) -> GuideResult<Option<String>> {
            Err(GuideError::Config("lockfile unreadable".to_string()))
        }
        fn guideline_refs(&self, _version: Option<&str>) -> Vec<GuidelineReference> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_failure_degrades_to_no_version() {
        let snapshot = Arc::new(ProjectSnapshot::builder().build());
        let modules: Vec<SharedModule> = vec![Arc::new(BrokenVersionModule)];
        let mut diagnostics = Diagnostics::new();

        let versions = VersionResolver::default()
            .resolve(snapshot, &modules, &mut diagnostics)
            .await;

        assert_eq!(versions["broken"], None);
        assert!(diagnostics.version_failures.contains_key("broken"));
    }
}
