//! Module Catalog
//!
//! Owns the set of known modules and their enabled/disabled flags. The
//! catalog's ordering (priority class descending, then case-insensitive
//! display name) is the canonical iteration order for every downstream
//! phase. No I/O happens here.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::modules::{SharedModule, builtin};
use crate::types::{GuideError, Result};

#[derive(Default)]
pub struct ModuleCatalog {
    modules: BTreeMap<String, SharedModule>,
    disabled: BTreeSet<String>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-loaded with every built-in module
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for module in builtin::all() {
            // Built-in ids are unique by construction; a collision here is
            // a programming error worth surfacing loudly in tests.
            if let Err(e) = catalog.register(module) {
                warn!("Skipping built-in module: {}", e);
            }
        }
        catalog
    }

    /// Built-ins with config-driven disables applied. Unknown ids in the
    /// disable list are warned about, not fatal; a typo in a config file
    /// must not break every run.
    pub fn with_builtins_filtered(disabled: &[String]) -> Self {
        let mut catalog = Self::with_builtins();
        for id in disabled {
            if let Err(e) = catalog.set_enabled(id, false) {
                warn!("Ignoring disabled_modules entry: {}", e);
            }
        }
        catalog
    }

    /// Register a module. Fails if the id is already present.
    pub fn register(&mut self, module: SharedModule) -> Result<()> {
        let id = module.id().to_string();
        if self.modules.contains_key(&id) {
            return Err(GuideError::DuplicateModule { id });
        }
        self.modules.insert(id, module);
        Ok(())
    }

    /// Flip a module's enabled flag. Fails if the id is unknown.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<()> {
        if !self.modules.contains_key(id) {
            return Err(GuideError::UnknownModule { id: id.to_string() });
        }
        if enabled {
            self.disabled.remove(id);
        } else {
            self.disabled.insert(id.to_string());
        }
        Ok(())
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.modules.contains_key(id) && !self.disabled.contains(id)
    }

    pub fn module(&self, id: &str) -> Option<&SharedModule> {
        self.modules.get(id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Enabled modules in canonical order: priority class descending,
    /// ties broken by case-insensitive display name.
    pub fn enabled_modules(&self) -> Vec<SharedModule> {
        let mut modules: Vec<SharedModule> = self
            .modules
            .values()
            .filter(|m| !self.disabled.contains(m.id()))
            .cloned()
            .collect();
        Self::sort_canonical(&mut modules);
        modules
    }

    /// Every registered module in canonical order, enabled or not
    pub fn all_modules(&self) -> Vec<SharedModule> {
        let mut modules: Vec<SharedModule> = self.modules.values().cloned().collect();
        Self::sort_canonical(&mut modules);
        modules
    }

    fn sort_canonical(modules: &mut [SharedModule]) {
        modules.sort_by(|a, b| {
            a.priority_class()
                .cmp(&b.priority_class())
                .then_with(|| {
                    a.display_name()
                        .to_lowercase()
                        .cmp(&b.display_name().to_lowercase())
                })
        });
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::modules::{
        DeclarativeModule, DetectSignal, ModuleDef, VersionGranularity, VersionProbe,
    };
    use crate::types::{ModuleKind, PriorityClass};

    const fn stub_def(
        id: &'static str,
        display_name: &'static str,
        priority: PriorityClass,
    ) -> ModuleDef {
        ModuleDef {
            id,
            display_name,
            kind: ModuleKind::Framework,
            priority,
            keywords: &[],
            supported_versions: &[],
            signals: &[] as &[DetectSignal],
            excludes: &[],
            guideline_dir: "stub",
            version_probe: VersionProbe::None,
            granularity: VersionGranularity::Major,
            commands: None,
        }
    }

    static ALPHA: ModuleDef = stub_def("alpha", "Alpha", PriorityClass::Framework);
    static BETA: ModuleDef = stub_def("beta", "Beta", PriorityClass::Framework);
    static META: ModuleDef = stub_def("meta", "Zeta Meta", PriorityClass::MetaFramework);

    fn shared(def: &'static ModuleDef) -> SharedModule {
        Arc::new(DeclarativeModule::new(def))
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut catalog = ModuleCatalog::new();
        catalog.register(shared(&ALPHA)).unwrap();
        let err = catalog.register(shared(&ALPHA)).unwrap_err();
        assert!(matches!(err, GuideError::DuplicateModule { .. }));
        // The first registration survives
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_set_enabled_unknown_fails() {
        let mut catalog = ModuleCatalog::new();
        let err = catalog.set_enabled("ghost", false).unwrap_err();
        assert!(matches!(err, GuideError::UnknownModule { .. }));
    }

    #[test]
    fn test_disabled_module_excluded_from_enabled() {
        let mut catalog = ModuleCatalog::new();
        catalog.register(shared(&ALPHA)).unwrap();
        catalog.register(shared(&BETA)).unwrap();
        catalog.set_enabled("alpha", false).unwrap();

        let enabled = catalog.enabled_modules();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].id(), "beta");

        catalog.set_enabled("alpha", true).unwrap();
        assert_eq!(catalog.enabled_modules().len(), 2);
    }

    #[test]
    fn test_canonical_order_priority_then_name() {
        let mut catalog = ModuleCatalog::new();
        catalog.register(shared(&BETA)).unwrap();
        catalog.register(shared(&META)).unwrap();
        catalog.register(shared(&ALPHA)).unwrap();

        let enabled = catalog.enabled_modules();
        let ids: Vec<&str> = enabled.iter().map(|m| m.id()).collect();
        // Meta-framework first despite its late display name; Alpha before
        // Beta within the same class.
        assert_eq!(ids, vec!["meta", "alpha", "beta"]);
    }

    #[test]
    fn test_with_builtins_filtered() {
        let catalog =
            ModuleCatalog::with_builtins_filtered(&["tailwind".to_string(), "nope".to_string()]);
        assert!(!catalog.is_enabled("tailwind"));
        assert!(catalog.is_enabled("react"));
    }

    #[test]
    fn test_builtin_catalog_is_populated() {
        let catalog = ModuleCatalog::with_builtins();
        assert!(!catalog.is_empty());
        assert!(catalog.module("react").is_some());
    }
}
