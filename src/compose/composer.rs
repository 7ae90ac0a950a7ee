//! Guideline Composer
//!
//! Turns the accepted, version-resolved module set into the Stack,
//! Workflow, and Guidelines section bodies. Composition is pure and
//! idempotent: the same accepted set, versions, and content store always
//! produce identical bytes.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::warn;

use super::content::GuidelineStore;
use crate::constants::compose::FRAGMENT_SEPARATOR;
use crate::diagnostics::Diagnostics;
use crate::modules::SharedModule;
use crate::types::GuidelineCategory;

/// Stack body when no module was accepted; a valid terminal state, not an
/// error.
const GENERIC_STACK: &str =
    "Generic project: no recognized frameworks or languages detected.";

/// Workflow body when the content store lacks the workflow fragment
const FALLBACK_WORKFLOW: &str =
    "Follow the repository's existing conventions and run its tests before committing.";

/// Guidelines body when no fragment could be composed
const EMPTY_GUIDELINES: &str = "No technology-specific guidelines for this project.";

pub struct GuidelineComposer {
    store: Arc<dyn GuidelineStore>,
}

impl GuidelineComposer {
    pub fn new(store: Arc<dyn GuidelineStore>) -> Self {
        Self { store }
    }

    /// Compose the Guidelines section body.
    ///
    /// `modules` must be the accepted set in catalog order; each module's
    /// own reference order is preserved, module blocks are never
    /// interleaved, and every Framework-category fragment precedes every
    /// Language-category fragment. References are deduplicated by path,
    /// first occurrence wins. A reference whose content cannot be located
    /// is skipped with a warning.
    pub fn compose_guidelines(
        &self,
        modules: &[SharedModule],
        versions: &BTreeMap<String, Option<String>>,
        diagnostics: &mut Diagnostics,
    ) -> String {
        let mut framework_refs = Vec::new();
        let mut language_refs = Vec::new();

        for module in modules {
            let version = versions.get(module.id()).and_then(|v| v.as_deref());
            for reference in module.guideline_refs(version) {
                match reference.category {
                    GuidelineCategory::Framework => framework_refs.push(reference),
                    GuidelineCategory::Language => language_refs.push(reference),
                }
            }
        }

        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut fragments: Vec<String> = Vec::new();

        for reference in framework_refs.into_iter().chain(language_refs) {
            if !seen.insert(reference.relative_path.clone()) {
                continue;
            }
            match self.store.load(&reference.relative_path) {
                Some(content) => fragments.push(format!(
                    "<!-- guideline: {} -->\n{}",
                    reference.relative_path,
                    content.trim_end()
                )),
                None => {
                    warn!("Guideline content not found: {}", reference.relative_path);
                    diagnostics.record_missing_guideline(&reference.relative_path);
                }
            }
        }

        if fragments.is_empty() {
            EMPTY_GUIDELINES.to_string()
        } else {
            fragments.join(FRAGMENT_SEPARATOR)
        }
    }

    /// Compose the Stack section body: one line per accepted module in
    /// catalog order, with the resolved version where present.
    pub fn compose_stack(
        modules: &[SharedModule],
        versions: &BTreeMap<String, Option<String>>,
    ) -> String {
        if modules.is_empty() {
            return GENERIC_STACK.to_string();
        }

        modules
            .iter()
            .map(|module| {
                let version = versions
                    .get(module.id())
                    .and_then(|v| v.as_deref())
                    .map(|v| format!(" {}", v))
                    .unwrap_or_default();
                format!(
                    "- **{}**{} ({})",
                    module.display_name(),
                    version,
                    module.priority_class().label()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Compose the Workflow section body from the content store
    pub fn compose_workflow(&self, diagnostics: &mut Diagnostics) -> String {
        match self.store.load("workflow/core.md") {
            Some(content) => content.trim_end().to_string(),
            None => {
                warn!("Workflow fragment missing from content store");
                diagnostics.record_missing_guideline("workflow/core.md");
                FALLBACK_WORKFLOW.to_string()
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::compose::content::StoreChain;
    use crate::modules::builtin;

    fn composer() -> GuidelineComposer {
        GuidelineComposer::new(Arc::new(StoreChain::embedded()))
    }

    fn shared(id: &str) -> SharedModule {
        Arc::new(builtin::find(id).unwrap())
    }

    fn versions(pairs: &[(&str, Option<&str>)]) -> BTreeMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(id, v)| (id.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_react_core_fragment_included_exactly_once() {
        let modules = vec![shared("react")];
        let mut diagnostics = Diagnostics::new();

        let body = composer().compose_guidelines(
            &modules,
            &versions(&[("react", Some("18"))]),
            &mut diagnostics,
        );

        assert_eq!(body.matches("<!-- guideline: react/core.md -->").count(), 1);
        assert_eq!(body.matches("<!-- guideline: react/18.md -->").count(), 1);
        assert!(diagnostics.is_clean());
    }

    #[test]
    fn test_framework_content_precedes_language_content() {
        // Catalog order puts React (framework) before TypeScript (language)
        let modules = vec![shared("react"), shared("typescript")];
        let mut diagnostics = Diagnostics::new();

        let body = composer().compose_guidelines(
            &modules,
            &versions(&[("react", Some("18")), ("typescript", Some("5"))]),
            &mut diagnostics,
        );

        let last_framework = body.rfind("guideline: react/").unwrap();
        let first_language = body.find("guideline: typescript/").unwrap();
        assert!(last_framework < first_language);
    }

    #[test]
    fn test_missing_version_degrades_to_core_only() {
        let modules = vec![shared("react")];
        let mut diagnostics = Diagnostics::new();

        let body =
            composer().compose_guidelines(&modules, &versions(&[("react", None)]), &mut diagnostics);

        assert!(body.contains("guideline: react/core.md"));
        assert!(!body.contains("guideline: react/18.md"));
    }

    #[test]
    fn test_composition_is_byte_identical_across_runs() {
        let modules = vec![shared("nextjs"), shared("tailwind"), shared("typescript")];
        let version_map = versions(&[
            ("nextjs", Some("14")),
            ("tailwind", Some("4")),
            ("typescript", Some("5")),
        ]);

        let first =
            composer().compose_guidelines(&modules, &version_map, &mut Diagnostics::new());
        let second =
            composer().compose_guidelines(&modules, &version_map, &mut Diagnostics::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_accepted_set_renders_generic_stack() {
        let stack = GuidelineComposer::compose_stack(&[], &BTreeMap::new());
        assert!(stack.contains("Generic"));
    }

    #[test]
    fn test_stack_lists_modules_with_versions() {
        let modules = vec![shared("nextjs"), shared("typescript")];
        let stack = GuidelineComposer::compose_stack(
            &modules,
            &versions(&[("nextjs", Some("14")), ("typescript", None)]),
        );

        assert!(stack.contains("- **Next.js** 14 (meta-framework)"));
        assert!(stack.contains("- **TypeScript** (language)"));
    }

    #[test]
    fn test_workflow_comes_from_store() {
        let mut diagnostics = Diagnostics::new();
        let body = composer().compose_workflow(&mut diagnostics);
        assert!(body.contains("Workflow"));
        assert!(diagnostics.is_clean());
    }
}
