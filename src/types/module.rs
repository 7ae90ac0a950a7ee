//! Module Contract Types
//!
//! Core data model for the detection and composition engine: module kinds,
//! priority classes, detection results, guideline references, and command
//! sets. Modules themselves live in [`crate::modules`]; these types are the
//! currency they trade in.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// =============================================================================
// Module Kind & Priority
// =============================================================================

/// The three kinds of technology module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Framework,
    Language,
    Library,
}

/// Coarse ordering class for modules and their guideline fragments.
///
/// Declaration order is priority order, highest first: the derived `Ord`
/// sorts `MetaFramework` before `BaseLanguage`, which is the canonical
/// catalog iteration order. Ties within a class are broken by
/// case-insensitive display-name comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriorityClass {
    MetaFramework,
    Framework,
    CssFramework,
    SpecializedLanguage,
    BaseLanguage,
}

impl PriorityClass {
    /// Human-readable label for stack listings
    pub fn label(&self) -> &'static str {
        match self {
            Self::MetaFramework => "meta-framework",
            Self::Framework => "framework",
            Self::CssFramework => "css framework",
            Self::SpecializedLanguage => "language",
            Self::BaseLanguage => "language",
        }
    }
}

/// Category a guideline fragment belongs to in the composed output.
///
/// All Framework-category content precedes all Language-category content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidelineCategory {
    Framework,
    Language,
}

impl From<ModuleKind> for GuidelineCategory {
    fn from(kind: ModuleKind) -> Self {
        match kind {
            ModuleKind::Framework | ModuleKind::Library => Self::Framework,
            ModuleKind::Language => Self::Language,
        }
    }
}

// =============================================================================
// Detection Result
// =============================================================================

/// Outcome of one module's probe against a snapshot.
///
/// Modules build the raw result (confidence, evidence, excludes); the
/// orchestrator finalizes it, clamping confidence to `[0, 1]` and stamping
/// `accepted` from the uniform threshold. `accepted == (confidence > 0.3)`
/// holds for every finalized result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Whether the module cleared the acceptance threshold
    pub accepted: bool,
    /// Confidence score in `[0, 1]`
    pub confidence: f32,
    /// Human-readable signals that contributed to the score
    pub evidence: Vec<String>,
    /// Ids of modules this detection subsumes
    pub excludes: BTreeSet<String>,
}

impl DetectionResult {
    /// A result with no matched signals
    pub fn rejected() -> Self {
        Self::default()
    }

    /// Start a raw result from an initial confidence
    pub fn with_confidence(confidence: f32) -> Self {
        Self {
            confidence,
            ..Self::default()
        }
    }

    /// Add a matched signal's weight and its evidence line
    pub fn add_signal(&mut self, weight: f32, evidence: impl Into<String>) {
        self.confidence += weight;
        self.evidence.push(evidence.into());
    }

    /// Declare a subsumed module id
    pub fn exclude(mut self, id: impl Into<String>) -> Self {
        self.excludes.insert(id.into());
        self
    }

    /// Clamp confidence to `[0, 1]` and apply the uniform acceptance
    /// threshold. Called exactly once per result, by the orchestrator.
    pub fn finalize(mut self, threshold: f32) -> Self {
        self.confidence = self.confidence.clamp(0.0, 1.0);
        self.accepted = self.confidence > threshold;
        self
    }
}

// =============================================================================
// Guideline Reference
// =============================================================================

/// A pointer to one unit of guideline content.
///
/// Carries no content; the composer resolves it lazily through a
/// [`crate::compose::GuidelineStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelineReference {
    /// Path relative to the content store root (e.g. `react/core.md`)
    pub relative_path: String,
    /// Priority class of the contributing module
    pub priority_class: PriorityClass,
    /// Ordering category in the composed output
    pub category: GuidelineCategory,
    /// Version the fragment targets, if version-specific
    pub version: Option<String>,
}

impl GuidelineReference {
    pub fn new(
        relative_path: impl Into<String>,
        priority_class: PriorityClass,
        category: GuidelineCategory,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            priority_class,
            category,
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

// =============================================================================
// Command Set
// =============================================================================

/// Shell command suggestions in the five fixed buckets.
///
/// Buckets are concatenated in catalog order across modules; duplicates are
/// preserved (two valid dev-server invocations are both worth showing).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSet {
    pub dev: Vec<String>,
    pub build: Vec<String>,
    pub test: Vec<String>,
    pub lint: Vec<String>,
    pub install: Vec<String>,
}

impl CommandSet {
    pub fn is_empty(&self) -> bool {
        self.dev.is_empty()
            && self.build.is_empty()
            && self.test.is_empty()
            && self.lint.is_empty()
            && self.install.is_empty()
    }

    /// Append another set's commands, preserving order and duplicates
    pub fn extend(&mut self, other: CommandSet) {
        self.dev.extend(other.dev);
        self.build.extend(other.build);
        self.test.extend(other.test);
        self.lint.extend(other.lint);
        self.install.extend(other.install);
    }

    /// Bucket names and contents in fixed render order
    pub fn buckets(&self) -> [(&'static str, &[String]); 5] {
        [
            ("dev", &self.dev),
            ("build", &self.build),
            ("test", &self.test),
            ("lint", &self.lint),
            ("install", &self.install),
        ]
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::detection::ACCEPT_THRESHOLD;

    #[test]
    fn test_priority_class_ordering() {
        assert!(PriorityClass::MetaFramework < PriorityClass::Framework);
        assert!(PriorityClass::Framework < PriorityClass::CssFramework);
        assert!(PriorityClass::CssFramework < PriorityClass::SpecializedLanguage);
        assert!(PriorityClass::SpecializedLanguage < PriorityClass::BaseLanguage);
    }

    #[test]
    fn test_finalize_threshold_boundary() {
        // Exactly at the threshold is not accepted; strictly above is.
        let at = DetectionResult::with_confidence(ACCEPT_THRESHOLD).finalize(ACCEPT_THRESHOLD);
        assert!(!at.accepted);

        let above =
            DetectionResult::with_confidence(ACCEPT_THRESHOLD + 0.01).finalize(ACCEPT_THRESHOLD);
        assert!(above.accepted);
    }

    #[test]
    fn test_finalize_clamps_confidence() {
        let over = DetectionResult::with_confidence(1.7).finalize(ACCEPT_THRESHOLD);
        assert_eq!(over.confidence, 1.0);
        assert!(over.accepted);

        let under = DetectionResult::with_confidence(-0.5).finalize(ACCEPT_THRESHOLD);
        assert_eq!(under.confidence, 0.0);
        assert!(!under.accepted);
    }

    #[test]
    fn test_add_signal_accumulates() {
        let mut result = DetectionResult::rejected();
        result.add_signal(0.25, "found tailwind.config.ts");
        result.add_signal(0.25, "dependency tailwindcss");
        let result = result.finalize(ACCEPT_THRESHOLD);
        assert!(result.accepted);
        assert_eq!(result.evidence.len(), 2);
    }

    #[test]
    fn test_category_from_kind() {
        assert_eq!(
            GuidelineCategory::from(ModuleKind::Framework),
            GuidelineCategory::Framework
        );
        assert_eq!(
            GuidelineCategory::from(ModuleKind::Library),
            GuidelineCategory::Framework
        );
        assert_eq!(
            GuidelineCategory::from(ModuleKind::Language),
            GuidelineCategory::Language
        );
    }

    #[test]
    fn test_command_set_extend_preserves_duplicates() {
        let mut a = CommandSet {
            dev: vec!["npm run dev".to_string()],
            ..CommandSet::default()
        };
        let b = CommandSet {
            dev: vec!["npm run dev".to_string()],
            ..CommandSet::default()
        };
        a.extend(b);
        assert_eq!(a.dev.len(), 2);
    }
}
