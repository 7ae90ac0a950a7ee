//! Guideline Content Stores
//!
//! The composer resolves [`crate::types::GuidelineReference`]s through a
//! single lookup capability. Built-in fragments are embedded at compile
//! time; a project can override or extend them from a directory
//! (`.guideweave/guidelines/` by convention), with the embedded set as
//! fallback.

use std::fs;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use tracing::warn;

/// Single lookup capability the composer depends on.
///
/// `None` means not found; the composer skips that one reference with a
/// warning instead of failing the run.
pub trait GuidelineStore: Send + Sync {
    fn load(&self, relative_path: &str) -> Option<String>;
}

// =============================================================================
// Embedded Store
// =============================================================================

/// Fragments compiled into the binary via `include_str!`
pub struct EmbeddedStore;

impl GuidelineStore for EmbeddedStore {
    fn load(&self, relative_path: &str) -> Option<String> {
        embedded_fragments()
            .iter()
            .find(|(path, _)| *path == relative_path)
            .map(|(_, content)| (*content).to_string())
    }
}

/// Built-in guideline fragments embedded at compile time.
///
/// Every `guideline_dir`/`supported_versions` combination in the builtin
/// module tables must have an entry here; the pack-coverage test enforces
/// that.
fn embedded_fragments() -> &'static [(&'static str, &'static str)] {
    &[
        ("workflow/core.md", include_str!("packs/workflow/core.md")),
        // --- Meta-frameworks ---
        ("nextjs/core.md", include_str!("packs/nextjs/core.md")),
        ("nextjs/13.md", include_str!("packs/nextjs/13.md")),
        ("nextjs/14.md", include_str!("packs/nextjs/14.md")),
        ("nextjs/15.md", include_str!("packs/nextjs/15.md")),
        ("nuxt/core.md", include_str!("packs/nuxt/core.md")),
        ("nuxt/3.md", include_str!("packs/nuxt/3.md")),
        ("nuxt/4.md", include_str!("packs/nuxt/4.md")),
        // --- Frameworks ---
        ("react/core.md", include_str!("packs/react/core.md")),
        ("react/18.md", include_str!("packs/react/18.md")),
        ("react/19.md", include_str!("packs/react/19.md")),
        ("vuejs/core.md", include_str!("packs/vuejs/core.md")),
        ("vuejs/2.md", include_str!("packs/vuejs/2.md")),
        ("vuejs/3.md", include_str!("packs/vuejs/3.md")),
        ("angular/core.md", include_str!("packs/angular/core.md")),
        ("angular/17.md", include_str!("packs/angular/17.md")),
        ("angular/18.md", include_str!("packs/angular/18.md")),
        ("angular/19.md", include_str!("packs/angular/19.md")),
        ("svelte/core.md", include_str!("packs/svelte/core.md")),
        ("svelte/4.md", include_str!("packs/svelte/4.md")),
        ("svelte/5.md", include_str!("packs/svelte/5.md")),
        ("express/core.md", include_str!("packs/express/core.md")),
        ("express/4.md", include_str!("packs/express/4.md")),
        ("express/5.md", include_str!("packs/express/5.md")),
        ("django/core.md", include_str!("packs/django/core.md")),
        ("django/4.md", include_str!("packs/django/4.md")),
        ("django/5.md", include_str!("packs/django/5.md")),
        ("flask/core.md", include_str!("packs/flask/core.md")),
        ("flask/2.md", include_str!("packs/flask/2.md")),
        ("flask/3.md", include_str!("packs/flask/3.md")),
        // --- CSS frameworks ---
        ("tailwind/core.md", include_str!("packs/tailwind/core.md")),
        ("tailwind/3.md", include_str!("packs/tailwind/3.md")),
        ("tailwind/4.md", include_str!("packs/tailwind/4.md")),
        // --- Languages ---
        ("typescript/core.md", include_str!("packs/typescript/core.md")),
        ("typescript/5.md", include_str!("packs/typescript/5.md")),
        ("javascript/core.md", include_str!("packs/javascript/core.md")),
        ("python/core.md", include_str!("packs/python/core.md")),
        ("python/3.md", include_str!("packs/python/3.md")),
        ("php/core.md", include_str!("packs/php/core.md")),
        ("php/8.3.md", include_str!("packs/php/8.3.md")),
        ("php/8.4.md", include_str!("packs/php/8.4.md")),
    ]
}

// =============================================================================
// Directory Store
// =============================================================================

/// On-disk fragment store with a concurrent read-through cache.
///
/// Both hits and misses are cached: the store is consulted repeatedly
/// within a run, and the content directory does not change mid-run.
pub struct DirStore {
    root: PathBuf,
    cache: DashMap<String, Option<String>>,
}

impl DirStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            cache: DashMap::new(),
        }
    }
}

impl GuidelineStore for DirStore {
    fn load(&self, relative_path: &str) -> Option<String> {
        if let Some(cached) = self.cache.get(relative_path) {
            return cached.value().clone();
        }

        // Reject traversal outside the store root
        if relative_path.contains("..") || relative_path.starts_with('/') {
            warn!("Rejecting guideline path: {}", relative_path);
            return None;
        }

        let path = self.root.join(relative_path);
        let content = match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read guideline {}: {}", path.display(), e);
                None
            }
        };

        self.cache.insert(relative_path.to_string(), content.clone());
        content
    }
}

// =============================================================================
// Store Chain
// =============================================================================

/// Consults stores in order; the first hit wins.
///
/// The standard chain is project overrides first, embedded fragments last.
pub struct StoreChain {
    stores: Vec<Box<dyn GuidelineStore>>,
}

impl StoreChain {
    pub fn new(stores: Vec<Box<dyn GuidelineStore>>) -> Self {
        Self { stores }
    }

    /// Embedded fragments only
    pub fn embedded() -> Self {
        Self::new(vec![Box::new(EmbeddedStore)])
    }

    /// Directory overrides with embedded fallback
    pub fn with_overrides<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(vec![Box::new(DirStore::new(dir)), Box::new(EmbeddedStore)])
    }
}

impl GuidelineStore for StoreChain {
    fn load(&self, relative_path: &str) -> Option<String> {
        self.stores.iter().find_map(|s| s.load(relative_path))
    }
}

// =============================================================================
// Tests
// =============================================================================
