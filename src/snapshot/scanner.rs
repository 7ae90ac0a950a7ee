//! Snapshot Scanner
//!
//! Walks a project root and builds the immutable [`ProjectSnapshot`] the
//! detection engine consumes: relative file paths, root-level config file
//! names, and parsed manifests per ecosystem.
//!
//! Scanning is a synchronous, blocking operation; call it from a
//! `tokio::task::spawn_blocking` context for large repos.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};

use super::manifest;
use crate::constants::scan;
use crate::types::{Ecosystem, GuideError, ProjectSnapshot, Result, SnapshotBuilder};

/// Directories never worth recording even when not gitignored
const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    "target",
    ".git",
    "build",
    "dist",
    "__pycache__",
    "vendor",
    ".venv",
];

pub struct SnapshotScanner {
    root: PathBuf,
    max_files: usize,
}

impl SnapshotScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_files: scan::MAX_FILES,
        }
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Scan the project root into a snapshot.
    ///
    /// Every root-level file name is recorded as a config-file name, so
    /// detection signals can test for `next.config.ts`, lockfiles, and the
    /// like without a hardcoded allowlist here.
    pub fn scan(&self) -> Result<ProjectSnapshot> {
        if !self.root.is_dir() {
            return Err(GuideError::snapshot(
                self.root.display().to_string(),
                "project root is not a directory",
            ));
        }

        let mut builder = ProjectSnapshot::builder().root(&self.root);

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false) // Security: prevent symlink traversal attacks
            .filter_entry(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_none_or(|name| !DEFAULT_SKIP_DIRS.contains(&name))
            })
            .build();

        let mut recorded = 0usize;
        for entry in walker.filter_map(|e| e.ok()) {
            if recorded >= self.max_files {
                debug!("Snapshot file cap reached ({})", self.max_files);
                break;
            }
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Ok(relative) = path.strip_prefix(&self.root) else {
                continue;
            };
            let relative = relative.to_string_lossy().replace('\\', "/");

            if !relative.contains('/') {
                builder = builder.config_file(relative);
            } else {
                builder = builder.file(relative);
            }
            recorded += 1;
        }

        builder = self.parse_manifests(builder)?;

        Ok(builder.build())
    }

    /// Parse every recognized manifest at the project root.
    ///
    /// A malformed manifest is skipped with a warning; one broken file must
    /// never abort snapshot construction.
    fn parse_manifests(&self, mut builder: SnapshotBuilder) -> Result<SnapshotBuilder> {
        if let Some(content) = self.read_root_file("package.json")? {
            match manifest::parse_package_json(&content) {
                Ok((deps, scripts)) => {
                    builder = builder.manifest(Ecosystem::Npm);
                    for (name, range) in deps.dependencies {
                        builder = builder.dependency(Ecosystem::Npm, name, range);
                    }
                    for (name, range) in deps.dev_dependencies {
                        builder = builder.dev_dependency(Ecosystem::Npm, name, range);
                    }
                    for (name, command) in scripts {
                        builder = builder.script(name, command);
                    }
                }
                Err(e) => warn!("Skipping malformed package.json: {}", e),
            }
        }

        if let Some(content) = self.read_root_file("pyproject.toml")? {
            match manifest::parse_pyproject(&content) {
                Ok((deps, requires_python)) => {
                    builder = builder.manifest(Ecosystem::Python);
                    for (name, range) in deps.dependencies {
                        builder = builder.dependency(Ecosystem::Python, name, range);
                    }
                    for (name, range) in deps.dev_dependencies {
                        builder = builder.dev_dependency(Ecosystem::Python, name, range);
                    }
                    if let Some(spec) = requires_python {
                        builder = builder.python_requires(spec);
                    }
                }
                Err(e) => warn!("Skipping malformed pyproject.toml: {}", e),
            }
        }

        if let Some(content) = self.read_root_file("composer.json")? {
            match manifest::parse_composer_json(&content) {
                Ok(deps) => {
                    builder = builder.manifest(Ecosystem::Php);
                    for (name, range) in deps.dependencies {
                        builder = builder.dependency(Ecosystem::Php, name, range);
                    }
                    for (name, range) in deps.dev_dependencies {
                        builder = builder.dev_dependency(Ecosystem::Php, name, range);
                    }
                }
                Err(e) => warn!("Skipping malformed composer.json: {}", e),
            }
        }

        if let Some(content) = self.read_root_file("pubspec.yaml")? {
            match manifest::parse_pubspec(&content) {
                Ok(deps) => {
                    builder = builder.manifest(Ecosystem::Dart);
                    for (name, range) in deps.dependencies {
                        builder = builder.dependency(Ecosystem::Dart, name, range);
                    }
                    for (name, range) in deps.dev_dependencies {
                        builder = builder.dev_dependency(Ecosystem::Dart, name, range);
                    }
                }
                Err(e) => warn!("Skipping malformed pubspec.yaml: {}", e),
            }
        }

        Ok(builder)
    }

    fn read_root_file(&self, name: &str) -> Result<Option<String>> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GuideError::snapshot(name, e.to_string())),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, path: &str, content: &str) {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }

    #[test]
    fn test_scan_records_files_and_config_files() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "package.json", r#"{ "dependencies": { "react": "^18.2.0" } }"#);
        write(&tmp, "next.config.ts", "export default {}\n");
        write(&tmp, "src/app/page.tsx", "export default function Page() {}\n");

        let snapshot = SnapshotScanner::new(tmp.path()).scan().unwrap();

        assert!(snapshot.has_config_file("package.json"));
        assert!(snapshot.has_config_file("next.config.ts"));
        assert!(snapshot.has_file("src/app/page.tsx"));
        assert_eq!(snapshot.dependency(Ecosystem::Npm, "react"), Some("^18.2.0"));
    }

    #[test]
    fn test_scan_skips_vendor_dirs() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "node_modules/react/index.js", "module.exports = {}\n");
        write(&tmp, "src/index.js", "console.log('hi')\n");

        let snapshot = SnapshotScanner::new(tmp.path()).scan().unwrap();

        assert!(snapshot.has_file("src/index.js"));
        assert!(!snapshot.has_file("node_modules/react/index.js"));
    }

    #[test]
    fn test_malformed_manifest_does_not_abort() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "package.json", "{ not json");
        write(&tmp, "src/index.js", "console.log('hi')\n");

        let snapshot = SnapshotScanner::new(tmp.path()).scan().unwrap();
        assert!(!snapshot.has_manifest(Ecosystem::Npm));
        assert!(snapshot.has_file("src/index.js"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let result = SnapshotScanner::new("/nonexistent/path/guideweave").scan();
        assert!(matches!(result, Err(GuideError::Snapshot { .. })));
    }

    #[test]
    fn test_scan_parses_pyproject() {
        let tmp = TempDir::new().unwrap();
        write(
            &tmp,
            "pyproject.toml",
            "[project]\nname = \"demo\"\nrequires-python = \">=3.12\"\ndependencies = [\"flask>=3.0\"]\n",
        );

        let snapshot = SnapshotScanner::new(tmp.path()).scan().unwrap();
        assert_eq!(snapshot.dependency(Ecosystem::Python, "flask"), Some(">=3.0"));
        assert_eq!(snapshot.python_requires(), Some(">=3.12"));
    }
}
