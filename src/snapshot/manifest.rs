//! Manifest Parsing
//!
//! Parses ecosystem manifests into dependency tables for the snapshot:
//! `package.json` (npm), `pyproject.toml` (python), `composer.json` (php),
//! `pubspec.yaml` (dart). Malformed manifests are skipped with a warning;
//! a broken manifest must never abort snapshot construction.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::ManifestDeps;

// =============================================================================
// package.json
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct PackageJson {
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

/// Parse `package.json` into dependency tables plus scripts
pub fn parse_package_json(content: &str) -> serde_json::Result<(ManifestDeps, BTreeMap<String, String>)> {
    let parsed: PackageJson = serde_json::from_str(content)?;
    Ok((
        ManifestDeps {
            dependencies: parsed.dependencies,
            dev_dependencies: parsed.dev_dependencies,
        },
        parsed.scripts,
    ))
}

// =============================================================================
// pyproject.toml
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct PyProject {
    #[serde(default)]
    project: PyProjectTable,
}

#[derive(Debug, Default, Deserialize)]
struct PyProjectTable {
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default, rename = "optional-dependencies")]
    optional_dependencies: BTreeMap<String, Vec<String>>,
    #[serde(default, rename = "requires-python")]
    requires_python: Option<String>,
}

/// Parse `pyproject.toml` (PEP 621 `[project]` table).
///
/// Requirement strings like `django>=5.0,<6` split into a lowercased
/// distribution name and the remaining range. Optional dependency groups
/// land in the dev table.
pub fn parse_pyproject(content: &str) -> Result<(ManifestDeps, Option<String>), toml::de::Error> {
    let parsed: PyProject = toml::from_str(content)?;

    let mut deps = ManifestDeps::default();
    for req in &parsed.project.dependencies {
        if let Some((name, range)) = split_requirement(req) {
            deps.dependencies.insert(name, range);
        }
    }
    for group in parsed.project.optional_dependencies.values() {
        for req in group {
            if let Some((name, range)) = split_requirement(req) {
                deps.dev_dependencies.insert(name, range);
            }
        }
    }

    Ok((deps, parsed.project.requires_python))
}

/// Split a PEP 508 requirement into (normalized name, version range).
///
/// Environment markers and extras are dropped; a bare name maps to an
/// empty range.
fn split_requirement(req: &str) -> Option<(String, String)> {
    let req = req.split(';').next().unwrap_or(req).trim();
    if req.is_empty() {
        return None;
    }

    let split_at = req
        .find(|c: char| "><=!~ ([".contains(c))
        .unwrap_or(req.len());
    let (name, rest) = req.split_at(split_at);
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    // Strip extras syntax from the remainder: "uvicorn[standard]>=0.30"
    let range = rest
        .trim_start_matches(|c: char| c == '[')
        .split(']')
        .next_back()
        .unwrap_or(rest)
        .trim()
        .to_string();

    Some((name.to_lowercase(), range))
}

// =============================================================================
// composer.json
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct ComposerJson {
    #[serde(default)]
    require: BTreeMap<String, String>,
    #[serde(default, rename = "require-dev")]
    require_dev: BTreeMap<String, String>,
}

/// Parse `composer.json`. The `php` platform requirement stays in the
/// dependency table; the php language module reads its range from there.
pub fn parse_composer_json(content: &str) -> serde_json::Result<ManifestDeps> {
    let parsed: ComposerJson = serde_json::from_str(content)?;
    Ok(ManifestDeps {
        dependencies: parsed.require,
        dev_dependencies: parsed.require_dev,
    })
}

// =============================================================================
// pubspec.yaml
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct Pubspec {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_yaml::Value>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, serde_yaml::Value>,
}

/// Parse `pubspec.yaml`. Only simple string constraints are kept as ranges;
/// structured entries (git/path dependencies) map to an empty range.
pub fn parse_pubspec(content: &str) -> Result<ManifestDeps, serde_yaml::Error> {
    let parsed: Pubspec = serde_yaml::from_str(content)?;

    let stringify = |table: BTreeMap<String, serde_yaml::Value>| {
        table
            .into_iter()
            .map(|(name, value)| {
                let range = match value {
                    serde_yaml::Value::String(s) => s,
                    _ => String::new(),
                };
                (name, range)
            })
            .collect()
    };

    Ok(ManifestDeps {
        dependencies: stringify(parsed.dependencies),
        dev_dependencies: stringify(parsed.dev_dependencies),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_json() {
        let content = r#"{
            "name": "demo",
            "dependencies": { "react": "^18.2.0", "next": "^14.0.0" },
            "devDependencies": { "typescript": "~5.4.0" },
            "scripts": { "dev": "next dev", "build": "next build" }
        }"#;

        let (deps, scripts) = parse_package_json(content).unwrap();
        assert_eq!(deps.dependencies.get("react").unwrap(), "^18.2.0");
        assert_eq!(deps.dev_dependencies.get("typescript").unwrap(), "~5.4.0");
        assert_eq!(scripts.get("dev").unwrap(), "next dev");
    }

    #[test]
    fn test_parse_package_json_missing_tables() {
        let (deps, scripts) = parse_package_json(r#"{ "name": "bare" }"#).unwrap();
        assert!(deps.dependencies.is_empty());
        assert!(scripts.is_empty());
    }

    #[test]
    fn test_parse_pyproject() {
        let content = r#"
[project]
name = "demo"
requires-python = ">=3.11"
dependencies = ["Django>=5.0,<6", "gunicorn"]

[project.optional-dependencies]
dev = ["pytest>=8"]
"#;

        let (deps, requires) = parse_pyproject(content).unwrap();
        assert_eq!(deps.dependencies.get("django").unwrap(), ">=5.0,<6");
        assert_eq!(deps.dependencies.get("gunicorn").unwrap(), "");
        assert_eq!(deps.dev_dependencies.get("pytest").unwrap(), ">=8");
        assert_eq!(requires.as_deref(), Some(">=3.11"));
    }

    #[test]
    fn test_split_requirement_with_extras_and_markers() {
        let (name, range) = split_requirement("uvicorn[standard]>=0.30 ; python_version >= '3.9'")
            .unwrap();
        assert_eq!(name, "uvicorn");
        assert_eq!(range, ">=0.30");
    }

    #[test]
    fn test_parse_composer_json() {
        let content = r#"{
            "require": { "php": "^8.4", "laravel/framework": "^11.0" },
            "require-dev": { "phpunit/phpunit": "^11" }
        }"#;

        let deps = parse_composer_json(content).unwrap();
        assert_eq!(deps.dependencies.get("php").unwrap(), "^8.4");
        assert_eq!(deps.dev_dependencies.get("phpunit/phpunit").unwrap(), "^11");
    }

    #[test]
    fn test_parse_pubspec() {
        let content = r#"
name: demo
dependencies:
  flutter:
    sdk: flutter
  http: ^1.2.0
dev_dependencies:
  lints: ^4.0.0
"#;

        let deps = parse_pubspec(content).unwrap();
        assert_eq!(deps.dependencies.get("http").unwrap(), "^1.2.0");
        // Structured entries keep the name with an empty range
        assert_eq!(deps.dependencies.get("flutter").unwrap(), "");
        assert_eq!(deps.dev_dependencies.get("lints").unwrap(), "^4.0.0");
    }
}
