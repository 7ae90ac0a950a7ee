//! Version Range Normalization
//!
//! Turns declared version ranges (`"^18.2.0"`, `">=5.0,<6"`, `"18.x"`) into
//! the normalized form guideline paths are keyed by. Non-numeric ranges
//! (git URLs, dist tags, wildcards) resolve to no version; absence is valid
//! and degrades to core-only guidelines downstream.

use std::sync::LazyLock;

use regex::Regex;

use super::def::VersionGranularity;

/// First numeric version in a range, after any comparator prefix
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\^~=v\s]*[<>]?=?\s*v?(\d+)(?:\.(\d+|x|\*))?").expect("valid version regex")
});

/// Normalize a declared range to a guideline version key.
///
/// Compound ranges use their first clause (`">=5.0,<6"` → `"5"`); wildcard
/// or non-numeric ranges yield `None`.
pub fn normalize_range(range: &str, granularity: VersionGranularity) -> Option<String> {
    let range = range.trim();
    if range.is_empty() || range.contains("://") || range.starts_with("git") {
        return None;
    }

    // First clause of a compound range; comparator-internal spaces are
    // handled by the regex itself.
    let clause = range
        .split([',', '|'])
        .find(|part| !part.trim().is_empty())?
        .trim();

    let captures = VERSION_RE.captures(clause)?;
    let major = captures.get(1)?.as_str();

    match granularity {
        VersionGranularity::Major => Some(major.to_string()),
        VersionGranularity::MajorMinor => match captures.get(2).map(|m| m.as_str()) {
            Some(minor) if minor != "x" && minor != "*" => Some(format!("{}.{}", major, minor)),
            _ => Some(major.to_string()),
        },
    }
}

// =============================================================================
// Tests
// =============================================================================
