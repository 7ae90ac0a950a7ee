//! Composed Document
//!
//! The final artifact: four named sections in fixed order, each wrapped in
//! stable begin/end markers. Sections are independently regenerable:
//! replacing one section touches only the bytes strictly between its own
//! markers and leaves every other byte of the document identical.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{GuideError, Result};

// =============================================================================
// Sections
// =============================================================================

/// Document sections in their fixed emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    Stack,
    Commands,
    Workflow,
    Guidelines,
}

impl Section {
    /// All sections, in emission order
    pub const ALL: [Section; 4] = [
        Section::Stack,
        Section::Commands,
        Section::Workflow,
        Section::Guidelines,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Stack => "Stack",
            Self::Commands => "Commands",
            Self::Workflow => "Workflow",
            Self::Guidelines => "Guidelines",
        }
    }

    /// Parse a section name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    pub fn begin_marker(&self) -> String {
        format!("<!-- BEGIN: {} -->", self.name())
    }

    pub fn end_marker(&self) -> String {
        format!("<!-- END: {} -->", self.name())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Document
// =============================================================================

/// A fully composed document: one body per section.
///
/// Rendering is pure: the same section bodies always produce the same
/// bytes, which is what makes regeneration idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedDocument {
    sections: BTreeMap<Section, String>,
}

impl ComposedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_section(&mut self, section: Section, body: impl Into<String>) {
        self.sections.insert(section, body.into());
    }

    pub fn section(&self, section: Section) -> &str {
        self.sections.get(&section).map(String::as_str).unwrap_or("")
    }

    /// Render the full document: sections in fixed order, each wrapped in
    /// its marker pair, separated by one blank line.
    pub fn render(&self) -> String {
        let blocks: Vec<String> = Section::ALL
            .iter()
            .map(|section| {
                format!(
                    "{}\n{}\n{}\n",
                    section.begin_marker(),
                    self.section(*section),
                    section.end_marker()
                )
            })
            .collect();
        blocks.join("\n")
    }

    /// Replace one section's body inside an existing rendered document.
    ///
    /// Only the bytes strictly between the section's begin and end markers
    /// change; everything else, including content outside any marker pair,
    /// is preserved byte for byte. Fails if the markers are missing.
    pub fn replace_section(existing: &str, section: Section, new_body: &str) -> Result<String> {
        let begin = section.begin_marker();
        let end = section.end_marker();

        let begin_pos = existing
            .find(&begin)
            .ok_or_else(|| GuideError::section(section.name()))?;
        let body_start = begin_pos + begin.len();
        let end_offset = existing[body_start..]
            .find(&end)
            .ok_or_else(|| GuideError::section(section.name()))?;
        let end_pos = body_start + end_offset;

        let mut replaced = String::with_capacity(existing.len());
        replaced.push_str(&existing[..body_start]);
        replaced.push('\n');
        replaced.push_str(new_body);
        replaced.push('\n');
        replaced.push_str(&existing[end_pos..]);
        Ok(replaced)
    }

    /// Extract one section's body from an existing rendered document
    pub fn section_body(existing: &str, section: Section) -> Option<String> {
        let begin = section.begin_marker();
        let end = section.end_marker();

        let begin_pos = existing.find(&begin)?;
        let body_start = begin_pos + begin.len();
        let end_offset = existing[body_start..].find(&end)?;
        let raw = &existing[body_start..body_start + end_offset];
        let trimmed = raw.strip_prefix('\n').unwrap_or(raw);
        let trimmed = trimmed.strip_suffix('\n').unwrap_or(trimmed);
        Some(trimmed.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
