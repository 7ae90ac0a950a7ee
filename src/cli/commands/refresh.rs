//! Refresh Command
//!
//! Regenerates a single section of an existing document. Only the bytes
//! between the target section's markers change; the rest of the file is
//! preserved exactly, including any hand-written content outside markers.

use std::path::PathBuf;
use std::sync::Arc;

use super::generate::{report_diagnostics, scan};
use crate::cli::ui::Output;
use crate::compose::{ComposedDocument, Section};
use crate::config::ConfigLoader;
use crate::pipeline::GenerationPipeline;
use crate::types::{GuideError, Result};

pub struct RefreshOptions {
    /// Section name, case-insensitive: Stack, Commands, Workflow, Guidelines
    pub section: String,
    /// Project root; defaults to the current directory
    pub path: Option<PathBuf>,
    /// Document file override
    pub file: Option<PathBuf>,
    pub verbose: bool,
}

pub async fn run(options: RefreshOptions) -> Result<()> {
    let output_ui = Output::new();
    let config = ConfigLoader::load()?;

    let section = Section::parse(&options.section)
        .ok_or_else(|| GuideError::section(options.section.clone()))?;

    let root = match options.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let file = options.file.unwrap_or_else(|| root.join(&config.output.file));

    if !file.exists() {
        return Err(GuideError::Config(format!(
            "document not found: {} (run 'guideweave generate' first)",
            file.display()
        )));
    }
    let existing = std::fs::read_to_string(&file)?;

    let snapshot = scan(root).await?;
    let pipeline = GenerationPipeline::from_config(&config);

    let (body, diagnostics) = tokio::select! {
        result = pipeline.compose_section(Arc::new(snapshot), section) => result,
        _ = tokio::signal::ctrl_c() => {
            output_ui.warning("Interrupted; document unchanged");
            return Err(GuideError::Cancelled);
        }
    };

    let replaced = ComposedDocument::replace_section(&existing, section, &body)?;
    std::fs::write(&file, &replaced)?;

    output_ui.success(&format!(
        "Regenerated section '{}' in {}",
        section,
        file.display()
    ));
    report_diagnostics(&output_ui, &diagnostics, options.verbose);

    Ok(())
}
