//! Generate Command
//!
//! Full document generation: scan the project, run the pipeline, write the
//! composed document. Ctrl-C abandons in-flight module work and produces
//! no document.

use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::pipeline::GenerationPipeline;
use crate::snapshot::SnapshotScanner;
use crate::types::{GuideError, ProjectSnapshot, Result};

pub struct GenerateOptions {
    /// Project root; defaults to the current directory
    pub path: Option<PathBuf>,
    /// Output file override
    pub output: Option<PathBuf>,
    /// Print to stdout instead of writing a file
    pub stdout: bool,
    pub verbose: bool,
}

pub async fn run(options: GenerateOptions) -> Result<()> {
    let output_ui = Output::new();
    let config = ConfigLoader::load()?;

    let root = match options.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let snapshot = scan(root.clone()).await?;
    output_ui.info(&format!(
        "Scanned {} ({} files)",
        root.display(),
        snapshot.file_count()
    ));

    let pipeline = GenerationPipeline::from_config(&config);

    let report = tokio::select! {
        report = pipeline.run(Arc::new(snapshot)) => report,
        _ = tokio::signal::ctrl_c() => {
            output_ui.warning("Interrupted; no document written");
            return Err(GuideError::Cancelled);
        }
    };

    let rendered = report.document.render();

    if options.stdout {
        println!("{}", rendered);
    } else {
        let output_path = options
            .output
            .unwrap_or_else(|| root.join(&config.output.file));
        std::fs::write(&output_path, &rendered)?;
        output_ui.success(&format!("Wrote {}", output_path.display()));
    }

    match report.accepted_ids().as_slice() {
        [] => output_ui.info("No technologies detected; generic document produced"),
        ids => output_ui.info(&format!("Detected: {}", ids.join(", "))),
    }

    report_diagnostics(&output_ui, &report.diagnostics, options.verbose);

    Ok(())
}

/// Scanning is blocking I/O; keep it off the async runtime threads
pub(crate) async fn scan(root: PathBuf) -> Result<ProjectSnapshot> {
    tokio::task::spawn_blocking(move || SnapshotScanner::new(&root).scan())
        .await
        .map_err(|e| GuideError::snapshot("project scan", e.to_string()))?
}

/// Report degradations on the diagnostic channel; the document itself is
/// already complete.
pub(crate) fn report_diagnostics(
    output: &Output,
    diagnostics: &crate::diagnostics::Diagnostics,
    verbose: bool,
) {
    if diagnostics.is_clean() && !verbose {
        return;
    }
    for line in diagnostics.summary() {
        output.warning(&line);
    }
}
