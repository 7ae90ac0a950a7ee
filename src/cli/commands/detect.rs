//! Detect Command
//!
//! Diagnostic view of the detection phase: every enabled module's
//! confidence, acceptance, evidence, and resolved version, without writing
//! a document.

use std::path::PathBuf;
use std::sync::Arc;

use console::style;

use super::generate::scan;
use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::detect::{DetectionOrchestrator, VersionResolver};
use crate::diagnostics::Diagnostics;
use crate::modules::SharedModule;
use crate::pipeline::GenerationPipeline;
use crate::types::Result;

pub struct DetectOptions {
    pub path: Option<PathBuf>,
    /// Output format: text, json
    pub format: String,
}

pub async fn run(options: DetectOptions) -> Result<()> {
    let config = ConfigLoader::load()?;

    let root = match options.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let snapshot = Arc::new(scan(root.clone()).await?);

    let pipeline = GenerationPipeline::from_config(&config);
    let modules = pipeline.catalog().enabled_modules();
    let mut diagnostics = Diagnostics::new();

    let orchestrator = DetectionOrchestrator::from_config(&config.detection);
    let detection = orchestrator
        .detect(Arc::clone(&snapshot), &modules, &mut diagnostics)
        .await;

    let accepted: Vec<SharedModule> = modules
        .iter()
        .filter(|m| detection.is_accepted(m.id()))
        .cloned()
        .collect();
    let versions = VersionResolver::from_config(&config.detection)
        .resolve(Arc::clone(&snapshot), &accepted, &mut diagnostics)
        .await;

    if options.format == "json" {
        let report = serde_json::json!({
            "root": root.display().to_string(),
            "scanned_at": chrono::Utc::now().to_rfc3339(),
            "results": detection.results,
            "accepted": detection.accepted,
            "versions": versions,
            "diagnostics": diagnostics,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let output = Output::new();
    output.section("Detection results");

    for module in &modules {
        let Some(result) = detection.results.get(module.id()) else {
            continue;
        };
        let marker = if detection.is_accepted(module.id()) {
            style("✓").green()
        } else if result.accepted {
            // Accepted by confidence, removed by exclusion
            style("–").yellow()
        } else {
            style("·").dim()
        };
        let version = versions
            .get(module.id())
            .and_then(|v| v.as_deref())
            .unwrap_or("-");
        println!(
            "{} {:<14} {:>5.2}  version {:<6} {}",
            marker,
            module.display_name(),
            result.confidence,
            version,
            style(result.evidence.join("; ")).dim()
        );
    }

    if !diagnostics.is_clean() || !diagnostics.exclusions.is_empty() {
        output.section("Diagnostics");
        for line in diagnostics.summary() {
            output.warning(&line);
        }
    }

    Ok(())
}
