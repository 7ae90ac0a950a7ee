//! Init Command
//!
//! Initialize guideweave in the current directory.

use crate::config::ConfigLoader;
use crate::types::{GuideError, Result};

pub fn run(force: bool) -> Result<()> {
    let root = std::env::current_dir()?;
    let project_dir = root.join(".guideweave");

    if project_dir.exists() && !force {
        return Err(GuideError::Config(
            "Already initialized. Use --force to overwrite.".to_string(),
        ));
    }

    // Get project name from directory
    let project_name = root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project")
        .to_string();

    // Initialize project directory structure and config
    ConfigLoader::init_project(Some(&project_name))?;

    // Initialize global config if not exists (don't force overwrite)
    if let Err(e) = ConfigLoader::init_global(false) {
        tracing::debug!("Global config init skipped: {}", e);
    }

    println!("✓ Initialized guideweave in .guideweave/");
    println!("  Project: {}", project_name);
    println!();
    println!("Next steps:");
    println!("  1. Run 'guideweave generate' to compose the guideline document");
    println!("  2. Drop fragment overrides into .guideweave/guidelines/ as needed");

    Ok(())
}
