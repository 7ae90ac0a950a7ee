//! Modules Command
//!
//! Lists known modules and flips their enabled state. Enable/disable
//! edits the project config's `disabled_modules` list so the change
//! persists across runs.

use std::fs;

use console::style;

use crate::catalog::ModuleCatalog;
use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{GuideError, Result};

/// List every registered module with its enabled state, in catalog order
pub fn list() -> Result<()> {
    let config = ConfigLoader::load()?;
    let catalog = ModuleCatalog::with_builtins_filtered(&config.detection.disabled_modules);

    let output = Output::new();
    output.section("Modules");

    for module in catalog.all_modules() {
        let marker = if catalog.is_enabled(module.id()) {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!(
            "{} {:<12} {:<14} {:?} ({})  {}",
            marker,
            module.id(),
            module.display_name(),
            module.kind(),
            module.priority_class().label(),
            style(module.keywords().join(", ")).dim(),
        );
    }

    Ok(())
}

/// Enable or disable one module in the project config
pub fn set_enabled(id: &str, enabled: bool) -> Result<()> {
    // Validate the id against the catalog before touching config
    let mut catalog = ModuleCatalog::with_builtins();
    catalog.set_enabled(id, enabled)?;

    if !ConfigLoader::is_project_initialized() {
        return Err(GuideError::NotInitialized);
    }

    let config_path = ConfigLoader::project_config_path();
    let mut config = ConfigLoader::load_from_file(&config_path)?;

    let disabled = &mut config.detection.disabled_modules;
    if enabled {
        disabled.retain(|d| d != id);
    } else if !disabled.iter().any(|d| d == id) {
        disabled.push(id.to_string());
        disabled.sort();
    }

    let serialized =
        toml::to_string_pretty(&config).map_err(|e| GuideError::Config(e.to_string()))?;
    fs::write(&config_path, serialized)?;

    let output = Output::new();
    output.success(&format!(
        "Module '{}' {}",
        id,
        if enabled { "enabled" } else { "disabled" }
    ));

    Ok(())
}
