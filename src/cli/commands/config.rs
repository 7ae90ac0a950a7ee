//! Config Command
//!
//! Show, edit, and initialize configuration files.

use crate::config::ConfigLoader;
use crate::types::Result;

pub fn show(format: &str) -> Result<()> {
    ConfigLoader::show_config(format == "json")
}

pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

pub fn edit(global: bool) -> Result<()> {
    ConfigLoader::edit_config(global)
}

pub fn init_global(force: bool) -> Result<()> {
    let dir = ConfigLoader::init_global(force)?;
    println!("Global config directory: {}", dir.display());
    Ok(())
}

pub fn init_project() -> Result<()> {
    let dir = ConfigLoader::init_project(None)?;
    println!("Project config directory: {}", dir.display());
    Ok(())
}
