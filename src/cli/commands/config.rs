//! Config Command
//!
//! Manage gherkify configuration.
//!
//! Usage:
//!   gherkify config show [-f json]
//!   gherkify config path
//!   gherkify config init [-g] [--force]

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::{CliOverrides, ConfigLoader};
use crate::types::{GherkifyError, Result};

/// Show the effective configuration (merged from all sources)
pub fn show(config_path: Option<&Path>, format: &str) -> Result<()> {
    let as_json = match format {
        "json" => true,
        "toml" | "text" => false,
        other => {
            return Err(GherkifyError::Input(format!(
                "Unknown format '{}'. Valid values: toml, json",
                other
            )));
        }
    };

    let config = ConfigLoader::load(config_path, &CliOverrides::default())?;
    println!("{}", ConfigLoader::render_config(&config, as_json)?);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a default configuration file
pub fn init(global: bool, force: bool) -> Result<()> {
    let path = ConfigLoader::init(global, force)?;
    Output::new().success(&format!("Initialized configuration: {}", path.display()));
    Ok(())
}
