//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/gherkify/config.toml)
//! 3. Project config (.gherkify.toml), or an explicit `--config` file
//! 4. Environment variables (GHERKIFY_* prefix, `__` between nested keys)
//! 5. Command line overrides

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::{CliOverrides, Config};
use crate::types::{GherkifyError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with the full resolution chain:
    /// defaults → global → project (or `explicit`) → env vars → CLI
    pub fn load(explicit: Option<&Path>, overrides: &CliOverrides) -> Result<Config> {
        let mut files = Vec::new();

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(GherkifyError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            files.push(path.to_path_buf());
        } else {
            if let Some(global_path) = Self::global_config_path()
                && global_path.exists()
            {
                files.push(global_path);
            }
            let project_path = Self::project_config_path();
            if project_path.exists() {
                files.push(project_path);
            }
        }

        Self::load_layers(&files, overrides)
    }

    /// Load configuration from a specific file plus env and CLI layers
    pub fn load_from_file(path: &Path, overrides: &CliOverrides) -> Result<Config> {
        Self::load_layers(&[path.to_path_buf()], overrides)
    }

    fn load_layers(files: &[PathBuf], overrides: &CliOverrides) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for file in files {
            debug!("Loading config from: {}", file.display());
            figment = figment.merge(Toml::file(file));
        }

        // e.g. GHERKIFY_RENDER__TIMEOUT_SECS -> render.timeout_secs
        figment = figment.merge(Env::prefixed("GHERKIFY_").split("__").lowercase(true));
        figment = figment.merge(Serialized::defaults(overrides));

        let config: Config = figment
            .extract()
            .map_err(|e| GherkifyError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/gherkify/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("gherkify"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".gherkify.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Render the effective configuration as TOML or JSON
    pub fn render_config(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| GherkifyError::Config(e.to_string()))
        }
    }

    /// Write a default config file, globally or in the working directory
    pub fn init(global: bool, force: bool) -> Result<PathBuf> {
        let path = if global {
            let dir = Self::global_dir().ok_or_else(|| {
                GherkifyError::Config("Cannot determine global config directory".to_string())
            })?;
            fs::create_dir_all(&dir)?;
            dir.join("config.toml")
        } else {
            Self::project_config_path()
        };

        if path.exists() && !force {
            return Err(GherkifyError::Config(format!(
                "Config already exists: {}. Use --force to overwrite.",
                path.display()
            )));
        }

        fs::write(&path, Self::default_config())?;
        info!("Created config: {}", path.display());
        Ok(path)
    }

    /// Default config file content (TOML)
    fn default_config() -> String {
        r#"# Gherkify Configuration
# Project settings in .gherkify.toml override ~/.config/gherkify/config.toml.

output_dir = "."
# image_path = "doc/images"
fetch_images = false
add_features = false
show_notes = false
debug = false

[render]
endpoint = "https://yuml.me"
style = "scruffy"
timeout_secs = 30
concurrency = 4
# "fail" aborts the run, "placeholder" keeps going without the image
on_failure = "fail"

[parser]
command = "gherkin"
args = ["--no-source", "--no-pickles"]
timeout_secs = 30
"#
        .to_string()
    }
}
