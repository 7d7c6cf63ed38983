//! Configuration Types
//!
//! Every recognized option with its default. Invalid combinations are
//! rejected by [`Config::validate`] before any work begins.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{parser as parser_constants, render as render_constants};
use crate::types::{GherkifyError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the report is written to
    pub output_dir: PathBuf,

    /// Directory holding cached diagram PNGs; required when fetching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,

    /// Fetch missing diagrams before writing the report
    pub fetch_images: bool,

    /// Append the raw feature files to the report
    pub add_features: bool,

    /// Put the feature narrative on the use-case diagram as a note
    pub show_notes: bool,

    /// Log diagram descriptions and print them under each image
    pub debug: bool,

    /// Remote renderer settings
    pub render: RenderConfig,

    /// External parser settings
    pub parser: ParserConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            image_path: None,
            fetch_images: false,
            add_features: false,
            show_notes: false,
            debug: false,
            render: RenderConfig::default(),
            parser: ParserConfig::default(),
        }
    }
}

impl Config {
    /// Validate option values and combinations.
    /// Returns `GherkifyError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.fetch_images && self.image_path.is_none() {
            return Err(GherkifyError::Config(
                "image_path must be set when fetching diagram images".to_string(),
            ));
        }

        if self.render.timeout_secs == 0 {
            return Err(GherkifyError::Config(
                "render.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.render.concurrency == 0 {
            return Err(GherkifyError::Config(
                "render.concurrency must be greater than 0".to_string(),
            ));
        }

        if !render_constants::STYLES.contains(&self.render.style.as_str()) {
            return Err(GherkifyError::Config(format!(
                "Unknown render.style '{}'. Valid values: {}",
                self.render.style,
                render_constants::STYLES.join(", ")
            )));
        }

        let endpoint = url::Url::parse(&self.render.endpoint).map_err(|e| {
            GherkifyError::Config(format!(
                "Invalid render.endpoint '{}': {}",
                self.render.endpoint, e
            ))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(GherkifyError::Config(format!(
                "render.endpoint must use http or https, got: {}",
                endpoint.scheme()
            )));
        }

        if self.parser.timeout_secs == 0 {
            return Err(GherkifyError::Config(
                "parser.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.parser.command.trim().is_empty() {
            return Err(GherkifyError::Config(
                "parser.command must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Renderer Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Base URL of the yUML service
    pub endpoint: String,
    /// yUML style segment (scruffy, plain, boring)
    pub style: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent fetches
    pub concurrency: usize,
    /// What to do when a diagram cannot be rendered
    pub on_failure: RenderFailurePolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            endpoint: render_constants::DEFAULT_ENDPOINT.to_string(),
            style: render_constants::DEFAULT_STYLE.to_string(),
            timeout_secs: render_constants::DEFAULT_TIMEOUT_SECS,
            concurrency: render_constants::DEFAULT_CONCURRENCY,
            on_failure: RenderFailurePolicy::default(),
        }
    }
}

impl RenderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Handling of a failed diagram fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderFailurePolicy {
    /// Abort the run
    #[default]
    Fail,
    /// Keep going and print a placeholder where the image would be
    Placeholder,
}

impl std::fmt::Display for RenderFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderFailurePolicy::Fail => write!(f, "fail"),
            RenderFailurePolicy::Placeholder => write!(f, "placeholder"),
        }
    }
}

impl std::str::FromStr for RenderFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(RenderFailurePolicy::Fail),
            "placeholder" => Ok(RenderFailurePolicy::Placeholder),
            _ => Err(format!(
                "Unknown render failure policy: {}. Valid values: fail, placeholder",
                s
            )),
        }
    }
}

// =============================================================================
// Parser Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Parser executable
    pub command: String,
    /// Arguments before the feature file path
    pub args: Vec<String>,
    /// Process timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            command: parser_constants::DEFAULT_COMMAND.to_string(),
            args: parser_constants::DEFAULT_ARGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timeout_secs: parser_constants::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ParserConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Values given on the command line; unset fields leave the config alone
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_images: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_features: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_notes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

impl CliOverrides {
    /// Turn `false` flags into "not given" so they do not clobber config files
    pub fn flag(value: bool) -> Option<bool> {
        value.then_some(true)
    }
}
