//! CLI Common Utilities
//!
//! Shared setup for the commands: configuration loading and input expansion.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{CliOverrides, Config, ConfigLoader};
use crate::diagram::{SharedRenderer, YumlRenderer};
use crate::feature::{CommandParser, SharedParser};
use crate::report::ReportPipeline;
use crate::types::{GherkifyError, Result};

const GLOB_CHARS: &[char] = &['*', '?', '['];

/// Expand input arguments into feature file paths
///
/// Arguments containing glob metacharacters are expanded (matches sorted);
/// plain paths are kept as given. Repeated paths keep their first position.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        let candidates = if input.contains(GLOB_CHARS) {
            let mut matches = glob::glob(input)
                .map_err(|e| GherkifyError::Input(format!("Invalid pattern '{}': {}", input, e)))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| GherkifyError::Input(e.to_string()))?;
            matches.retain(|p| p.is_file());
            matches.sort();
            matches
        } else {
            vec![PathBuf::from(input)]
        };

        for path in candidates {
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        return Err(GherkifyError::Input(format!(
            "No feature files matched: {}",
            inputs.join(" ")
        )));
    }

    Ok(files)
}

/// Load configuration and build a pipeline with the default adapters
pub fn build_pipeline(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<ReportPipeline> {
    let config = ConfigLoader::load(config_path, overrides)?;
    pipeline_for(config)
}

/// Pipeline over the external parser and the yUML renderer
pub fn pipeline_for(config: Config) -> Result<ReportPipeline> {
    let parser: SharedParser = Arc::new(CommandParser::new(config.parser.clone()));
    let renderer: SharedRenderer = Arc::new(YumlRenderer::new(&config.render)?);
    ReportPipeline::new(config, parser, renderer)
}
