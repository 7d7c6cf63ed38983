//! Generate Command
//!
//! Build the Markdown report for a set of feature files.
//!
//! Usage:
//!   gherkify generate features/*.feature --image-path doc/img --fetch

use std::path::{Path, PathBuf};

use tokio::runtime::Runtime;
use tracing::info;

use crate::cli::ui::Output;
use crate::cli::util::{build_pipeline, expand_inputs};
use crate::config::CliOverrides;
use crate::types::{GherkifyError, Result};

/// Generate options as given on the command line
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Feature files or glob patterns
    pub inputs: Vec<String>,
    pub output_dir: Option<PathBuf>,
    /// Report file name inside the output directory
    pub file: PathBuf,
    pub image_path: Option<PathBuf>,
    pub fetch: bool,
    pub add_features: bool,
    pub show_notes: bool,
    pub debug: bool,
    /// Print the report instead of writing it
    pub stdout: bool,
    pub quiet: bool,
}

impl GenerateOptions {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            output_dir: self.output_dir.clone(),
            image_path: self.image_path.clone(),
            fetch_images: CliOverrides::flag(self.fetch),
            add_features: CliOverrides::flag(self.add_features),
            show_notes: CliOverrides::flag(self.show_notes),
            debug: CliOverrides::flag(self.debug),
        }
    }
}

pub fn run(config_path: Option<&Path>, options: GenerateOptions) -> Result<()> {
    let output = if options.quiet || options.stdout {
        Output::quiet()
    } else {
        Output::new()
    };

    let files = expand_inputs(&options.inputs)?;
    let pipeline = build_pipeline(config_path, &options.overrides())?;
    info!("Generating report for {} feature file(s)", files.len());

    let rt = Runtime::new()?;
    let (result, written) = rt.block_on(async {
        let result = pipeline.run(&files).await?;
        let written = if options.stdout {
            None
        } else {
            Some(pipeline.write(&result.report, &options.file).await?)
        };
        Ok::<_, GherkifyError>((result, written))
    })?;

    if let Some(summary) = &result.fetch {
        output.fetch_summary(summary);
    }

    match written {
        Some(path) => output.success(&format!(
            "Wrote {} ({} feature(s))",
            path.display(),
            result.documents
        )),
        None => println!("{}", result.report),
    }

    Ok(())
}
