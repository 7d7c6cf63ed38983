//! Diagrams Command
//!
//! Print the diagram descriptions of each feature with their identities,
//! without contacting the renderer.

use std::fmt::Write as _;
use std::path::Path;

use tokio::runtime::Runtime;

use crate::cli::util::{build_pipeline, expand_inputs};
use crate::config::CliOverrides;
use crate::diagram::{DiagramDescription, yuml};
use crate::feature::{FeatureView, SpecDocument};
use crate::types::{Result, UiGraph};

pub fn run(config_path: Option<&Path>, inputs: &[String], show_notes: bool) -> Result<()> {
    let files = expand_inputs(inputs)?;
    let overrides = CliOverrides {
        show_notes: CliOverrides::flag(show_notes),
        ..Default::default()
    };
    let pipeline = build_pipeline(config_path, &overrides)?;

    let rt = Runtime::new()?;
    let documents = rt.block_on(pipeline.load(&files))?;
    let ui = pipeline.collect_ui_elements(&documents);

    print!("{}", dump(&documents, &ui));
    Ok(())
}

/// Plain-text listing of every diagram, merged UI graph last
pub fn dump(documents: &[SpecDocument], ui: &UiGraph) -> String {
    let mut out = String::new();

    for doc in documents {
        let _ = writeln!(out, "# {} ({})", doc.name(), doc.path().display());
        for diagram in doc.diagrams() {
            line(&mut out, diagram);
        }
        out.push('\n');
    }

    if let Some(diagram) = yuml::ui_elements(ui) {
        out.push_str("# UI Elements\n");
        line(&mut out, &diagram);
    }

    out
}

fn line(out: &mut String, diagram: &DiagramDescription) {
    let _ = writeln!(
        out,
        "{} {:<8} {}",
        diagram.identity(),
        diagram.kind().as_str(),
        diagram.text()
    );
}
