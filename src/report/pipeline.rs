//! Report Pipeline
//!
//! One run over a set of feature files:
//!
//! 1. `load`: read and parse every file in input order (first failure aborts)
//! 2. `collect_ui_elements`: merge the per-document UI graphs
//! 3. `fetch_diagram_images`: bring the image cache up to date (optional)
//! 4. `assemble`: build the Markdown report
//! 5. `write`: store it under the output directory

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::assembler::{RenderedReport, ReportAssembler, ReportOptions};
use super::merge::merge_all;
use crate::config::Config;
use crate::diagram::{
    CacheGate, DiagramDescription, DiagramIdentity, FetchSummary, SharedRenderer, yuml,
};
use crate::feature::{DiagramOptions, FeatureView, SharedParser, SpecDocument};
use crate::types::{GherkifyError, Result, ResultExt, UiGraph};

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub report: RenderedReport,
    pub documents: usize,
    /// Present when images were fetched
    pub fetch: Option<FetchSummary>,
}

pub struct ReportPipeline {
    config: Config,
    parser: SharedParser,
    renderer: SharedRenderer,
}

impl ReportPipeline {
    /// Create a pipeline, rejecting invalid configuration up front
    pub fn new(config: Config, parser: SharedParser, renderer: SharedRenderer) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            parser,
            renderer,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read and parse `files` in order
    pub async fn load(&self, files: &[PathBuf]) -> Result<Vec<SpecDocument>> {
        let options = DiagramOptions {
            show_notes: self.config.show_notes,
        };
        let mut documents = Vec::with_capacity(files.len());

        for path in files {
            let bytes = tokio::fs::read(path).await.parse_context(path)?;
            let source = String::from_utf8_lossy(&bytes).into_owned();

            debug!("Parsing {} with {}", path.display(), self.parser.name());
            let feature = self.parser.parse(path, &source).await?;
            let document = SpecDocument::from_feature(path, source, &feature, options);

            if self.config.debug {
                for diagram in document.diagrams() {
                    debug!(
                        "{} {} {}: {}",
                        path.display(),
                        diagram.kind(),
                        diagram.identity(),
                        diagram.text()
                    );
                }
            }

            documents.push(document);
        }

        Ok(documents)
    }

    /// Global UI graph over all documents
    pub fn collect_ui_elements<D: FeatureView>(&self, documents: &[D]) -> UiGraph {
        merge_all(documents)
    }

    /// Make sure every diagram of the report has an image in `image_path`
    pub async fn fetch_diagram_images<D: FeatureView>(
        &self,
        documents: &[D],
        ui: &UiGraph,
    ) -> Result<FetchSummary> {
        let image_dir = self.config.image_path.as_ref().ok_or_else(|| {
            GherkifyError::Config("image_path must be set to fetch diagram images".to_string())
        })?;

        let ui_diagram = yuml::ui_elements(ui);
        if self.config.debug
            && let Some(diagram) = &ui_diagram
        {
            debug!("UI elements {}: {}", diagram.identity(), diagram.text());
        }

        let descriptions: Vec<&DiagramDescription> = documents
            .iter()
            .flat_map(|doc| {
                std::iter::once(doc.use_case()).chain(doc.scenarios().iter().map(|s| &s.activity))
            })
            .chain(ui_diagram.as_ref())
            .collect();

        let gate = CacheGate::open(image_dir, self.renderer.clone()).await?;
        let summary = gate
            .ensure_all(
                descriptions,
                self.config.render.concurrency,
                self.config.render.on_failure,
            )
            .await?;

        info!(
            "Diagrams: {} cached, {} fetched, {} unavailable",
            summary.hits,
            summary.fetched,
            summary.unavailable.len()
        );

        Ok(summary)
    }

    /// Build the report; `unavailable` identities get placeholders
    pub fn assemble<D: FeatureView>(
        &self,
        documents: &[D],
        ui: &UiGraph,
        unavailable: &HashSet<DiagramIdentity>,
    ) -> RenderedReport {
        let assembler = ReportAssembler::new(ReportOptions {
            image_dir: self.config.image_path.clone(),
            add_features: self.config.add_features,
            debug: self.config.debug,
        });
        assembler.assemble(documents, Some(ui), unavailable)
    }

    /// Load, merge, fetch when enabled, and assemble
    pub async fn run(&self, files: &[PathBuf]) -> Result<PipelineOutput> {
        let documents = self.load(files).await?;
        let ui = self.collect_ui_elements(&documents);

        let fetch = if self.config.fetch_images {
            Some(self.fetch_diagram_images(&documents, &ui).await?)
        } else {
            None
        };

        let unavailable = fetch
            .as_ref()
            .map(|summary| summary.unavailable.clone())
            .unwrap_or_default();
        let report = self.assemble(&documents, &ui, &unavailable);

        Ok(PipelineOutput {
            report,
            documents: documents.len(),
            fetch,
        })
    }

    /// Write the report to `<output_dir>/<file_name>`
    pub async fn write(&self, report: &RenderedReport, file_name: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        let path = self.config.output_dir.join(file_name);
        tokio::fs::write(&path, report.to_markdown()).await?;
        info!("Wrote report to {}", path.display());
        Ok(path)
    }
}
