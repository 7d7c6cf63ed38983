//! Gherkify - Markdown reports with yUML diagrams for Gherkin features
//!
//! Turns a set of feature files into one Markdown document: a use-case
//! diagram per feature, an activity diagram per scenario, a merged diagram
//! of the UI screens the steps mention, and optionally the raw sources.
//!
//! ## Core Features
//!
//! - **UI Element Merger**: one global screen graph across all features
//! - **Cache Gate**: diagrams are named by the SHA-256 of their description
//!   and only fetched when `<identity>.png` is missing
//! - **Document Assembler**: features and scenarios in input order
//!
//! ## Quick Start
//!
//! ```ignore
//! use gherkify::{Config, ReportPipeline};
//! use gherkify::cli::pipeline_for;
//!
//! let pipeline = pipeline_for(Config::default())?;
//! let output = pipeline.run(&[PathBuf::from("login.feature")]).await?;
//! println!("{}", output.report);
//! ```
//!
//! ## Modules
//!
//! - [`feature`]: external parser adapter and the per-document view
//! - [`diagram`]: yUML descriptions, identities, renderer and cache
//! - [`report`]: UI merging, Markdown assembly and the run pipeline
//! - [`config`]: layered configuration

pub mod cli;
pub mod config;
pub mod constants;
pub mod diagram;
pub mod feature;
pub mod report;
pub mod timeout;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, ParserConfig, RenderConfig, RenderFailurePolicy};

// Error Types
pub use types::error::{ErrorCategory, GherkifyError, Result, ResultExt};

// Domain
pub use diagram::{
    CacheGate, DiagramDescription, DiagramIdentity, DiagramKind, DiagramRenderer, SharedRenderer,
    YumlRenderer,
};
pub use feature::{CommandParser, FeatureParser, FeatureView, Scenario, SharedParser, SpecDocument};
pub use types::{ScreenElements, UiElement, UiElements, UiGraph};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use report::{PipelineOutput, RenderedReport, ReportAssembler, ReportOptions, ReportPipeline};
pub use timeout::with_timeout;
