//! Markdown report generation
//!
//! - [`merge`]: folds per-document UI elements into the global graph
//! - [`assembler`]: emits the Markdown for documents, scenarios and the UI graph
//! - [`pipeline`]: drives parsing, merging, image fetching and writing

pub mod assembler;
pub mod merge;
pub mod pipeline;

pub use assembler::{RenderedReport, ReportAssembler, ReportOptions, image_ref};
pub use merge::{merge, merge_all};
pub use pipeline::{PipelineOutput, ReportPipeline};
