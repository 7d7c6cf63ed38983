pub mod commands;
pub mod ui;
pub mod util;

pub use ui::Output;
pub use util::{build_pipeline, expand_inputs, pipeline_for};
