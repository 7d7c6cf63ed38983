pub mod error;
pub mod ui;

pub use error::{ErrorCategory, GherkifyError, Result, ResultExt};
pub use ui::{ScreenElements, UiElement, UiElements, UiGraph};
