//! Configuration Management
//!
//! Explicit configuration with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/gherkify/config.toml)
//! 3. Project config (.gherkify.toml)
//! 4. Environment variables (GHERKIFY_*)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
