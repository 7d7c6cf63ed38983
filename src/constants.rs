//! Global Constants
//!
//! Centralized defaults and tuning values.

/// Remote diagram renderer constants
pub mod render {
    /// Default yUML endpoint
    pub const DEFAULT_ENDPOINT: &str = "https://yuml.me";

    /// Default yUML style
    pub const DEFAULT_STYLE: &str = "scruffy";

    /// Styles the yUML service accepts
    pub const STYLES: &[&str] = &["scruffy", "plain", "boring"];

    /// Per-request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Maximum diagram fetches in flight
    pub const DEFAULT_CONCURRENCY: usize = 4;

    /// Extension of cached diagram images
    pub const IMAGE_EXTENSION: &str = "png";
}

/// External Gherkin parser constants
pub mod parser {
    /// Executable of the cucumber/gherkin message stream parser
    pub const DEFAULT_COMMAND: &str = "gherkin";

    /// Arguments placed before the feature file path
    pub const DEFAULT_ARGS: &[&str] = &["--no-source", "--no-pickles"];

    /// Parser process timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}

/// Report layout constants
pub mod report {
    /// Default report file name
    pub const DEFAULT_FILE_NAME: &str = "README.md";

    /// Actor used in use-case diagrams when the narrative names none
    pub const DEFAULT_ACTOR: &str = "User";
}
