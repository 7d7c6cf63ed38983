//! Diagrams
//!
//! Diagram descriptions in yUML syntax, their content-derived identity, the
//! remote renderer and the on-disk cache gate in front of it.
//!
//! ```text
//! DiagramDescription ──identity──▶ <sha256>.png
//!          │                           │
//!          └──────▶ CacheGate ──miss──▶ DiagramRenderer (yuml.me)
//! ```

pub mod cache;
pub mod identity;
pub mod renderer;
pub mod yuml;

pub use cache::{CacheGate, CacheOutcome, FetchSummary};
pub use identity::DiagramIdentity;
pub use renderer::{DiagramRenderer, SharedRenderer, YumlRenderer};

use std::fmt;

/// yUML diagram types this crate produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    UseCase,
    Activity,
    Class,
}

impl DiagramKind {
    /// Path segment used by the yUML service
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramKind::UseCase => "usecase",
            DiagramKind::Activity => "activity",
            DiagramKind::Class => "class",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagram source text plus the diagram type needed to render it
///
/// Identity is computed from the text only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagramDescription {
    kind: DiagramKind,
    text: String,
}

impl DiagramDescription {
    pub fn new(kind: DiagramKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn identity(&self) -> DiagramIdentity {
        DiagramIdentity::of(&self.text)
    }
}

impl fmt::Display for DiagramDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
