//! Feature documents
//!
//! Adapter between the external Gherkin parser and the report: a parsed
//! [`GherkinFeature`] becomes a [`SpecDocument`] holding exactly what the
//! report consumes, behind the [`FeatureView`] interface.

pub mod gherkin;
pub mod parser;
pub mod ui;

pub use gherkin::{GherkinFeature, GherkinScenario, GherkinStep, decode_messages};
pub use parser::{CommandParser, FeatureParser, SharedParser};

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::constants::report::DEFAULT_ACTOR;
use crate::diagram::{DiagramDescription, yuml};
use crate::types::UiElements;

/// What the report needs from a parsed feature
pub trait FeatureView {
    fn name(&self) -> &str;

    /// Use-case diagram of the whole feature
    fn use_case(&self) -> &DiagramDescription;

    /// Scenarios in document order
    fn scenarios(&self) -> &[Scenario];

    fn ui_elements(&self) -> &UiElements;

    /// File the feature was read from
    fn path(&self) -> &Path;

    /// Raw text of that file
    fn source(&self) -> &str;
}

/// One scenario with its activity diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub display_name: String,
    pub activity: DiagramDescription,
}

/// Options affecting how descriptions are generated
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramOptions {
    /// Attach the feature narrative to the use-case diagram
    pub show_notes: bool,
}

/// One parsed input file
#[derive(Debug, Clone)]
pub struct SpecDocument {
    path: PathBuf,
    source: String,
    name: String,
    use_case: DiagramDescription,
    scenarios: Vec<Scenario>,
    ui_elements: UiElements,
}

static ACTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*as an?\s+(.+?)\s*,?\s*$").expect("valid regex")
});

impl SpecDocument {
    /// Assemble a document from its parts
    pub fn new(
        path: impl Into<PathBuf>,
        source: impl Into<String>,
        name: impl Into<String>,
        use_case: DiagramDescription,
        scenarios: Vec<Scenario>,
        ui_elements: UiElements,
    ) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
            name: name.into(),
            use_case,
            scenarios,
            ui_elements,
        }
    }

    /// Build the document for a parsed feature
    pub fn from_feature(
        path: impl Into<PathBuf>,
        source: impl Into<String>,
        feature: &GherkinFeature,
        options: DiagramOptions,
    ) -> Self {
        let scenarios: Vec<Scenario> = feature
            .scenarios
            .iter()
            .map(|scenario| {
                let steps: Vec<String> = feature
                    .background
                    .iter()
                    .chain(&scenario.steps)
                    .map(GherkinStep::label)
                    .collect();
                Scenario {
                    display_name: display_name(scenario),
                    activity: yuml::activity(&steps),
                }
            })
            .collect();

        let actor = actor(&feature.description);
        let cases: Vec<&str> = if scenarios.is_empty() {
            vec![feature.name.as_str()]
        } else {
            scenarios.iter().map(|s| s.display_name.as_str()).collect()
        };
        let note = options
            .show_notes
            .then_some(feature.description.as_str())
            .filter(|d| !d.trim().is_empty());
        let use_case = yuml::use_case(&actor, &cases, note);

        Self {
            path: path.into(),
            source: source.into(),
            name: feature.name.clone(),
            use_case,
            scenarios,
            ui_elements: ui::extract(&feature.background, &feature.scenarios),
        }
    }

    /// Every diagram of this document, use case first
    pub fn diagrams(&self) -> impl Iterator<Item = &DiagramDescription> {
        std::iter::once(&self.use_case).chain(self.scenarios.iter().map(|s| &s.activity))
    }
}

impl FeatureView for SpecDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn use_case(&self) -> &DiagramDescription {
        &self.use_case
    }

    fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    fn ui_elements(&self) -> &UiElements {
        &self.ui_elements
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Scenario name, or its keyword when unnamed
fn display_name(scenario: &GherkinScenario) -> String {
    if scenario.name.trim().is_empty() {
        scenario.keyword.trim().to_string()
    } else {
        scenario.name.trim().to_string()
    }
}

/// Role from an `As a <role>` narrative line
fn actor(description: &str) -> String {
    ACTOR
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_ACTOR.to_string())
}
