//! Gherkin message stream decoding
//!
//! The cucumber `gherkin` tool prints one JSON envelope per line. Only
//! `gherkinDocument` and `parseError` envelopes matter here; everything else
//! (`source`, `pickle`, ...) is ignored.

use serde::Deserialize;
use std::path::Path;

use crate::types::{GherkifyError, Result};

// =============================================================================
// Decoded model
// =============================================================================

/// One parsed feature
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GherkinFeature {
    pub name: String,
    pub description: String,
    /// Background steps, run before every scenario
    pub background: Vec<GherkinStep>,
    pub scenarios: Vec<GherkinScenario>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GherkinScenario {
    pub keyword: String,
    pub name: String,
    pub steps: Vec<GherkinStep>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GherkinStep {
    pub keyword: String,
    pub text: String,
}

impl GherkinStep {
    pub fn new(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            text: text.into(),
        }
    }

    /// `Given I am logged in`
    pub fn label(&self) -> String {
        format!("{} {}", self.keyword.trim(), self.text.trim())
            .trim()
            .to_string()
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    gherkin_document: Option<Document>,
    parse_error: Option<ParseErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct Document {
    feature: Option<Feature>,
}

#[derive(Debug, Deserialize)]
struct ParseErrorMessage {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Feature {
    name: String,
    description: String,
    children: Vec<Child>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Child {
    background: Option<StepContainer>,
    scenario: Option<StepContainer>,
    rule: Option<Rule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Rule {
    children: Vec<Child>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StepContainer {
    keyword: String,
    name: String,
    steps: Vec<Step>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Step {
    keyword: String,
    text: String,
}

impl From<Step> for GherkinStep {
    fn from(step: Step) -> Self {
        GherkinStep::new(step.keyword, step.text)
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode the message stream the parser printed for `path`
///
/// Fails with a parse error when the stream reports one, contains malformed
/// JSON, or holds no feature.
pub fn decode_messages(path: &Path, ndjson: &str) -> Result<GherkinFeature> {
    let mut feature = None;

    for (index, line) in ndjson.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let envelope: Envelope = serde_json::from_str(line).map_err(|e| {
            GherkifyError::parse(
                path.display().to_string(),
                format!("invalid message on line {}: {}", index + 1, e),
            )
        })?;

        if let Some(error) = envelope.parse_error {
            return Err(GherkifyError::parse(
                path.display().to_string(),
                error.message,
            ));
        }

        if let Some(decoded) = envelope.gherkin_document.and_then(|doc| doc.feature) {
            feature = Some(convert(decoded));
        }
    }

    feature.ok_or_else(|| {
        GherkifyError::parse(
            path.display().to_string(),
            "no feature found in parser output",
        )
    })
}

fn convert(feature: Feature) -> GherkinFeature {
    let mut out = GherkinFeature {
        name: feature.name.trim().to_string(),
        description: feature.description.trim().to_string(),
        ..Default::default()
    };
    collect_children(feature.children, &mut out);
    out
}

/// Rules are flattened; a rule's background only applies inside that rule
fn collect_children(children: Vec<Child>, out: &mut GherkinFeature) {
    for child in children {
        if let Some(background) = child.background {
            out.background
                .extend(background.steps.into_iter().map(GherkinStep::from));
        }
        if let Some(scenario) = child.scenario {
            out.scenarios.push(GherkinScenario {
                keyword: scenario.keyword.trim().to_string(),
                name: scenario.name.trim().to_string(),
                steps: scenario.steps.into_iter().map(GherkinStep::from).collect(),
            });
        }
        if let Some(rule) = child.rule {
            let mut inner = GherkinFeature::default();
            collect_children(rule.children, &mut inner);
            for mut scenario in inner.scenarios {
                let mut steps = inner.background.clone();
                steps.append(&mut scenario.steps);
                scenario.steps = steps;
                out.scenarios.push(scenario);
            }
        }
    }
}
