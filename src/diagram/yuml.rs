//! yUML description builders
//!
//! Produces the text the yUML service renders:
//!
//! - use case: `[User]-(Log in), [User]-(Log out)`
//! - activity: `(start)->(Given I am on the login screen)->(end)`
//! - class (UI elements): `[Login|submit;cancel], [Login]submit->[Home]`

use regex::Regex;
use std::sync::LazyLock;

use super::{DiagramDescription, DiagramKind};
use crate::types::UiGraph;

const STATEMENT_SEPARATOR: &str = ", ";

/// Characters with structural meaning in yUML
static RESERVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\](){}|;,<>\-]").expect("valid regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Make free text safe to embed as a yUML label
pub fn sanitize(label: &str) -> String {
    let stripped = RESERVED.replace_all(label, " ");
    WHITESPACE.replace_all(stripped.trim(), " ").trim().to_string()
}

/// Use-case diagram: the actor linked to every use case
///
/// `note` is attached to the actor when given.
pub fn use_case<S: AsRef<str>>(actor: &str, cases: &[S], note: Option<&str>) -> DiagramDescription {
    let actor = sanitize(actor);
    let mut statements: Vec<String> = cases
        .iter()
        .map(|case| format!("[{}]-({})", actor, sanitize(case.as_ref())))
        .collect();

    if let Some(note) = note.map(sanitize).filter(|n| !n.is_empty()) {
        statements.push(format!("[{}]-(note: {}{{bg:beige}})", actor, note));
    }

    DiagramDescription::new(DiagramKind::UseCase, statements.join(STATEMENT_SEPARATOR))
}

/// Activity diagram: steps chained between start and end
pub fn activity<S: AsRef<str>>(steps: &[S]) -> DiagramDescription {
    let mut nodes = Vec::with_capacity(steps.len() + 2);
    nodes.push("(start)".to_string());
    nodes.extend(
        steps
            .iter()
            .map(|step| sanitize(step.as_ref()))
            .filter(|step| !step.is_empty())
            .map(|step| format!("({})", step)),
    );
    nodes.push("(end)".to_string());

    DiagramDescription::new(DiagramKind::Activity, nodes.join("->"))
}

/// Class diagram of screens, their buttons and connections
///
/// Returns `None` for an empty graph.
pub fn ui_elements(graph: &UiGraph) -> Option<DiagramDescription> {
    if graph.is_empty() {
        return None;
    }

    let mut statements = Vec::new();

    for (screen, elements) in graph {
        let name = sanitize(screen);
        let buttons: Vec<String> = elements
            .buttons()
            .iter()
            .map(|b| sanitize(&b.id))
            .filter(|b| !b.is_empty())
            .collect();

        if buttons.is_empty() {
            statements.push(format!("[{}]", name));
        } else {
            statements.push(format!("[{}|{}]", name, buttons.join(";")));
        }
    }

    for (screen, elements) in graph {
        let name = sanitize(screen);
        for connection in elements.connections() {
            if let Some(target) = &connection.target {
                statements.push(format!(
                    "[{}]{}->[{}]",
                    name,
                    sanitize(&connection.id),
                    sanitize(target)
                ));
            }
        }
    }

    Some(DiagramDescription::new(
        DiagramKind::Class,
        statements.join(STATEMENT_SEPARATOR),
    ))
}
