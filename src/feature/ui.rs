//! UI element extraction from steps
//!
//! Steps name screens as `"Login" screen` (also `page`, `view`) and buttons
//! as `"submit" button` (also `link`). Within one scenario, a screen mention
//! makes that screen current; moving from one screen to another records a
//! connection on the screen being left, named after the last button pressed
//! there.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::gherkin::{GherkinScenario, GherkinStep};
use crate::types::UiElements;

static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"([^"]+)"\s+(screen|page|view|button|link)\b"#).expect("valid regex")
});

#[derive(Debug, PartialEq, Eq)]
enum Mention<'a> {
    Screen(&'a str),
    Button(&'a str),
}

fn mentions(text: &str) -> Vec<Mention<'_>> {
    MENTION
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().trim();
            let kind = caps.get(2)?.as_str().to_lowercase();
            if name.is_empty() {
                return None;
            }
            Some(match kind.as_str() {
                "button" | "link" => Mention::Button(name),
                _ => Mention::Screen(name),
            })
        })
        .collect()
}

/// Walks one scenario's steps, tracking where the user is
#[derive(Default)]
struct Walker {
    current: Option<String>,
    last_button: Option<String>,
}

impl Walker {
    fn step(&mut self, step: &GherkinStep, ui: &mut UiElements) {
        for mention in mentions(&step.text) {
            match mention {
                Mention::Screen(screen) => self.enter(screen, ui),
                Mention::Button(button) => self.press(button, ui),
            }
        }
    }

    fn enter(&mut self, screen: &str, ui: &mut UiElements) {
        ui.add_screen(screen);

        if let Some(previous) = self.current.take()
            && previous != screen
        {
            let id = self.last_button.take().unwrap_or_else(|| screen.to_string());
            ui.add_connection(&previous, id, screen);
        }

        self.current = Some(screen.to_string());
        self.last_button = None;
    }

    fn press(&mut self, button: &str, ui: &mut UiElements) {
        match &self.current {
            Some(screen) => {
                ui.add_button(screen, button);
                self.last_button = Some(button.to_string());
            }
            None => debug!("Ignoring button \"{}\" pressed on no known screen", button),
        }
    }
}

/// UI elements referenced by a feature's scenarios
///
/// `background` steps run before each scenario.
pub fn extract(background: &[GherkinStep], scenarios: &[GherkinScenario]) -> UiElements {
    let mut ui = UiElements::new();

    for scenario in scenarios {
        let mut walker = Walker::default();
        for step in background.iter().chain(&scenario.steps) {
            walker.step(step, &mut ui);
        }
    }

    if scenarios.is_empty() {
        let mut walker = Walker::default();
        for step in background {
            walker.step(step, &mut ui);
        }
    }

    ui
}
