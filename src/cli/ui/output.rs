use console::style;

use crate::diagram::FetchSummary;

pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Output that only prints errors
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("✓").green(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("ℹ").blue(), message);
        }
    }

    pub fn fetch_summary(&self, summary: &FetchSummary) {
        self.info(&format!(
            "Diagrams: {} cached, {} fetched",
            summary.hits, summary.fetched
        ));
        if !summary.unavailable.is_empty() {
            self.warning(&format!(
                "{} diagram(s) unavailable, placeholders written",
                summary.unavailable.len()
            ));
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
