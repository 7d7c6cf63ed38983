//! Document Assembler
//!
//! Walks the documents in input order and emits the Markdown report:
//!
//! ```text
//! ## Features
//! ### <feature>              use-case image
//! - **<scenario>**           activity image, per scenario
//! ## UI Elements             merged screens diagram, when any
//! ## Use cases listing       raw feature files, when enabled
//! ```
//!
//! Image references are resolved from identities only. Whether the files
//! exist is the cache gate's business.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::diagram::{DiagramDescription, DiagramIdentity, yuml};
use crate::feature::FeatureView;
use crate::types::UiGraph;

/// Assembler settings
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Directory image references point into; bare file names when unset
    pub image_dir: Option<PathBuf>,
    /// Append the raw feature files
    pub add_features: bool,
    /// Print each diagram's description under its image
    pub debug: bool,
}

/// The finished report, one Markdown line per block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedReport {
    blocks: Vec<String>,
}

impl RenderedReport {
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn to_markdown(&self) -> String {
        self.blocks.join("\n")
    }
}

impl std::fmt::Display for RenderedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_markdown())
    }
}

pub struct ReportAssembler {
    options: ReportOptions,
}

impl ReportAssembler {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Image path for an identity: `<image_dir>/<identity>.png`
    pub fn image_ref(&self, identity: &DiagramIdentity) -> String {
        image_ref(self.options.image_dir.as_deref(), identity)
    }

    /// Build the report
    ///
    /// `unavailable` lists identities that could not be rendered; they get
    /// a placeholder instead of an image.
    pub fn assemble<D: FeatureView>(
        &self,
        documents: &[D],
        global_ui: Option<&UiGraph>,
        unavailable: &HashSet<DiagramIdentity>,
    ) -> RenderedReport {
        let mut blocks = Vec::new();
        blocks.push("## Features".to_string());

        for doc in documents {
            blocks.push(format!("### {}", doc.name()));
            self.push_image(&mut blocks, doc.name(), doc.use_case(), unavailable);
            blocks.push(String::new());

            for scenario in doc.scenarios() {
                blocks.push(format!("- **{}**", scenario.display_name));
                self.push_image(
                    &mut blocks,
                    &scenario.display_name,
                    &scenario.activity,
                    unavailable,
                );
                blocks.push(String::new());
            }
        }

        if let Some(ui) = global_ui.and_then(yuml::ui_elements) {
            blocks.push("## UI Elements".to_string());
            blocks.push("*Screens and actions*".to_string());
            self.push_image(&mut blocks, "UI Screens and actions", &ui, unavailable);
            blocks.push(String::new());
        }

        if self.options.add_features {
            blocks.push(String::new());
            blocks.push("## Use cases listing".to_string());
            for doc in documents {
                blocks.push(String::new());
                blocks.push("``` gherkin".to_string());
                blocks.push(doc.source().to_string());
                blocks.push("```".to_string());
                blocks.push(String::new());
            }
        }

        RenderedReport { blocks }
    }

    fn push_image(
        &self,
        blocks: &mut Vec<String>,
        alt: &str,
        description: &DiagramDescription,
        unavailable: &HashSet<DiagramIdentity>,
    ) {
        let identity = description.identity();

        if unavailable.contains(&identity) {
            blocks.push(format!("*Diagram unavailable: {}*", identity));
        } else {
            blocks.push(format!("![{}]({})", alt, self.image_ref(&identity)));
        }

        if self.options.debug {
            blocks.push(format!("```yuml\n{}\n```", description.text()));
        }
    }
}

/// `<dir>/<identity>.png` with forward slashes, or just the file name
pub fn image_ref(dir: Option<&Path>, identity: &DiagramIdentity) -> String {
    let file_name = identity.file_name();
    match dir.map(|d| d.to_string_lossy().replace('\\', "/")) {
        Some(dir) if !dir.is_empty() => {
            format!("{}/{}", dir.trim_end_matches('/'), file_name)
        }
        _ => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::DiagramKind;
    use crate::feature::{Scenario, SpecDocument};
    use crate::types::UiElements;

    fn document(name: &str, use_case: &str, activities: &[(&str, &str)]) -> SpecDocument {
        SpecDocument::new(
            format!("{}.feature", name.to_lowercase()),
            format!("Feature: {}\n", name),
            name,
            DiagramDescription::new(DiagramKind::UseCase, use_case),
            activities
                .iter()
                .map(|(scenario, activity)| Scenario {
                    display_name: scenario.to_string(),
                    activity: DiagramDescription::new(DiagramKind::Activity, *activity),
                })
                .collect(),
            UiElements::new(),
        )
    }

    fn assembler(image_dir: Option<&str>) -> ReportAssembler {
        ReportAssembler::new(ReportOptions {
            image_dir: image_dir.map(PathBuf::from),
            ..Default::default()
        })
    }

    #[test]
    fn test_empty_input_has_only_features_heading() {
        let report =
            assembler(Some("img")).assemble::<SpecDocument>(&[], None, &HashSet::new());
        assert_eq!(report.to_markdown(), "## Features");

        let report = assembler(Some("img")).assemble::<SpecDocument>(
            &[],
            Some(&UiGraph::new()),
            &HashSet::new(),
        );
        assert!(!report.to_markdown().contains("UI Elements"));
    }

    #[test]
    fn test_images_in_document_order() {
        let doc = document("Login", "UC", &[("Log in", "AC")]);
        let h1 = DiagramIdentity::of("UC");
        let h2 = DiagramIdentity::of("AC");

        let report = assembler(Some("doc/img")).assemble(&[doc], None, &HashSet::new());
        let expected = [
            "## Features".to_string(),
            "### Login".to_string(),
            format!("![Login](doc/img/{}.png)", h1),
            String::new(),
            "- **Log in**".to_string(),
            format!("![Log in](doc/img/{}.png)", h2),
            String::new(),
        ];
        assert_eq!(report.blocks(), expected.as_slice());
    }

    #[test]
    fn test_document_without_scenarios() {
        let doc = document("Search", "UC", &[]);
        let report = assembler(None).assemble(&[doc], None, &HashSet::new());
        assert_eq!(report.blocks().len(), 4);
        assert_eq!(
            report.blocks()[2],
            format!("![Search]({}.png)", DiagramIdentity::of("UC"))
        );
    }

    #[test]
    fn test_ui_elements_section() {
        let mut ui = UiGraph::new();
        ui.add_button("Login", "submit");
        let ui_id = yuml::ui_elements(&ui).unwrap().identity();

        let report = assembler(Some("img")).assemble::<SpecDocument>(&[], Some(&ui), &HashSet::new());
        let md = report.to_markdown();
        assert!(md.contains("## UI Elements\n*Screens and actions*\n"));
        assert!(md.contains(&format!("![UI Screens and actions](img/{}.png)", ui_id)));
    }

    #[test]
    fn test_raw_appendix_reproduces_sources() {
        let a = document("Login", "UC1", &[]);
        let b = document("Search", "UC2", &[]);
        let assembler = ReportAssembler::new(ReportOptions {
            add_features: true,
            ..Default::default()
        });

        let md = assembler
            .assemble(&[a, b], None, &HashSet::new())
            .to_markdown();
        assert!(md.contains("## Use cases listing"));
        assert_eq!(md.matches("``` gherkin").count(), 2);
        let login = md.find("``` gherkin\nFeature: Login\n\n```").unwrap();
        let search = md.find("``` gherkin\nFeature: Search\n\n```").unwrap();
        assert!(login < search);
    }

    #[test]
    fn test_appendix_absent_by_default() {
        let doc = document("Login", "UC", &[]);
        let md = assembler(None)
            .assemble(&[doc], None, &HashSet::new())
            .to_markdown();
        assert!(!md.contains("Use cases listing"));
    }

    #[test]
    fn test_unavailable_diagram_gets_placeholder() {
        let doc = document("Login", "UC", &[("Log in", "AC")]);
        let missing = HashSet::from([DiagramIdentity::of("AC")]);
        let md = assembler(Some("img"))
            .assemble(&[doc], None, &missing)
            .to_markdown();
        assert!(md.contains(&format!("*Diagram unavailable: {}*", DiagramIdentity::of("AC"))));
        assert!(md.contains(&format!("img/{}.png", DiagramIdentity::of("UC"))));
    }

    #[test]
    fn test_debug_prints_descriptions() {
        let doc = document("Login", "[User]-(Log in)", &[]);
        let assembler = ReportAssembler::new(ReportOptions {
            debug: true,
            ..Default::default()
        });
        let md = assembler
            .assemble(&[doc], None, &HashSet::new())
            .to_markdown();
        assert!(md.contains("```yuml\n[User]-(Log in)\n```"));
    }

    #[test]
    fn test_image_ref_trailing_slash() {
        let id = DiagramIdentity::of("x");
        assert_eq!(
            image_ref(Some(Path::new("img/")), &id),
            format!("img/{}.png", id)
        );
        assert_eq!(image_ref(Some(Path::new("")), &id), format!("{}.png", id));
    }
}
