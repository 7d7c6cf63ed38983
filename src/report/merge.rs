//! UI element merger
//!
//! Folds per-document UI element mappings into one global graph. A screen
//! seen for the first time is copied as is; a known screen gets the new
//! buttons and connections appended, keeping the first occurrence of each.

use crate::feature::FeatureView;
use crate::types::{UiElements, UiGraph};

/// Merge `incoming` into `global`, returning the new graph
pub fn merge(mut global: UiGraph, incoming: &UiElements) -> UiGraph {
    for (screen, data) in incoming {
        if global.insert_new(screen.clone(), data.clone()) {
            continue;
        }

        let existing = global.screen_mut(screen);
        if !data.buttons().is_empty() {
            existing.extend_buttons(data.buttons().iter().cloned());
        }
        if !data.connections().is_empty() {
            existing.extend_connections(data.connections().iter().cloned());
        }
    }
    global
}

/// Global graph over all documents, merged in document order
pub fn merge_all<'a, D, I>(documents: I) -> UiGraph
where
    D: FeatureView + 'a,
    I: IntoIterator<Item = &'a D>,
{
    documents
        .into_iter()
        .fold(UiGraph::new(), |global, doc| merge(global, doc.ui_elements()))
}
