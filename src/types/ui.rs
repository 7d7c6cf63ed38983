//! UI element types
//!
//! Screens, buttons and the navigational connections between screens, as
//! referenced from feature steps.

use indexmap::IndexMap;

/// A button or connection on a screen
///
/// Buttons carry no target. Connections point at the screen they lead to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UiElement {
    pub id: String,
    pub target: Option<String>,
}

impl UiElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Buttons and connections of a single screen
///
/// Both lists are insertion-ordered sets: an element is stored at most once,
/// at the position it was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenElements {
    buttons: Vec<UiElement>,
    connections: Vec<UiElement>,
}

impl ScreenElements {
    pub fn new(
        buttons: impl IntoIterator<Item = UiElement>,
        connections: impl IntoIterator<Item = UiElement>,
    ) -> Self {
        let mut screen = Self::default();
        screen.extend_buttons(buttons);
        screen.extend_connections(connections);
        screen
    }

    pub fn buttons(&self) -> &[UiElement] {
        &self.buttons
    }

    pub fn connections(&self) -> &[UiElement] {
        &self.connections
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty() && self.connections.is_empty()
    }

    pub fn add_button(&mut self, button: UiElement) {
        push_unique(&mut self.buttons, button);
    }

    pub fn add_connection(&mut self, connection: UiElement) {
        push_unique(&mut self.connections, connection);
    }

    pub fn extend_buttons(&mut self, buttons: impl IntoIterator<Item = UiElement>) {
        for button in buttons {
            self.add_button(button);
        }
    }

    pub fn extend_connections(&mut self, connections: impl IntoIterator<Item = UiElement>) {
        for connection in connections {
            self.add_connection(connection);
        }
    }
}

fn push_unique(list: &mut Vec<UiElement>, element: UiElement) {
    if !list.contains(&element) {
        list.push(element);
    }
}

/// Screen name → elements, in first-seen screen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiElements(IndexMap<String, ScreenElements>);

/// The merge of every document's [`UiElements`]
pub type UiGraph = UiElements;

impl UiElements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, screen: &str) -> Option<&ScreenElements> {
        self.0.get(screen)
    }

    pub fn contains_screen(&self, screen: &str) -> bool {
        self.0.contains_key(screen)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ScreenElements)> {
        self.0.iter()
    }

    /// Entry for `screen`, created empty if it was not seen before
    pub fn screen_mut(&mut self, screen: &str) -> &mut ScreenElements {
        self.0.entry(screen.to_string()).or_default()
    }

    /// Insert a screen only if absent; returns false when it already existed
    pub fn insert_new(&mut self, screen: impl Into<String>, elements: ScreenElements) -> bool {
        match self.0.entry(screen.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(elements);
                true
            }
        }
    }

    pub fn add_screen(&mut self, screen: &str) {
        self.screen_mut(screen);
    }

    pub fn add_button(&mut self, screen: &str, button: impl Into<String>) {
        self.screen_mut(screen).add_button(UiElement::new(button));
    }

    pub fn add_connection(&mut self, screen: &str, id: impl Into<String>, target: &str) {
        self.screen_mut(screen)
            .add_connection(UiElement::new(id).with_target(target));
    }
}

impl<'a> IntoIterator for &'a UiElements {
    type Item = (&'a String, &'a ScreenElements);
    type IntoIter = indexmap::map::Iter<'a, String, ScreenElements>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
