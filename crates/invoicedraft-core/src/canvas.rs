//! Canvas document and state management.
//!
//! [`CanvasDocument`] is the plain data: ordered elements, the selected element
//! and the inline-edit flags. [`CanvasStore`] owns a document and is the only
//! way to mutate it; every operation is total, so an unknown element id is a
//! no-op rather than an error. Subscribers registered with
//! [`CanvasStore::subscribe`] are told about every change that took effect.

use crate::element::{CanvasElement, ElementId, ElementKind, Styles};
use crate::snap::{self, GRID_SIZE};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A canvas document containing all elements and interaction state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Elements in creation order (also the HTML emission order).
    pub elements: Vec<CanvasElement>,
    /// Currently selected element.
    #[serde(default)]
    pub selected: Option<ElementId>,
    /// Inline-edit flag per element.
    #[serde(default)]
    pub editing: HashMap<ElementId, bool>,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an element by ID.
    pub fn get(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|element| element.id == id)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|element| element.id == id)
    }

    /// Check if an element exists.
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Get the selected element, if it still exists.
    pub fn selected_element(&self) -> Option<&CanvasElement> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Check if an element is in inline-edit mode.
    pub fn is_editing(&self, id: ElementId) -> bool {
        self.editing.get(&id).copied().unwrap_or(false)
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    ///
    /// Loading repairs what the store would never produce: elements whose
    /// styles do not match their kind, with a non-finite position, or repeating
    /// an earlier ID are dropped; rectangle content is cleared; positions are
    /// snapped to [`GRID_SIZE`]. Selection or edit flags pointing at missing
    /// elements are cleared.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_str(json)?;
        let mut seen = HashSet::new();
        doc.elements.retain_mut(|element| {
            if !element.has_valid_styles() {
                log::warn!("Dropping element {} with invalid {} styles", element.id, element.kind);
                return false;
            }
            if seen.contains(&element.id) {
                log::warn!("Dropping duplicate element {}", element.id);
                return false;
            }
            let Some(position) = snap::snap_finite(element.position, GRID_SIZE) else {
                log::warn!("Dropping element {} with non-finite position", element.id);
                return false;
            };
            element.position = position;
            if !element.kind.has_content() {
                element.content.clear();
            }
            seen.insert(element.id);
            true
        });
        if doc.selected.is_some_and(|id| !seen.contains(&id)) {
            doc.selected = None;
        }
        doc.editing.retain(|id, _| seen.contains(id));
        Ok(doc)
    }
}

/// A sparse change to an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementChanges {
    /// New position; snapped to the store's grid when applied.
    pub position: Option<Point>,
    /// New content.
    pub content: Option<String>,
    /// Full replacement style map.
    pub styles: Option<Styles>,
}

impl ElementChanges {
    /// Change only the position.
    pub fn position(position: Point) -> Self {
        Self { position: Some(position), ..Self::default() }
    }

    /// Change only the content.
    pub fn content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Self::default() }
    }

    /// Replace only the styles.
    pub fn styles(styles: Styles) -> Self {
        Self { styles: Some(styles), ..Self::default() }
    }

    /// Check if nothing would change.
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.content.is_none() && self.styles.is_none()
    }
}

/// A change that took effect in the store.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// An element was appended to the document.
    ElementAdded(ElementId),
    /// At least one field of an element changed.
    ElementUpdated(ElementId),
    /// An element was removed.
    ElementDeleted(ElementId),
    /// The selection moved to another element or was cleared.
    SelectionChanged(Option<ElementId>),
    /// An element entered or left inline editing.
    EditingChanged { id: ElementId, editing: bool },
    /// Every element was removed.
    Cleared,
}

/// Handle returned by [`CanvasStore::subscribe`].
pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&CanvasEvent, &CanvasDocument)>;

/// Owns the canvas document and publishes changes to subscribers.
pub struct CanvasStore {
    document: CanvasDocument,
    grid_size: f64,
    text_placeholder: String,
    input_placeholder: String,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: ListenerId,
}

impl fmt::Debug for CanvasStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasStore")
            .field("document", &self.document)
            .field("grid_size", &self.grid_size)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for CanvasStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasStore {
    /// Create a store with an empty document on the default grid.
    pub fn new() -> Self {
        Self::with_grid_size(GRID_SIZE)
    }

    /// Create a store with an empty document on a custom grid.
    ///
    /// A grid size that is not a positive finite number falls back to
    /// [`GRID_SIZE`].
    pub fn with_grid_size(grid_size: f64) -> Self {
        let grid_size = if grid_size.is_finite() && grid_size > 0.0 {
            grid_size
        } else {
            log::warn!("Invalid grid size {}, using {}", grid_size, GRID_SIZE);
            GRID_SIZE
        };
        Self {
            document: CanvasDocument::new(),
            grid_size,
            text_placeholder: ElementKind::Text.default_content().to_string(),
            input_placeholder: ElementKind::Input.default_content().to_string(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Set the content given to newly created text and input elements.
    pub fn set_placeholders(&mut self, text: impl Into<String>, input: impl Into<String>) {
        self.text_placeholder = text.into();
        self.input_placeholder = input.into();
    }

    /// Get the grid size used for snapping.
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Read-only view of the current document.
    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    /// Clone the current document.
    pub fn snapshot(&self) -> CanvasDocument {
        self.document.clone()
    }

    /// Register a change listener. Listeners run synchronously after each
    /// mutation, in registration order.
    pub fn subscribe(&mut self, listener: impl FnMut(&CanvasEvent, &CanvasDocument) + 'static) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a change listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: CanvasEvent) {
        log::debug!("Canvas event: {:?}", event);
        for (_, listener) in &mut self.listeners {
            listener(&event, &self.document);
        }
    }

    /// Add a new element of `kind` at the snapped position. Returns its ID.
    ///
    /// A position that is not finite after snapping places the element at the
    /// canvas origin.
    pub fn add_element(&mut self, kind: ElementKind, left: f64, top: f64) -> ElementId {
        let position = snap::snap_finite(Point::new(left, top), self.grid_size).unwrap_or_else(|| {
            log::warn!("Non-finite position ({}, {}) for new {}, placing at origin", left, top, kind);
            Point::ZERO
        });
        let content = match kind {
            ElementKind::Text => self.text_placeholder.as_str(),
            ElementKind::Input => self.input_placeholder.as_str(),
            ElementKind::Rectangle => "",
        };
        let element = CanvasElement::with_content(kind, position, content);
        let id = element.id;
        self.document.elements.push(element);
        self.notify(CanvasEvent::ElementAdded(id));
        id
    }

    /// Merge `changes` into the element with `id`.
    ///
    /// Positions are snapped to the grid; a position that is not finite after
    /// snapping is ignored. A style map that does not match the element's
    /// schema is ignored, as is content for rectangles. Returns true and
    /// notifies subscribers only if some field actually changed.
    pub fn update_element(&mut self, id: ElementId, changes: ElementChanges) -> bool {
        let grid_size = self.grid_size;
        let Some(element) = self.document.get_mut(id) else {
            return false;
        };
        let mut changed = false;

        if let Some(position) = changes.position {
            match snap::snap_finite(position, grid_size) {
                Some(position) if position != element.position => {
                    element.position = position;
                    changed = true;
                }
                Some(_) => {}
                None => log::warn!("Ignoring non-finite position for {}", id),
            }
        }
        if let Some(content) = changes.content {
            if element.kind.has_content() && content != element.content {
                element.content = content;
                changed = true;
            }
        }
        if let Some(styles) = changes.styles {
            if !element.kind.matches_schema(&styles) {
                log::warn!("Ignoring style map that does not match {} schema", element.kind);
            } else if styles != element.styles {
                element.styles = styles;
                changed = true;
            }
        }

        if changed {
            self.notify(CanvasEvent::ElementUpdated(id));
        }
        changed
    }

    /// Delete an element. Deleting any existing element clears the selection.
    pub fn delete_element(&mut self, id: ElementId) -> Option<CanvasElement> {
        let index = self.document.elements.iter().position(|element| element.id == id)?;
        let removed = self.document.elements.remove(index);
        self.document.editing.remove(&id);
        self.notify(CanvasEvent::ElementDeleted(id));

        if self.document.selected.take().is_some() {
            self.notify(CanvasEvent::SelectionChanged(None));
        }
        Some(removed)
    }

    /// Select an element (replaces the previous selection).
    pub fn select_element(&mut self, id: ElementId) {
        if !self.document.contains(id) || self.document.selected == Some(id) {
            return;
        }
        self.document.selected = Some(id);
        self.notify(CanvasEvent::SelectionChanged(Some(id)));
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        if self.document.selected.take().is_some() {
            self.notify(CanvasEvent::SelectionChanged(None));
        }
    }

    /// Set the inline-edit flag for an element.
    pub fn set_editing(&mut self, id: ElementId, editing: bool) {
        if !self.document.contains(id) || self.document.editing.get(&id) == Some(&editing) {
            return;
        }
        self.document.editing.insert(id, editing);
        self.notify(CanvasEvent::EditingChanged { id, editing });
    }

    /// Remove all elements, the selection and all edit flags.
    pub fn clear_all(&mut self) {
        self.document.elements.clear();
        self.document.selected = None;
        self.document.editing.clear();
        self.notify(CanvasEvent::Cleared);
    }
}
