//! Editor session: the canvas store plus its generated, preview and print outputs.
//!
//! [`InvoiceEditor`] receives the discrete UI events (drops, drag ends, clicks,
//! property edits, toolbar buttons) and routes them to the store, the property
//! editor and the generation pipeline. It keeps the last generated markup and
//! the last flattened preview, which are the two output surfaces next to the
//! live canvas.

use crate::canvas::{CanvasDocument, CanvasStore, ElementChanges};
use crate::config::{ConfigResult, EditorConfig};
use crate::element::{CanvasElement, ElementId, ElementKind};
use crate::export::HtmlDownload;
use crate::html::{self, GenerateError, GenerateResult};
use crate::markup::Element;
use crate::preview::{self, OutputSurface, PrintCapability, PrintError, PrintResult};
use crate::properties::{PropertyEditor, PropertyField, PropertyResult};
use crate::snap;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Payload carried by a drag operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DragPayload {
    /// A new element dragged from the toolbar.
    ToolbarItem {
        #[serde(rename = "itemType")]
        kind: ElementKind,
    },
    /// An element already on the canvas.
    CanvasItem { id: ElementId },
}

/// Editing session for one invoice template.
#[derive(Debug)]
pub struct InvoiceEditor {
    config: EditorConfig,
    store: CanvasStore,
    properties: PropertyEditor,
    /// Rendered size of the editing surface, once mounted.
    canvas_size: Option<Size>,
    generated: Option<Element>,
    preview: Option<Element>,
}

impl Default for InvoiceEditor {
    fn default() -> Self {
        Self::with_valid_config(EditorConfig::default())
    }
}

impl InvoiceEditor {
    /// Create an empty session. Fails if `config` does not validate.
    pub fn new(config: EditorConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: EditorConfig) -> Self {
        let mut store = CanvasStore::with_grid_size(config.grid_size);
        store.set_placeholders(config.text_placeholder.as_str(), config.input_placeholder.as_str());
        let (min, max) = config.font_size_range;
        Self {
            config,
            store,
            properties: PropertyEditor::new(min, max),
            canvas_size: None,
            generated: None,
            preview: None,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Get the canvas store.
    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    /// Get the canvas store mutably (for subscribing to changes).
    pub fn store_mut(&mut self) -> &mut CanvasStore {
        &mut self.store
    }

    /// Get the current document.
    pub fn document(&self) -> &CanvasDocument {
        self.store.document()
    }

    /// Record that the editing surface is laid out at `width`x`height` pixels.
    pub fn mount_canvas(&mut self, width: f64, height: f64) {
        self.canvas_size = Some(Size::new(width, height));
    }

    /// Record that the editing surface is gone.
    pub fn unmount_canvas(&mut self) {
        self.canvas_size = None;
    }

    /// Whether generation is currently possible.
    pub fn can_generate(&self) -> bool {
        self.canvas_size.is_some()
    }

    /// Handle a completed drop at `client` (screen coordinates) onto a canvas
    /// whose top-left corner is at `canvas_origin`. Returns the new element's ID.
    ///
    /// Drops of canvas items and drops that land on a non-finite point are ignored.
    pub fn handle_drop(&mut self, payload: DragPayload, client: Point, canvas_origin: Point) -> Option<ElementId> {
        let DragPayload::ToolbarItem { kind } = payload else {
            return None;
        };
        let position = snap::snap_drop(client, canvas_origin, self.config.grid_size);
        if !(position.x.is_finite() && position.y.is_finite()) {
            log::warn!("Ignoring drop of {} at a non-finite point", kind);
            return None;
        }
        let id = self.store.add_element(kind, position.x, position.y);
        log::debug!("Dropped {} at ({}, {})", kind, position.x, position.y);
        Some(id)
    }

    /// Handle the end of a drag that moved element `id` by `delta`.
    pub fn handle_drag_end(&mut self, id: ElementId, delta: Vec2) {
        let Some(origin) = self.document().get(id).map(|element| element.position) else {
            return;
        };
        let position = snap::snap_drag(origin, delta, self.config.grid_size);
        self.store.update_element(id, ElementChanges::position(position));
    }

    /// Select an element.
    pub fn click_element(&mut self, id: ElementId) {
        self.store.select_element(id);
    }

    /// Click on empty canvas: clear the selection.
    pub fn click_canvas(&mut self) {
        self.store.clear_selection();
    }

    /// Enter inline editing.
    pub fn double_click_element(&mut self, id: ElementId) {
        self.store.set_editing(id, true);
    }

    /// Leave inline editing.
    pub fn blur_element(&mut self, id: ElementId) {
        self.store.set_editing(id, false);
    }

    /// Replace the content of an element from inline editing or input typing.
    pub fn edit_content(&mut self, id: ElementId, content: impl Into<String>) {
        self.store.update_element(id, ElementChanges::content(content));
    }

    /// Get the selected element.
    pub fn selected_element(&self) -> Option<&CanvasElement> {
        self.document().selected_element()
    }

    /// Fields of the property panel for the selected element.
    pub fn property_fields(&self) -> Vec<PropertyField> {
        self.selected_element()
            .map(|element| self.properties.fields(element.kind))
            .unwrap_or_default()
    }

    /// Edit a property of the selected element.
    pub fn edit_property(&mut self, name: &str, raw: &str) -> PropertyResult<Option<ElementId>> {
        self.properties.apply(&mut self.store, name, raw)
    }

    /// Delete the selected element.
    pub fn delete_selected(&mut self) -> Option<CanvasElement> {
        self.properties.delete_selected(&mut self.store)
    }

    /// Generate HTML for the current document without touching any surface.
    pub fn render_html(&self) -> GenerateResult<String> {
        let size = self.canvas_size.ok_or(GenerateError::CanvasNotMounted)?;
        Ok(html::generate_html(self.document(), size))
    }

    /// Generate markup into the generated-output surface and return its HTML.
    pub fn generate_html(&mut self) -> GenerateResult<String> {
        let Some(size) = self.canvas_size else {
            log::warn!("HTML generation requested before the canvas was mounted");
            return Err(GenerateError::CanvasNotMounted);
        };
        let markup = html::generate_markup(self.document(), size);
        let out = markup.to_html();
        self.generated = Some(markup);
        Ok(out)
    }

    /// Last generated markup.
    pub fn generated(&self) -> Option<&Element> {
        self.generated.as_ref()
    }

    /// Flatten the last generated markup into the preview surface.
    /// Returns `None` when nothing has been generated yet.
    pub fn generate_preview(&mut self) -> Option<&Element> {
        let flattened = preview::flatten_inputs(self.generated.as_ref()?);
        self.preview = Some(flattened);
        self.preview.as_ref()
    }

    /// Last preview markup.
    pub fn preview(&self) -> Option<&Element> {
        self.preview.as_ref()
    }

    /// Print the preview through `printer`, temporarily showing it on `surface`.
    pub fn print_invoice<S, P>(&self, surface: &mut S, printer: &mut P) -> PrintResult<()>
    where
        S: OutputSurface,
        P: PrintCapability + ?Sized,
    {
        let Some(preview) = self.preview.as_ref() else {
            log::warn!("Print requested without a preview");
            return Err(PrintError::NothingToPrint);
        };
        preview::print_preview(preview, &self.config.print_title, surface, printer)
    }

    /// Generate a fresh download of the current document.
    pub fn download_html(&self) -> GenerateResult<HtmlDownload> {
        let mut download = HtmlDownload::new(self.render_html()?).with_file_name(self.config.download_file_name.as_str());
        download.mime_type.clone_from(&self.config.download_mime_type);
        Ok(download)
    }

    /// Remove every element and empty the generated and preview surfaces.
    pub fn clear_all(&mut self) {
        self.store.clear_all();
        self.generated = None;
        self.preview = None;
    }
}
