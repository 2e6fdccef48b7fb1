//! InvoiceDraft Core Library
//!
//! Platform-agnostic document model and output pipeline for the InvoiceDraft
//! template editor: placed elements, grid snapping, the canvas store, the
//! property panel model, HTML generation, print preview and downloads.

pub mod canvas;
pub mod config;
pub mod editor;
pub mod element;
pub mod export;
pub mod html;
pub mod markup;
pub mod preview;
pub mod properties;
pub mod snap;

pub use canvas::{CanvasDocument, CanvasEvent, CanvasStore, ElementChanges, ListenerId};
pub use config::{ConfigError, EditorConfig};
pub use editor::{DragPayload, InvoiceEditor};
pub use element::{CanvasElement, ElementId, ElementKind, StyleKey, StyleValue, Styles};
pub use export::{ExportError, HtmlDownload};
pub use html::{GenerateError, generate_html};
pub use markup::{Element, Node};
pub use preview::{MemorySurface, OutputSurface, PrintCapability, PrintError};
pub use properties::{PropertyEditor, PropertyError};
pub use snap::{GRID_SIZE, snap, snap_to_grid};
