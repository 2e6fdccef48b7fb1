//! HTML generation for composed invoices.
//!
//! Generation is a pure function of a document snapshot and the rendered canvas
//! size. Style attributes are translated through fixed tables
//! ([`css_property`], [`css_unit`]) and emitted in schema order, so the same
//! input always produces byte-identical output.

use crate::canvas::CanvasDocument;
use crate::element::{CanvasElement, ElementKind, StyleKey};
use crate::markup::Element;
use kurbo::Size;
use thiserror::Error;

/// HTML generation errors.
#[derive(Debug, Error, PartialEq)]
pub enum GenerateError {
    #[error("Canvas surface is not mounted")]
    CanvasNotMounted,
}

/// Result type for generation.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// CSS property name for a style attribute.
pub fn css_property(key: StyleKey) -> &'static str {
    match key {
        StyleKey::FontSize => "font-size",
        StyleKey::FontWeight => "font-weight",
        StyleKey::Width => "width",
        StyleKey::Height => "height",
        StyleKey::Border => "border",
    }
}

/// Unit suffix for a style attribute.
pub fn css_unit(key: StyleKey) -> &'static str {
    match key {
        StyleKey::FontSize | StyleKey::Width | StyleKey::Height => "px",
        StyleKey::FontWeight | StyleKey::Border => "",
    }
}

/// Inline style for the wrapping block.
pub fn container_style(size: Size) -> String {
    format!(
        "position: relative; width: {}px; height: {}px; background-color: white; box-sizing: border-box;",
        size.width, size.height
    )
}

/// Inline style for a placed element.
pub fn element_style(element: &CanvasElement) -> String {
    let declarations: Vec<String> = element
        .styles
        .iter()
        .map(|(&key, value)| format!("{}:{}{}", css_property(key), value, css_unit(key)))
        .collect();
    format!(
        "position:absolute; left:{}px; top:{}px; {}",
        element.left(),
        element.top(),
        declarations.join(";")
    )
}

/// Markup fragment for one element.
pub fn element_markup(element: &CanvasElement) -> Element {
    let style = element_style(element);
    match element.kind {
        ElementKind::Input => Element::new("input")
            .with_attr("type", "text")
            .with_attr("value", element.content.as_str())
            .with_attr("style", style),
        ElementKind::Text => Element::new("div").with_attr("style", style).with_text(element.content.as_str()),
        ElementKind::Rectangle => Element::new("div").with_attr("style", style),
    }
}

/// Build the markup tree for a document rendered on a canvas of `size`.
pub fn generate_markup(document: &CanvasDocument, size: Size) -> Element {
    document
        .elements
        .iter()
        .fold(Element::new("div").with_attr("style", container_style(size)), |root, element| {
            root.with_child(element_markup(element))
        })
}

/// Generate the HTML string for a document rendered on a canvas of `size`.
pub fn generate_html(document: &CanvasDocument, size: Size) -> String {
    let html = generate_markup(document, size).to_html();
    log::debug!("Generated {} bytes of HTML for {} elements", html.len(), document.len());
    html
}
