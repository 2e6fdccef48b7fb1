//! Canvas element definitions for the invoice designer.
//!
//! An element is one of three kinds (text block, input field, rectangle). Every
//! kind owns a fixed style schema; [`ElementKind::default_styles`] produces a map
//! holding exactly those keys and the store refuses style maps that deviate from it.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for canvas elements.
pub type ElementId = Uuid;

/// Style attributes keyed by name. Iteration order follows [`StyleKey`]'s
/// declaration order, which is also the HTML emission order.
pub type Styles = BTreeMap<StyleKey, StyleValue>;

/// The kind of a canvas element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Static block of text. The toolbar payload historically calls it `div`.
    #[serde(alias = "div")]
    Text,
    /// Single-line text input.
    Input,
    /// Bordered box without content.
    Rectangle,
}

impl ElementKind {
    /// Get all element kinds, in toolbar order.
    pub fn all() -> &'static [ElementKind] {
        &[ElementKind::Text, ElementKind::Input, ElementKind::Rectangle]
    }

    /// Get display name for the toolbar.
    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::Text => "Text",
            ElementKind::Input => "Input field",
            ElementKind::Rectangle => "Rectangle",
        }
    }

    /// Style keys this kind carries.
    pub fn style_schema(self) -> &'static [StyleKey] {
        match self {
            ElementKind::Text | ElementKind::Input => &[StyleKey::FontSize, StyleKey::FontWeight],
            ElementKind::Rectangle => &[StyleKey::Width, StyleKey::Height, StyleKey::Border],
        }
    }

    /// Default styles for a freshly dropped element.
    pub fn default_styles(self) -> Styles {
        self.style_schema()
            .iter()
            .map(|&key| (key, key.default_value()))
            .collect()
    }

    /// Default content for a freshly dropped element.
    pub fn default_content(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Input => "input",
            ElementKind::Rectangle => "",
        }
    }

    /// Whether the element renders its content.
    pub fn has_content(self) -> bool {
        !matches!(self, ElementKind::Rectangle)
    }

    /// Check that a style map holds exactly this kind's keys.
    pub fn matches_schema(self, styles: &Styles) -> bool {
        let schema = self.style_schema();
        styles.len() == schema.len() && schema.iter().all(|key| styles.contains_key(key))
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A style attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StyleKey {
    #[serde(rename = "fontSize")]
    FontSize,
    #[serde(rename = "fontWeight")]
    FontWeight,
    #[serde(rename = "width")]
    Width,
    #[serde(rename = "height")]
    Height,
    #[serde(rename = "border")]
    Border,
}

impl StyleKey {
    /// Attribute name as used by the property panel and in serialized documents.
    pub fn name(self) -> &'static str {
        match self {
            StyleKey::FontSize => "fontSize",
            StyleKey::FontWeight => "fontWeight",
            StyleKey::Width => "width",
            StyleKey::Height => "height",
            StyleKey::Border => "border",
        }
    }

    /// Look up a key by attribute name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fontSize" => Some(StyleKey::FontSize),
            "fontWeight" => Some(StyleKey::FontWeight),
            "width" => Some(StyleKey::Width),
            "height" => Some(StyleKey::Height),
            "border" => Some(StyleKey::Border),
            _ => None,
        }
    }

    /// Whether the attribute holds a pixel quantity.
    pub fn is_numeric(self) -> bool {
        matches!(self, StyleKey::FontSize | StyleKey::Width | StyleKey::Height)
    }

    fn default_value(self) -> StyleValue {
        match self {
            StyleKey::FontSize => StyleValue::Number(16.0),
            StyleKey::FontWeight => StyleValue::Text("normal".to_string()),
            StyleKey::Width | StyleKey::Height => StyleValue::Number(100.0),
            StyleKey::Border => StyleValue::Text("1px solid black".to_string()),
        }
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A style attribute value: either a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// Convert raw field text: numeric-looking input becomes a number, anything
    /// else is kept verbatim.
    pub fn coerce(raw: &str) -> Self {
        match parse_number(raw) {
            Some(n) => StyleValue::Number(n),
            None => StyleValue::Text(raw.to_string()),
        }
    }

    /// Get the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            StyleValue::Text(_) => None,
        }
    }

    /// Get the text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleValue::Number(_) => None,
            StyleValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => write!(f, "{n}"),
            StyleValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Text(s.to_string())
    }
}

/// Parse field text as a finite number. Surrounding whitespace is ignored;
/// empty text, `NaN` and infinities are not numbers.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// An element placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    pub(crate) id: ElementId,
    /// Element kind.
    pub kind: ElementKind,
    /// Top-left corner in canvas pixels.
    pub position: Point,
    /// Text payload. Always empty for rectangles.
    pub content: String,
    /// Style attributes; key set fixed by `kind`.
    pub styles: Styles,
}

impl CanvasElement {
    /// Create an element with the kind's default content and styles.
    pub fn new(kind: ElementKind, position: Point) -> Self {
        Self::with_content(kind, position, kind.default_content())
    }

    /// Create an element with custom content and default styles.
    /// Content is dropped for kinds that do not render it.
    pub fn with_content(kind: ElementKind, position: Point, content: impl Into<String>) -> Self {
        let content = if kind.has_content() { content.into() } else { String::new() };
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            content,
            styles: kind.default_styles(),
        }
    }

    /// Get the unique identifier.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Left edge in canvas pixels.
    pub fn left(&self) -> f64 {
        self.position.x
    }

    /// Top edge in canvas pixels.
    pub fn top(&self) -> f64 {
        self.position.y
    }

    /// Get a style value by key.
    pub fn style(&self, key: StyleKey) -> Option<&StyleValue> {
        self.styles.get(&key)
    }

    /// Check the style invariant for this element.
    pub fn has_valid_styles(&self) -> bool {
        self.kind.matches_schema(&self.styles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let text = CanvasElement::new(ElementKind::Text, Point::new(10.0, 20.0));
        assert_eq!(text.content, "text");
        assert_eq!(text.style(StyleKey::FontSize), Some(&StyleValue::Number(16.0)));
        assert_eq!(text.style(StyleKey::FontWeight), Some(&StyleValue::from("normal")));
        assert!(text.has_valid_styles());
    }

    #[test]
    fn test_input_defaults() {
        let input = CanvasElement::new(ElementKind::Input, Point::ZERO);
        assert_eq!(input.content, "input");
        assert_eq!(input.styles, ElementKind::Text.default_styles());
    }

    #[test]
    fn test_rectangle_defaults() {
        let rect = CanvasElement::with_content(ElementKind::Rectangle, Point::ZERO, "ignored");
        assert!(rect.content.is_empty());
        assert_eq!(rect.style(StyleKey::Width), Some(&StyleValue::Number(100.0)));
        assert_eq!(rect.style(StyleKey::Height), Some(&StyleValue::Number(100.0)));
        assert_eq!(rect.style(StyleKey::Border), Some(&StyleValue::from("1px solid black")));
        assert!(rect.style(StyleKey::FontSize).is_none());
    }

    #[test]
    fn test_unique_ids() {
        let a = CanvasElement::new(ElementKind::Text, Point::ZERO);
        let b = CanvasElement::new(ElementKind::Text, Point::ZERO);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_schema_mismatch() {
        let mut styles = ElementKind::Text.default_styles();
        assert!(ElementKind::Text.matches_schema(&styles));
        assert!(!ElementKind::Rectangle.matches_schema(&styles));

        styles.insert(StyleKey::Border, StyleValue::from("none"));
        assert!(!ElementKind::Text.matches_schema(&styles));

        styles.remove(&StyleKey::Border);
        styles.remove(&StyleKey::FontWeight);
        assert!(!ElementKind::Text.matches_schema(&styles));
    }

    #[test]
    fn test_style_order_follows_schema() {
        let keys: Vec<_> = ElementKind::Rectangle.default_styles().into_keys().collect();
        assert_eq!(keys, vec![StyleKey::Width, StyleKey::Height, StyleKey::Border]);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(StyleValue::coerce("24"), StyleValue::Number(24.0));
        assert_eq!(StyleValue::coerce(" 12.5 "), StyleValue::Number(12.5));
        assert_eq!(StyleValue::coerce("bold"), StyleValue::from("bold"));
        assert_eq!(StyleValue::coerce(""), StyleValue::from(""));
        assert_eq!(StyleValue::coerce("NaN"), StyleValue::from("NaN"));
        assert_eq!(StyleValue::coerce("inf"), StyleValue::from("inf"));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(StyleValue::Number(16.0).to_string(), "16");
        assert_eq!(StyleValue::Number(12.5).to_string(), "12.5");
        assert_eq!(StyleValue::from("bold").to_string(), "bold");
    }

    #[test]
    fn test_kind_serde() {
        assert_eq!(serde_json::to_string(&ElementKind::Input).unwrap(), "\"input\"");
        let kind: ElementKind = serde_json::from_str("\"div\"").unwrap();
        assert_eq!(kind, ElementKind::Text);
    }

    #[test]
    fn test_element_json_roundtrip_keeps_style_names() {
        let rect = CanvasElement::new(ElementKind::Rectangle, Point::new(20.0, 30.0));
        let json = serde_json::to_string(&rect).unwrap();
        assert!(json.contains("\"border\":\"1px solid black\""));
        let back: CanvasElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rect);
    }
}
