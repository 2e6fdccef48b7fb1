//! Property panel: per-kind editable fields and validated style edits.

use crate::canvas::{CanvasStore, ElementChanges};
use crate::element::{CanvasElement, ElementId, ElementKind, StyleKey, StyleValue, Styles};
use thiserror::Error;

/// Smallest font size offered by the panel, in pixels.
pub const MIN_FONT_SIZE: f64 = 8.0;
/// Largest font size offered by the panel, in pixels.
pub const MAX_FONT_SIZE: f64 = 72.0;

/// Allowed font weights, as (value, label) pairs.
pub const FONT_WEIGHTS: &[(&str, &str)] = &[("normal", "Normal"), ("bold", "Bold")];

/// Property edit errors.
#[derive(Debug, Error, PartialEq)]
pub enum PropertyError {
    #[error("{property}: \"{value}\" is not a valid number")]
    InvalidNumber { property: StyleKey, value: String },
    #[error("Font weight must be normal or bold, got \"{0}\"")]
    InvalidFontWeight(String),
    #[error("{kind} has no property named \"{name}\"")]
    UnknownProperty { kind: ElementKind, name: String },
}

/// Result type for property edits.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// How a field is edited.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyControl {
    /// Numeric field with an optional advisory range, in pixels.
    Number { min: Option<f64>, max: Option<f64> },
    /// Drop-down of fixed options.
    Select { options: &'static [(&'static str, &'static str)] },
    /// Free text.
    Text,
}

/// One editable field of the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyField {
    pub key: StyleKey,
    pub label: &'static str,
    pub control: PropertyControl,
}

/// Validates raw field input and applies it to the selected element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyEditor {
    font_size_range: (f64, f64),
}

impl Default for PropertyEditor {
    fn default() -> Self {
        Self::new(MIN_FONT_SIZE, MAX_FONT_SIZE)
    }
}

impl PropertyEditor {
    /// Create an editor clamping font sizes to `[min, max]`.
    pub fn new(min_font_size: f64, max_font_size: f64) -> Self {
        Self { font_size_range: (min_font_size.min(max_font_size), max_font_size.max(min_font_size)) }
    }

    /// Fields shown for an element kind, in panel order.
    pub fn fields(&self, kind: ElementKind) -> Vec<PropertyField> {
        kind.style_schema().iter().map(|&key| self.field(key)).collect()
    }

    fn field(&self, key: StyleKey) -> PropertyField {
        let (label, control) = match key {
            StyleKey::FontSize => (
                "Font size",
                PropertyControl::Number {
                    min: Some(self.font_size_range.0),
                    max: Some(self.font_size_range.1),
                },
            ),
            StyleKey::FontWeight => ("Font weight", PropertyControl::Select { options: FONT_WEIGHTS }),
            StyleKey::Width => ("Width", PropertyControl::Number { min: None, max: None }),
            StyleKey::Height => ("Height", PropertyControl::Number { min: None, max: None }),
            StyleKey::Border => ("Border", PropertyControl::Text),
        };
        PropertyField { key, label, control }
    }

    /// Parse raw field text for `key`.
    pub fn parse_value(&self, key: StyleKey, raw: &str) -> PropertyResult<StyleValue> {
        let value = StyleValue::coerce(raw);
        match key {
            StyleKey::FontSize => {
                let size = value.as_number().ok_or_else(|| invalid_number(key, raw))?;
                let (min, max) = self.font_size_range;
                Ok(StyleValue::Number(size.clamp(min, max)))
            }
            StyleKey::Width | StyleKey::Height => {
                value.as_number().ok_or_else(|| invalid_number(key, raw))?;
                Ok(value)
            }
            StyleKey::FontWeight => match value.as_text() {
                Some(weight) if FONT_WEIGHTS.iter().any(|(w, _)| *w == weight) => Ok(value),
                _ => Err(PropertyError::InvalidFontWeight(raw.to_string())),
            },
            StyleKey::Border => Ok(value),
        }
    }

    /// Apply an edit of property `name` to `element`, returning the full
    /// updated style map without touching any store.
    pub fn edited_styles(
        &self,
        element: &CanvasElement,
        name: &str,
        raw: &str,
    ) -> PropertyResult<Styles> {
        let key = StyleKey::from_name(name)
            .filter(|key| element.kind.style_schema().contains(key))
            .ok_or_else(|| PropertyError::UnknownProperty {
                kind: element.kind,
                name: name.to_string(),
            })?;
        let value = self.parse_value(key, raw)?;
        let mut styles = element.styles.clone();
        styles.insert(key, value);
        Ok(styles)
    }

    /// Edit property `name` of the selected element.
    ///
    /// Returns the edited element's ID, or `None` when nothing is selected.
    /// Rejected input leaves the store untouched.
    pub fn apply(&self, store: &mut CanvasStore, name: &str, raw: &str) -> PropertyResult<Option<ElementId>> {
        let Some(element) = store.document().selected_element() else {
            return Ok(None);
        };
        let id = element.id();
        let styles = self.edited_styles(element, name, raw).inspect_err(|e| {
            log::warn!("Rejected property edit on {}: {}", id, e);
        })?;
        store.update_element(id, ElementChanges::styles(styles));
        Ok(Some(id))
    }

    /// Delete the selected element, if any.
    pub fn delete_selected(&self, store: &mut CanvasStore) -> Option<CanvasElement> {
        let id = store.document().selected?;
        store.delete_element(id)
    }
}

fn invalid_number(property: StyleKey, raw: &str) -> PropertyError {
    PropertyError::InvalidNumber { property, value: raw.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_selected(kind: ElementKind) -> (CanvasStore, ElementId) {
        let mut store = CanvasStore::new();
        let id = store.add_element(kind, 0.0, 0.0);
        store.select_element(id);
        (store, id)
    }

    #[test]
    fn test_fields_per_kind() {
        let editor = PropertyEditor::default();
        let keys: Vec<_> = editor.fields(ElementKind::Input).iter().map(|f| f.key).collect();
        assert_eq!(keys, vec![StyleKey::FontSize, StyleKey::FontWeight]);

        let fields = editor.fields(ElementKind::Rectangle);
        let keys: Vec<_> = fields.iter().map(|f| f.key).collect();
        assert_eq!(keys, vec![StyleKey::Width, StyleKey::Height, StyleKey::Border]);
        assert_eq!(fields[2].control, PropertyControl::Text);
    }

    #[test]
    fn test_font_size_field_range() {
        let editor = PropertyEditor::default();
        let field = &editor.fields(ElementKind::Text)[0];
        assert_eq!(field.control, PropertyControl::Number { min: Some(8.0), max: Some(72.0) });
    }

    #[test]
    fn test_apply_font_size() {
        let (mut store, id) = store_with_selected(ElementKind::Text);
        let editor = PropertyEditor::default();

        assert_eq!(editor.apply(&mut store, "fontSize", "24"), Ok(Some(id)));
        let element = store.document().get(id).unwrap();
        assert_eq!(element.style(StyleKey::FontSize), Some(&StyleValue::Number(24.0)));
        assert_eq!(element.style(StyleKey::FontWeight), Some(&StyleValue::from("normal")));
    }

    #[test]
    fn test_font_size_clamped() {
        let editor = PropertyEditor::default();
        assert_eq!(editor.parse_value(StyleKey::FontSize, "4"), Ok(StyleValue::Number(8.0)));
        assert_eq!(editor.parse_value(StyleKey::FontSize, "100"), Ok(StyleValue::Number(72.0)));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let (mut store, id) = store_with_selected(ElementKind::Text);
        let before = store.snapshot();
        let editor = PropertyEditor::default();

        let result = editor.apply(&mut store, "fontSize", "big");
        assert_eq!(
            result,
            Err(PropertyError::InvalidNumber { property: StyleKey::FontSize, value: "big".to_string() })
        );
        assert_eq!(store.snapshot(), before);
        assert!(result.unwrap_err().to_string().contains("not a valid number"));
        assert!(store.document().contains(id));
    }

    #[test]
    fn test_font_weight() {
        let (mut store, id) = store_with_selected(ElementKind::Input);
        let editor = PropertyEditor::default();

        editor.apply(&mut store, "fontWeight", "bold").unwrap();
        let element = store.document().get(id).unwrap();
        assert_eq!(element.style(StyleKey::FontWeight), Some(&StyleValue::from("bold")));

        assert_eq!(
            editor.apply(&mut store, "fontWeight", "heavy"),
            Err(PropertyError::InvalidFontWeight("heavy".to_string()))
        );
        assert_eq!(
            editor.apply(&mut store, "fontWeight", "700"),
            Err(PropertyError::InvalidFontWeight("700".to_string()))
        );
    }

    #[test]
    fn test_rectangle_properties() {
        let (mut store, id) = store_with_selected(ElementKind::Rectangle);
        let editor = PropertyEditor::default();

        editor.apply(&mut store, "width", "240").unwrap();
        editor.apply(&mut store, "border", "2px dashed red").unwrap();

        let element = store.document().get(id).unwrap();
        assert_eq!(element.style(StyleKey::Width), Some(&StyleValue::Number(240.0)));
        assert_eq!(element.style(StyleKey::Height), Some(&StyleValue::Number(100.0)));
        assert_eq!(element.style(StyleKey::Border), Some(&StyleValue::from("2px dashed red")));
        assert!(element.has_valid_styles());
    }

    #[test]
    fn test_unknown_property() {
        let (mut store, _) = store_with_selected(ElementKind::Text);
        let editor = PropertyEditor::default();

        assert!(matches!(
            editor.apply(&mut store, "width", "10"),
            Err(PropertyError::UnknownProperty { kind: ElementKind::Text, .. })
        ));
        assert!(matches!(
            editor.apply(&mut store, "color", "red"),
            Err(PropertyError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn test_nothing_selected() {
        let mut store = CanvasStore::new();
        store.add_element(ElementKind::Text, 0.0, 0.0);
        let editor = PropertyEditor::default();

        assert_eq!(editor.apply(&mut store, "fontSize", "20"), Ok(None));
        assert!(editor.delete_selected(&mut store).is_none());
        assert_eq!(store.document().len(), 1);
    }

    #[test]
    fn test_delete_selected() {
        let (mut store, id) = store_with_selected(ElementKind::Text);
        let editor = PropertyEditor::default();

        let removed = editor.delete_selected(&mut store).unwrap();
        assert_eq!(removed.id(), id);
        assert!(store.document().selected.is_none());
    }
}
