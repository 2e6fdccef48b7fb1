//! Print preview and printing.
//!
//! Form inputs do not print their values reliably, so the preview replaces
//! every `input` with a `p` carrying the value as literal text and the same
//! inline style. Printing temporarily swaps the whole output surface for the
//! preview; [`SurfaceGuard`] puts the previous content and title back when it
//! goes out of scope, whatever the print capability did.

use crate::markup::{Element, Node};
use std::ops::{Deref, DerefMut};
use thiserror::Error;

/// Title shown on the output surface while printing.
pub const PRINT_TITLE: &str = "Invoice";

/// ID of the block wrapping the printed preview.
pub const PRINT_AREA_ID: &str = "printArea";

/// Print errors.
#[derive(Debug, Error, PartialEq)]
pub enum PrintError {
    #[error("No preview has been generated")]
    NothingToPrint,
    #[error("Platform print failed: {0}")]
    Platform(String),
}

/// Result type for print operations.
pub type PrintResult<T> = Result<T, PrintError>;

/// Replace every input element in `root` with a static text paragraph.
pub fn flatten_inputs(root: &Element) -> Element {
    if root.name == "input" {
        return flatten_input(root);
    }
    Element {
        name: root.name.clone(),
        attrs: root.attrs.clone(),
        children: root
            .children
            .iter()
            .map(|child| match child {
                Node::Element(el) => Node::Element(flatten_inputs(el)),
                Node::Text(text) => Node::Text(text.clone()),
            })
            .collect(),
    }
}

fn flatten_input(input: &Element) -> Element {
    let mut p = Element::new("p");
    if let Some(style) = input.attr("style") {
        p = p.with_attr("style", style);
    }
    p.with_text(input.attr("value").unwrap_or_default())
}

/// The platform's whole-page output area.
pub trait OutputSurface {
    /// Current markup of the surface.
    fn content(&self) -> String;

    /// Replace the surface markup.
    fn set_content(&mut self, html: String);

    /// Current title.
    fn title(&self) -> String;

    /// Replace the title.
    fn set_title(&mut self, title: String);
}

/// The platform print dialog.
pub trait PrintCapability {
    /// Print whatever the surface currently shows.
    fn print(&mut self, surface: &dyn OutputSurface) -> PrintResult<()>;
}

/// In-memory output surface for tests and headless use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySurface {
    pub content: String,
    pub title: String,
}

impl MemorySurface {
    /// Create a surface with initial content and title.
    pub fn new(content: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            title: title.into(),
        }
    }
}

impl OutputSurface for MemorySurface {
    fn content(&self) -> String {
        self.content.clone()
    }

    fn set_content(&mut self, html: String) {
        self.content = html;
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: String) {
        self.title = title;
    }
}

/// Scoped replacement of an output surface.
///
/// Saves the surface's content and title on creation and restores both on drop.
pub struct SurfaceGuard<'a, S: OutputSurface + ?Sized> {
    surface: &'a mut S,
    saved_content: Option<String>,
    saved_title: Option<String>,
}

impl<'a, S: OutputSurface + ?Sized> SurfaceGuard<'a, S> {
    /// Swap in `content` and `title` until the guard is dropped.
    pub fn replace(surface: &'a mut S, content: String, title: String) -> Self {
        let saved_content = surface.content();
        let saved_title = surface.title();
        surface.set_content(content);
        surface.set_title(title);
        Self {
            surface,
            saved_content: Some(saved_content),
            saved_title: Some(saved_title),
        }
    }
}

impl<S: OutputSurface + ?Sized> Deref for SurfaceGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: OutputSurface + ?Sized> DerefMut for SurfaceGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: OutputSurface + ?Sized> Drop for SurfaceGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(content) = self.saved_content.take() {
            self.surface.set_content(content);
        }
        if let Some(title) = self.saved_title.take() {
            self.surface.set_title(title);
        }
    }
}

/// Markup put on the surface while printing.
pub fn print_area(preview: &Element) -> Element {
    Element::new("div").with_attr("id", PRINT_AREA_ID).with_child(preview.clone())
}

/// Show `preview` on `surface` under `title`, run the print capability and
/// restore the surface afterwards.
pub fn print_preview<S, P>(preview: &Element, title: &str, surface: &mut S, printer: &mut P) -> PrintResult<()>
where
    S: OutputSurface,
    P: PrintCapability + ?Sized,
{
    let guard = SurfaceGuard::replace(surface, print_area(preview).to_html(), title.to_string());
    log::info!("Printing invoice preview");
    printer.print(&*guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records what the surface showed on each print call.
    #[derive(Default)]
    struct RecordingPrinter {
        printed: Vec<(String, String)>,
        fail: bool,
    }

    impl PrintCapability for RecordingPrinter {
        fn print(&mut self, surface: &dyn OutputSurface) -> PrintResult<()> {
            self.printed.push((surface.title(), surface.content()));
            if self.fail {
                return Err(PrintError::Platform("dialog closed".to_string()));
            }
            Ok(())
        }
    }

    /// Never shows the dialog.
    struct IdlePrinter;

    impl PrintCapability for IdlePrinter {
        fn print(&mut self, _surface: &dyn OutputSurface) -> PrintResult<()> {
            Ok(())
        }
    }

    fn generated_with_input(value: &str) -> Element {
        Element::new("div")
            .with_attr("style", "position: relative;")
            .with_child(Element::new("div").with_attr("style", "top:0px").with_text("Total"))
            .with_child(
                Element::new("input")
                    .with_attr("type", "text")
                    .with_attr("value", value)
                    .with_attr("style", "position:absolute; left:20px; top:50px; font-size:16px;font-weight:normal"),
            )
    }

    #[test]
    fn test_flatten_replaces_inputs() {
        let generated = generated_with_input("42");
        let preview = flatten_inputs(&generated);

        assert_eq!(preview.count_elements("input"), 0);
        assert_eq!(preview.count_elements("p"), 1);
        let p = preview.children[1].as_element().unwrap();
        assert_eq!(p.name, "p");
        assert_eq!(p.text_content(), "42");
        assert_eq!(
            p.attr("style"),
            Some("position:absolute; left:20px; top:50px; font-size:16px;font-weight:normal")
        );
    }

    #[test]
    fn test_flatten_leaves_source_untouched() {
        let generated = generated_with_input("42");
        let before = generated.clone();
        let _ = flatten_inputs(&generated);
        assert_eq!(generated, before);
    }

    #[test]
    fn test_flatten_empty_value() {
        let input = Element::new("input").with_attr("type", "text");
        let p = flatten_inputs(&input);
        assert_eq!(p.to_html(), "<p></p>");
    }

    #[test]
    fn test_flatten_nested() {
        let root = Element::new("div").with_child(Element::new("div").with_child(
            Element::new("input").with_attr("value", "a"),
        ));
        let flat = flatten_inputs(&root);
        assert_eq!(flat.count_elements("input"), 0);
        assert_eq!(flat.text_content(), "a");
    }

    #[test]
    fn test_print_restores_surface() {
        let preview = flatten_inputs(&generated_with_input("42"));
        let mut surface = MemorySurface::new("<main>editor</main>", "Template editor");
        let mut printer = RecordingPrinter::default();

        print_preview(&preview, PRINT_TITLE, &mut surface, &mut printer).unwrap();

        assert_eq!(surface, MemorySurface::new("<main>editor</main>", "Template editor"));
        assert_eq!(printer.printed.len(), 1);
        let (title, content) = &printer.printed[0];
        assert_eq!(title, "Invoice");
        assert!(content.starts_with("<div id=\"printArea\">\n<div"));
        assert!(content.contains("<p style=\"position:absolute; left:20px; top:50px; font-size:16px;font-weight:normal\">42</p>"));
    }

    #[test]
    fn test_print_restores_after_failure() {
        let preview = flatten_inputs(&generated_with_input("1"));
        let mut surface = MemorySurface::new("body", "Editor");
        let mut printer = RecordingPrinter { fail: true, ..Default::default() };

        let result = print_preview(&preview, PRINT_TITLE, &mut surface, &mut printer);
        assert_eq!(result, Err(PrintError::Platform("dialog closed".to_string())));
        assert_eq!(surface, MemorySurface::new("body", "Editor"));
    }

    #[test]
    fn test_print_zero_and_repeated_calls() {
        let preview = flatten_inputs(&generated_with_input("7"));
        let mut surface = MemorySurface::new("body", "Editor");

        print_preview(&preview, PRINT_TITLE, &mut surface, &mut IdlePrinter).unwrap();
        assert_eq!(surface, MemorySurface::new("body", "Editor"));

        let mut printer = RecordingPrinter::default();
        for _ in 0..3 {
            print_preview(&preview, PRINT_TITLE, &mut surface, &mut printer).unwrap();
            assert_eq!(surface, MemorySurface::new("body", "Editor"));
        }
        assert_eq!(printer.printed.len(), 3);
        assert!(printer.printed.iter().all(|(title, _)| title == "Invoice"));
    }

    #[test]
    fn test_guard_restores_on_drop() {
        let mut surface = MemorySurface::new("before", "Old");
        {
            let mut guard = SurfaceGuard::replace(&mut surface, "during".to_string(), "New".to_string());
            assert_eq!(guard.content(), "during");
            guard.set_content("changed by printer".to_string());
        }
        assert_eq!(surface, MemorySurface::new("before", "Old"));
    }
}
