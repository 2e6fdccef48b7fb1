//! Headless application shell: loads a template, runs the output pipeline and
//! writes the generated invoice to disk.

use clap::Parser;
use invoicedraft_core::canvas::{CanvasDocument, ElementChanges};
use invoicedraft_core::config::ConfigError;
use invoicedraft_core::editor::InvoiceEditor;
use invoicedraft_core::element::{ElementId, ElementKind};
use invoicedraft_core::export::ExportError;
use invoicedraft_core::html::GenerateError;
use invoicedraft_core::preview::{MemorySurface, OutputSurface, PrintCapability, PrintError, PrintResult};
use invoicedraft_core::EditorConfig;
use kurbo::Size;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Print(#[from] PrintError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Failed to load template {path}: {message}")]
    Template { path: PathBuf, message: String },
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "invoicedraft")]
#[command(version, about = "Generate a printable HTML invoice from a template", long_about = None)]
pub struct Cli {
    /// Editor settings (JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Saved template to render instead of the built-in sample (JSON)
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Directory for the generated file [default: the download directory]
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub editor: EditorConfig,
    /// Saved template to load instead of the built-in sample.
    pub template: Option<PathBuf>,
    /// Where the generated file goes. `None` means the user's download directory.
    pub output_dir: Option<PathBuf>,
    /// Size of the editing surface (A4 at 96 dpi).
    pub canvas_size: Size,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            template: None,
            output_dir: None,
            canvas_size: Size::new(794.0, 1123.0),
        }
    }
}

impl AppConfig {
    /// Build a config from parsed command line arguments, loading the editor
    /// settings file when one is given.
    pub fn from_cli(cli: Cli) -> AppResult<Self> {
        let editor = match &cli.config {
            Some(path) => EditorConfig::load(path)?,
            None => EditorConfig::default(),
        };
        Ok(Self {
            editor,
            template: cli.template,
            output_dir: cli.out,
            ..Self::default()
        })
    }
}

/// Print capability that writes the surface to the log.
#[derive(Debug, Default)]
pub struct LogPrinter {
    pub pages: usize,
}

impl PrintCapability for LogPrinter {
    fn print(&mut self, surface: &dyn OutputSurface) -> PrintResult<()> {
        self.pages += 1;
        log::info!("Print job '{}' ({} bytes)", surface.title(), surface.content().len());
        log::debug!("{}", surface.content());
        Ok(())
    }
}

/// The application.
pub struct App {
    config: AppConfig,
    editor: InvoiceEditor,
}

impl App {
    /// Create the application with an empty canvas.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let editor = InvoiceEditor::new(config.editor.clone())?;
        Ok(Self { config, editor })
    }

    /// Get the editor session.
    pub fn editor(&self) -> &InvoiceEditor {
        &self.editor
    }

    /// Load the configured template, or the sample invoice when none is set.
    pub fn load_template(&mut self) -> AppResult<()> {
        match self.config.template.clone() {
            Some(path) => {
                let document = read_template(&path)?;
                log::info!("Loaded {} elements from {}", document.len(), path.display());
                self.replay(&document);
            }
            None => self.compose_sample(),
        }
        Ok(())
    }

    /// Recreate every element of `document` on the canvas.
    pub fn replay(&mut self, document: &CanvasDocument) {
        let store = self.editor.store_mut();
        for element in &document.elements {
            let id = store.add_element(element.kind, element.left(), element.top());
            store.update_element(
                id,
                ElementChanges {
                    content: Some(element.content.clone()),
                    styles: Some(element.styles.clone()),
                    ..Default::default()
                },
            );
        }
    }

    fn compose_sample(&mut self) {
        let editor = &mut self.editor;
        let mut place = |kind: ElementKind, left: f64, top: f64, content: &str| -> ElementId {
            let id = editor.store_mut().add_element(kind, left, top);
            if !content.is_empty() {
                editor.edit_content(id, content);
            }
            id
        };
        let title = place(ElementKind::Text, 40.0, 40.0, "Invoice");
        place(ElementKind::Text, 40.0, 100.0, "Invoice number");
        place(ElementKind::Input, 200.0, 100.0, "2026-001");
        place(ElementKind::Text, 40.0, 140.0, "Total");
        place(ElementKind::Input, 200.0, 140.0, "0.00");
        place(ElementKind::Rectangle, 30.0, 90.0, "");

        editor.click_element(title);
        for (name, value) in [("fontSize", "32"), ("fontWeight", "bold")] {
            if let Err(e) = editor.edit_property(name, value) {
                log::warn!("Sample style {} not applied: {}", name, e);
            }
        }
        editor.click_canvas();
    }

    /// Run the output pipeline: generate, preview, print and save the download.
    /// Returns the path of the saved file.
    pub fn run(&mut self) -> AppResult<PathBuf> {
        self.load_template()?;
        let size = self.config.canvas_size;
        self.editor.mount_canvas(size.width, size.height);

        let html = self.editor.generate_html()?;
        log::info!("Generated {} bytes of HTML", html.len());

        if self.editor.generate_preview().is_some() {
            let mut surface = MemorySurface::new("", "InvoiceDraft");
            let mut printer = LogPrinter::default();
            self.editor.print_invoice(&mut surface, &mut printer)?;
        }

        let download = self.editor.download_html()?;
        let path = match &self.config.output_dir {
            Some(dir) => download.save_to(dir)?,
            None => download.save_to_downloads()?,
        };
        Ok(path)
    }
}

fn read_template(path: &Path) -> AppResult<CanvasDocument> {
    let template_error = |message: String| AppError::Template { path: path.to_path_buf(), message };
    let json = fs::read_to_string(path).map_err(|e| template_error(e.to_string()))?;
    CanvasDocument::from_json(&json).map_err(|e| template_error(e.to_string()))
}
