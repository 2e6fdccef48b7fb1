//! InvoiceDraft Application
//!
//! Headless shell around the core editor: command line config, template
//! loading and the generate/print/download pipeline.

mod app;

pub use app::{App, AppConfig, AppError, AppResult, Cli, LogPrinter};
