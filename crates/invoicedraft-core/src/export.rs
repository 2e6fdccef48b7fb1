//! HTML download artifacts.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name for downloaded invoices.
pub const DOWNLOAD_FILE_NAME: &str = "generated-invoice.html";

/// MIME type of downloaded invoices.
pub const HTML_MIME_TYPE: &str = "text/html";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not determine a download directory")]
    NoDownloadDir,
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// A generated invoice ready to be handed to the user as a file.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlDownload {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

impl HtmlDownload {
    /// Wrap generated HTML under the default file name.
    pub fn new(contents: String) -> Self {
        Self {
            file_name: DOWNLOAD_FILE_NAME.to_string(),
            mime_type: HTML_MIME_TYPE.to_string(),
            contents,
        }
    }

    /// Use a different file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Write the file into `dir`, creating it if needed. Returns the file path.
    pub fn save_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                ExportError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        let path = dir.join(safe_file_name(&self.file_name));
        fs::write(&path, self.contents.as_bytes())
            .map_err(|e| ExportError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        log::info!("Saved {} ({} bytes)", path.display(), self.contents.len());
        Ok(path)
    }

    /// Write the file into the user's download directory.
    pub fn save_to_downloads(&self) -> ExportResult<PathBuf> {
        let dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .ok_or(ExportError::NoDownloadDir)?;
        self.save_to(&dir)
    }
}

/// Keep only the final path component and replace characters unsafe in file names.
fn safe_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        DOWNLOAD_FILE_NAME.to_string()
    } else {
        cleaned
    }
}
