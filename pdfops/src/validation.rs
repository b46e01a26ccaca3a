//! Pre-flight input validation.
//!
//! Commands validate their input before doing any real work so that the
//! user sees a precise diagnostic (missing file, empty file, corrupt
//! structure) instead of a library error from deep inside an operation.

use lopdf::Document;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PdfOpsError, Result};

/// Result of validating a single PDF file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Path to the validated file.
    pub path: PathBuf,

    /// Number of pages in the PDF.
    pub page_count: usize,

    /// PDF version string, e.g. "1.7".
    pub version: String,

    /// Size of the file in bytes.
    pub file_size: u64,
}

/// Validator for PDF input files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Validate a single PDF file.
    ///
    /// Checks existence, that the path is a regular non-empty file, and
    /// that `lopdf` can parse it into a document with at least one page.
    ///
    /// # Errors
    ///
    /// Returns the specific [`PdfOpsError`] for whichever check fails
    /// first.
    pub async fn validate_file(&self, path: &Path) -> Result<ValidationResult> {
        if !path.exists() {
            return Err(PdfOpsError::file_not_found(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(PdfOpsError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| PdfOpsError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            })?;

        if metadata.len() == 0 {
            return Err(PdfOpsError::corrupted_pdf(
                path.to_path_buf(),
                "File is empty",
            ));
        }

        let path_buf = path.to_path_buf();
        let doc = tokio::task::spawn_blocking({
            let path = path_buf.clone();
            move || Document::load(&path)
        })
        .await
        .map_err(|e| PdfOpsError::other(format!("Validation task failed: {e}")))?
        .map_err(|e| PdfOpsError::failed_to_load_pdf(path_buf.clone(), e.to_string()))?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfOpsError::corrupted_pdf(path_buf, "PDF has no pages"));
        }

        Ok(ValidationResult {
            path: path_buf,
            page_count,
            version: doc.version.clone(),
            file_size: metadata.len(),
        })
    }
}
