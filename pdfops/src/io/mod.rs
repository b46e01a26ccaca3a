//! File I/O for pdfops.
//!
//! Document-level loading and saving go through [`PdfReader`] and
//! [`PdfWriter`] over `lopdf`. Operations that work on raw bytes (the
//! encryption and text layers) use [`read_bytes`] and [`write_bytes`].

pub mod reader;
pub mod writer;

pub use reader::{LoadResult, LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteOptions};

use std::path::{Path, PathBuf};

use crate::error::{PdfOpsError, Result};

/// Read a file into memory, mapping failures to pdfops errors.
///
/// # Errors
///
/// Returns [`PdfOpsError::FileNotFound`] for a missing path and
/// [`PdfOpsError::FileNotAccessible`] for any other read failure.
pub async fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(PdfOpsError::file_not_found(path.to_path_buf()));
    }

    tokio::fs::read(path)
        .await
        .map_err(|e| PdfOpsError::FileNotAccessible {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Write bytes to a file, creating it if necessary.
///
/// # Errors
///
/// Returns [`PdfOpsError::FailedToWrite`] if the write fails.
pub async fn write_bytes(path: &Path, data: &[u8]) -> Result<()> {
    tokio::fs::write(path, data)
        .await
        .map_err(|e| PdfOpsError::FailedToWrite {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Ensure a directory exists, creating it and its parents if necessary.
///
/// # Errors
///
/// Returns [`PdfOpsError::FailedToCreateOutput`] if creation fails.
pub async fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| PdfOpsError::FailedToCreateOutput {
            path: dir.to_path_buf(),
            source: e,
        })?;
    Ok(dir.to_path_buf())
}
