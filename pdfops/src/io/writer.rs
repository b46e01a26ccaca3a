//! PDF saving.
//!
//! Writes go to a temporary file first and are renamed into place, so a
//! failed save never leaves a truncated output behind. Compression and
//! object renumbering run on a blocking thread.

use lopdf::Document;
use std::io::Write;
use std::path::Path;
use tokio::task;

use crate::error::{PdfOpsError, Result};

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Write to a temp file, then rename into place.
    pub atomic: bool,

    /// Compress streams before writing.
    pub compress: bool,

    /// Renumber objects for a compact cross-reference table.
    pub renumber: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            renumber: true,
        }
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a writer with default options.
    pub fn new() -> Self {
        Self {
            options: WriteOptions::default(),
        }
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer that leaves streams uncompressed.
    pub fn without_compression() -> Self {
        Self {
            options: WriteOptions {
                compress: false,
                ..Default::default()
            },
        }
    }

    /// Save a document to a file.
    ///
    /// The document is cloned into a blocking task; the caller keeps
    /// ownership of the original.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::FailedToCreateOutput`] if the file cannot be
    /// created and [`PdfOpsError::FailedToWrite`] if writing or the final
    /// rename fails.
    pub async fn save(&self, doc: &Document, path: &Path) -> Result<u64> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();
        let mut doc = doc.clone();

        task::spawn_blocking(move || {
            if options.compress {
                doc.compress();
            }

            if options.renumber {
                doc.renumber_objects();
            }

            let write_path = if options.atomic {
                path_buf.with_extension("pdf.tmp")
            } else {
                path_buf.clone()
            };

            let file = std::fs::File::create(&write_path).map_err(|e| {
                PdfOpsError::FailedToCreateOutput {
                    path: write_path.clone(),
                    source: e,
                }
            })?;

            let mut writer = std::io::BufWriter::new(file);
            doc.save_to(&mut writer)
                .map_err(|e| PdfOpsError::FailedToWrite {
                    path: write_path.clone(),
                    source: std::io::Error::other(e),
                })?;
            writer.flush().map_err(|e| PdfOpsError::FailedToWrite {
                path: write_path.clone(),
                source: e,
            })?;

            if options.atomic {
                std::fs::rename(&write_path, &path_buf).map_err(|e| {
                    PdfOpsError::FailedToWrite {
                        path: path_buf.clone(),
                        source: e,
                    }
                })?;
            }

            let file_size = std::fs::metadata(&path_buf).map(|m| m.len()).unwrap_or(0);
            Ok::<_, PdfOpsError>(file_size)
        })
        .await
        .map_err(|e| PdfOpsError::other(format!("Write task failed: {e}")))?
    }
}
