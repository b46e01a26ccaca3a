//! PDF loading.
//!
//! Wraps `lopdf` document loading with pdfops error mapping and support for
//! loading a batch of inputs concurrently while preserving argument order.
//!
//! # Examples
//!
//! ```no_run
//! use pdfops::io::PdfReader;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("document.pdf")).await?;
//! println!("{} pages", loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};

use crate::error::{PdfOpsError, Result};

/// A loaded PDF document with basic metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The parsed document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// File size in bytes.
    pub file_size: u64,
}

/// Result of loading a single input.
pub type LoadResult = Result<LoadedPdf>;

/// PDF reader with pdfops error mapping.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// Parsing runs on a blocking thread so the async runtime is not
    /// stalled by large documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, is not a regular file, is
    /// empty, or cannot be parsed as a PDF with at least one page.
    pub async fn load(&self, path: &Path) -> Result<LoadedPdf> {
        if !path.exists() {
            return Err(PdfOpsError::file_not_found(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(PdfOpsError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let file_size = tokio::fs::metadata(path)
            .await
            .map_err(|e| PdfOpsError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            })?
            .len();

        if file_size == 0 {
            return Err(PdfOpsError::corrupted_pdf(
                path.to_path_buf(),
                "File is empty",
            ));
        }

        let path_buf = path.to_path_buf();
        let document = tokio::task::spawn_blocking({
            let path = path_buf.clone();
            move || Document::load(&path)
        })
        .await
        .map_err(|e| PdfOpsError::other(format!("Load task failed: {e}")))?
        .map_err(|e| PdfOpsError::failed_to_load_pdf(path_buf.clone(), e.to_string()))?;

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfOpsError::corrupted_pdf(path_buf, "PDF has no pages"));
        }

        Ok(LoadedPdf {
            document,
            path: path_buf,
            page_count,
            file_size,
        })
    }

    /// Load a batch of inputs concurrently, preserving input order.
    ///
    /// Up to `workers` documents are parsed at a time. The result vector
    /// has one entry per input path, in the same order, so callers can
    /// report per-input failures against the right file.
    pub async fn load_ordered(&self, paths: &[PathBuf], workers: usize) -> Vec<LoadResult> {
        use futures::stream::{self, StreamExt};

        let workers = workers.max(1);

        let tasks = paths.iter().enumerate().map(|(idx, path)| {
            let path = path.clone();
            let reader = self.clone();
            async move { (idx, reader.load(&path).await) }
        });

        let mut indexed: Vec<(usize, LoadResult)> = stream::iter(tasks)
            .buffer_unordered(workers)
            .collect::<Vec<_>>()
            .await;

        indexed.sort_by_key(|(idx, _)| *idx);
        indexed.into_iter().map(|(_, result)| result).collect()
    }
}
