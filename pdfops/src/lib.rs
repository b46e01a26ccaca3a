//! pdfops - Command-line toolkit for PDF manipulation.
//!
//! This library backs the `pdfops` binary with one module per operation:
//!
//! - Watermarking every page with rotated, semi-transparent text
//! - Table extraction to CSV (ruling-line or text-gap detection)
//! - Text extraction (plain, layout-preserving, or OCR)
//! - Form-field listing and filling
//! - Best-effort merging of many documents
//! - Password protection and removal
//! - Splitting into single-page documents by page range
//!
//! # Examples
//!
//! ## Resolving a page range
//!
//! ```
//! use pdfops::pages::PageRange;
//!
//! let range = PageRange::parse("1-3,5,7-9").unwrap();
//! assert_eq!(range.resolve(10).unwrap(), vec![1, 2, 3, 5, 7, 8, 9]);
//! ```
//!
//! ## Splitting a document
//!
//! ```no_run
//! use pdfops::io::PdfReader;
//! use pdfops::ops::split_document;
//! use pdfops::pages::resolve_selection;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loaded = PdfReader::new().load(Path::new("input.pdf")).await?;
//! let pages = resolve_selection(Some("1-3,5"), loaded.page_count as u32)?;
//!
//! split_document(&loaded.document, &pages, Path::new("out/"), "page_", |_, _| {}).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod ops;
pub mod output;
pub mod pages;
pub mod pdfium;
pub mod validation;

// Re-export commonly used types
pub use error::{PdfOpsError, Result};
pub use pages::PageRange;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
