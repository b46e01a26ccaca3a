//! PDFium binding shared by the text, table, form, and OCR operations.
//!
//! PDFium is loaded as a dynamic library at runtime. The binding is created
//! per operation rather than cached: the library handle is not thread-safe
//! and each command runs to completion anyway.

use pdfium_render::prelude::*;
use std::path::PathBuf;

use crate::error::{PdfOpsError, Result};

/// Bind to the PDFium dynamic library.
///
/// Searches the executable's directory, then `/opt/pdfium/lib`, then the
/// system library path.
///
/// # Errors
///
/// Returns [`PdfOpsError::Pdfium`] if no PDFium library can be found.
pub fn bind() -> Result<Pdfium> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("./"));

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&exe_dir))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| PdfOpsError::Pdfium {
            reason: format!(
                "Failed to initialize PDFium: {e}. \
                 Install the PDFium dynamic library or place it next to the executable"
            ),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Check whether a PDFium library can be bound in this environment.
pub fn is_available() -> bool {
    bind().is_ok()
}

/// Load a document from bytes, mapping PDFium failures.
///
/// # Errors
///
/// Returns [`PdfOpsError::Pdfium`] for any load failure. A quick header
/// check rejects non-PDF data with a clearer message first.
pub fn load_document<'a>(pdfium: &'a Pdfium, data: &'a [u8]) -> Result<PdfDocument<'a>> {
    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(PdfOpsError::pdfium("Not a valid PDF file"));
    }

    pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(|e| PdfOpsError::Pdfium {
            reason: format!("{e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rejects_non_pdf_data() {
        // Header validation happens before PDFium is consulted, so this
        // holds whether or not the library is installed.
        if let Ok(pdfium) = bind() {
            let err = load_document(&pdfium, b"plain text").unwrap_err();
            assert!(matches!(err, PdfOpsError::Pdfium { .. }));
        }
    }
}
