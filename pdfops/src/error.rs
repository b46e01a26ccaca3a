//! Error types for pdfops.
//!
//! Every operation in the library reports failures through [`PdfOpsError`].
//! Each variant maps to a fixed process exit code via [`PdfOpsError::exit_code`],
//! so the CLI never has to interpret error contents.
//!
//! # Error Categories
//!
//! - **I/O errors**: file not found, permission denied, write failures
//! - **Document errors**: invalid or corrupted PDF structure
//! - **Argument errors**: bad page ranges, bad opacity, bad field specifications
//! - **Engine errors**: failures inside PDFium, qpdf, or the OCR engine

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pdfops operations.
pub type Result<T> = std::result::Result<T, PdfOpsError>;

/// Main error type for pdfops operations.
#[derive(Debug, Error)]
pub enum PdfOpsError {
    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file exists but cannot be read.
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input path is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Failed to load a PDF document.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", .path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF file is corrupted or structurally invalid.
    #[error("Corrupted or invalid PDF: {}\n  Details: {details}", .path.display())]
    CorruptedPdf {
        /// Path to the corrupted PDF.
        path: PathBuf,
        /// Details about the corruption.
        details: String,
    },

    /// The supplied password does not open the document.
    #[error("Incorrect password for: {}", .path.display())]
    IncorrectPassword {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// A page-range token could not be parsed.
    #[error("Invalid page range token '{token}'. Expected a page number or 'start-end'")]
    MalformedPageRange {
        /// The token that failed to parse.
        token: String,
    },

    /// A single page number falls outside the document.
    #[error("Page {page} out of bounds (1-{total})")]
    PageOutOfBounds {
        /// The offending page number.
        page: u32,
        /// Total pages in the document.
        total: u32,
    },

    /// A `start-end` range falls outside the document.
    #[error("Page range {start}-{end} out of bounds (1-{total})")]
    RangeOutOfBounds {
        /// Range start.
        start: u32,
        /// Range end.
        end: u32,
        /// Total pages in the document.
        total: u32,
    },

    /// A form-field specification is malformed.
    #[error("Invalid field specification '{spec}'. Use: name=value")]
    InvalidFieldSpec {
        /// The specification that failed to parse.
        spec: String,
    },

    /// Form-field data could not be read or decoded.
    #[error("Failed to read field data: {reason}")]
    InvalidFieldData {
        /// Why the data was rejected.
        reason: String,
    },

    /// No input documents could be loaded for a merge.
    #[error("No input files could be loaded")]
    NoInputsLoaded,

    /// Invalid option value or option combination.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong.
        message: String,
    },

    /// Failed to create the output file or directory.
    #[error("Failed to create output: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to the output file.
    #[error("Failed to write to: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failure inside the PDFium text/render layer.
    #[error("PDF processing error: {reason}")]
    Pdfium {
        /// Reason reported by PDFium.
        reason: String,
    },

    /// Failure inside the qpdf encryption layer.
    #[error("Encryption error: {reason}")]
    Qpdf {
        /// Reason reported by qpdf.
        reason: String,
    },

    /// Failure inside the OCR engine.
    #[error("OCR error: {reason}")]
    Ocr {
        /// Reason reported by the OCR engine.
        reason: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfOpsError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for PdfOpsError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PdfOpsError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(path: PathBuf, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            path,
            details: details.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a Pdfium error.
    pub fn pdfium(reason: impl Into<String>) -> Self {
        Self::Pdfium {
            reason: reason.into(),
        }
    }

    /// Create a Qpdf error.
    pub fn qpdf(reason: impl Into<String>) -> Self {
        Self::Qpdf {
            reason: reason.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable during a best-effort merge.
    ///
    /// Recoverable errors cause the offending input to be skipped with a
    /// warning; the merge continues with the remaining inputs.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::FileNotAccessible { .. }
                | Self::NotAFile { .. }
                | Self::FailedToLoadPdf { .. }
                | Self::CorruptedPdf { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::CorruptedPdf { .. } => 3,
            Self::IncorrectPassword { .. } => 4,
            Self::MalformedPageRange { .. } => 1,
            Self::PageOutOfBounds { .. } => 1,
            Self::RangeOutOfBounds { .. } => 1,
            Self::InvalidFieldSpec { .. } => 1,
            Self::InvalidFieldData { .. } => 1,
            Self::NoInputsLoaded => 1,
            Self::InvalidConfig { .. } => 1,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::Pdfium { .. } => 6,
            Self::Qpdf { .. } => 6,
            Self::Ocr { .. } => 6,
            Self::Other { .. } => 1,
        }
    }
}
