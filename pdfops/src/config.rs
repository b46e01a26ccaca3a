//! Option types shared between the CLI and the library.
//!
//! Each command's tunable behavior is expressed here as a small validated
//! type: enumerated options implement [`FromStr`] so the CLI can parse them
//! directly, and numeric options are range-checked before any document is
//! opened.

use crate::error::{PdfOpsError, Result};
use std::str::FromStr;

/// Table detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStrategy {
    /// Derive the cell grid from ruling lines drawn on the page.
    #[default]
    Lines,
    /// Infer column boundaries from horizontal gaps in the text.
    Text,
}

impl FromStr for TableStrategy {
    type Err = PdfOpsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lines" => Ok(Self::Lines),
            "text" => Ok(Self::Text),
            _ => Err(PdfOpsError::InvalidConfig {
                message: format!("Invalid table strategy: {s}. Must be one of: lines, text"),
            }),
        }
    }
}

/// Which pages a table scan covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageScan {
    /// First page only (the default).
    First,
    /// Every page of the document.
    All,
    /// One specific 1-indexed page.
    Single(u32),
}

impl PageScan {
    /// Combine the `--page N` and `--all-pages` arguments.
    ///
    /// # Errors
    ///
    /// Returns an error when both are given.
    pub fn from_args(page: Option<u32>, all_pages: bool) -> Result<Self> {
        match (page, all_pages) {
            (Some(_), true) => Err(PdfOpsError::invalid_config(
                "Cannot use both --page and --all-pages",
            )),
            (Some(n), false) => Ok(Self::Single(n)),
            (None, true) => Ok(Self::All),
            (None, false) => Ok(Self::First),
        }
    }

    /// The concrete 1-indexed pages this scan covers.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::PageOutOfBounds`] when a specific page lies
    /// outside the document.
    pub fn pages(&self, page_count: u32) -> Result<Vec<u32>> {
        match *self {
            Self::First => Ok(vec![1]),
            Self::All => Ok((1..=page_count).collect()),
            Self::Single(n) => {
                if n < 1 || n > page_count {
                    Err(PdfOpsError::PageOutOfBounds {
                        page: n,
                        total: page_count,
                    })
                } else {
                    Ok(vec![n])
                }
            }
        }
    }
}

/// Text extraction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// Raw text in content-stream order.
    #[default]
    Plain,
    /// Reading order and intra-line spacing reconstructed from glyph
    /// positions.
    Layout,
    /// Rasterize each page and recognize text with the OCR engine.
    Ocr,
}

impl TextMode {
    /// Combine the `--layout` and `--ocr` flags.
    ///
    /// # Errors
    ///
    /// Returns an error when both are given.
    pub fn from_flags(layout: bool, ocr: bool) -> Result<Self> {
        match (layout, ocr) {
            (true, true) => Err(PdfOpsError::invalid_config(
                "Cannot use both --layout and --ocr",
            )),
            (true, false) => Ok(Self::Layout),
            (false, true) => Ok(Self::Ocr),
            (false, false) => Ok(Self::Plain),
        }
    }
}

/// Protect sub-action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectAction {
    /// Add password protection.
    Encrypt,
    /// Remove password protection.
    Decrypt,
}

impl FromStr for ProtectAction {
    type Err = PdfOpsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "encrypt" => Ok(Self::Encrypt),
            "decrypt" => Ok(Self::Decrypt),
            _ => Err(PdfOpsError::InvalidConfig {
                message: format!("Invalid action: {s}. Must be one of: encrypt, decrypt"),
            }),
        }
    }
}

/// Settings for the watermark command.
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    /// Text to composite onto every page.
    pub text: String,
    /// Constant alpha in `[0.0, 1.0]`.
    pub opacity: f64,
    /// Counter-clockwise rotation in degrees.
    pub rotation: f64,
    /// Font size in points.
    pub font_size: f64,
}

impl WatermarkOptions {
    /// Create options with the standard defaults (half opacity, 45 degrees,
    /// 60pt).
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            opacity: 0.5,
            rotation: 45.0,
            font_size: 60.0,
        }
    }

    /// Validate the option values.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty, the opacity is outside
    /// `[0.0, 1.0]`, or the font size is not positive.
    pub fn validate(&self) -> Result<()> {
        if self.text.is_empty() {
            return Err(PdfOpsError::invalid_config("Watermark text cannot be empty"));
        }

        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(PdfOpsError::invalid_config(format!(
                "Opacity must be between 0.0 and 1.0, got {}",
                self.opacity
            )));
        }

        if self.font_size <= 0.0 {
            return Err(PdfOpsError::invalid_config(format!(
                "Font size must be positive, got {}",
                self.font_size
            )));
        }

        Ok(())
    }
}
