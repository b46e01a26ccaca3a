//! OCR text extraction for scanned documents.
//!
//! Each page is rasterized through PDFium and fed to the `ocrs` engine, a
//! pure-Rust OCR stack backed by neural network models executed via
//! `rten`. Model loading is the expensive step; the engine is created once
//! and reused for every page.
//!
//! # Model Setup
//!
//! Two model files are required:
//!
//! - `text-detection.rten` locates text regions in the image
//! - `text-recognition.rten` decodes characters from detected regions
//!
//! They are looked up in `$XDG_CACHE_HOME/ocrs` (typically
//! `~/.cache/ocrs`) unless an explicit directory is given. Running the
//! `ocrs-cli` tool once downloads them to that cache.

use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use pdfium_render::prelude::*;
use rten::Model;
use std::path::{Path, PathBuf};

use crate::error::{PdfOpsError, Result};
use crate::ops::text::ExtractedPage;
use crate::pdfium;

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Rasterization width in pixels for OCR input.
const RENDER_TARGET_WIDTH: i32 = 1200;

/// Where the OCR models are loaded from.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Path to the text-detection model file.
    pub detection_model_path: PathBuf,
    /// Path to the text-recognition model file.
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Point at a directory containing both model files.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Verify that both model files exist.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Ocr`] naming the missing file and how to
    /// obtain it.
    pub fn validate(&self) -> Result<()> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(PdfOpsError::Ocr {
                    reason: format!(
                        "model not found at {}; run `ocrs-cli` once to download models, \
                         or pass --ocr-models",
                        path.display()
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Default model cache directory: `$XDG_CACHE_HOME/ocrs`, falling back to
/// `~/.cache/ocrs`.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// OCR engine wrapper, initialized once per command.
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    /// Load the models named by `config` and initialize the engine.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Ocr`] if a model file is missing or corrupt.
    pub fn new(config: &OcrConfig) -> Result<Self> {
        config.validate()?;

        let detection_model = Model::load_file(&config.detection_model_path).map_err(|e| {
            PdfOpsError::Ocr {
                reason: format!(
                    "failed to load detection model from {}: {e}",
                    config.detection_model_path.display()
                ),
            }
        })?;

        let recognition_model =
            Model::load_file(&config.recognition_model_path).map_err(|e| PdfOpsError::Ocr {
                reason: format!(
                    "failed to load recognition model from {}: {e}",
                    config.recognition_model_path.display()
                ),
            })?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|e| PdfOpsError::Ocr {
            reason: format!("failed to initialize OCR engine: {e}"),
        })?;

        Ok(Self { engine })
    }

    /// Recognize all text in one page image.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Ocr`] if preprocessing or recognition fails.
    pub fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source =
            ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|e| PdfOpsError::Ocr {
                reason: format!("failed to prepare {width}x{height} image: {e}"),
            })?;

        let input = self.engine.prepare_input(source).map_err(|e| PdfOpsError::Ocr {
            reason: format!("OCR preprocessing failed: {e}"),
        })?;

        self.engine.get_text(&input).map_err(|e| PdfOpsError::Ocr {
            reason: format!("OCR text recognition failed: {e}"),
        })
    }
}

/// Rasterize every page and recognize its text.
///
/// The `on_page` callback fires after each page for progress reporting.
///
/// # Errors
///
/// Returns [`PdfOpsError::Ocr`] for engine failures and
/// [`PdfOpsError::Pdfium`] for rasterization failures.
pub fn recognize_pages(
    data: &[u8],
    config: &OcrConfig,
    mut on_page: impl FnMut(u32, u32),
) -> Result<Vec<ExtractedPage>> {
    let ocr = OcrEngine::new(config)?;

    let engine = pdfium::bind()?;
    let document = pdfium::load_document(&engine, data)?;

    let pages = document.pages();
    let total = pages.len() as u32;
    let render_config = PdfRenderConfig::new().set_target_width(RENDER_TARGET_WIDTH);

    let mut extracted = Vec::with_capacity(total as usize);

    for index in 0..pages.len() {
        let number = index as u32 + 1;
        let page = pages.get(index).map_err(|e| PdfOpsError::Pdfium {
            reason: format!("Failed to get page {number}: {e}"),
        })?;

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| PdfOpsError::Pdfium {
                reason: format!("Failed to render page {number}: {e}"),
            })?;

        let text = ocr.recognize(&bitmap.as_image())?;
        extracted.push(ExtractedPage { number, text });
        on_page(number, total);
    }

    Ok(extracted)
}
