//! Text extraction.
//!
//! Plain mode takes PDFium's native text stream per page. Layout mode
//! rebuilds reading order from glyph positions: characters are grouped
//! into lines by vertical proximity, lines are emitted top to bottom, and
//! horizontal gaps wider than a typical glyph become spaces.

use pdfium_render::prelude::*;

use crate::config::TextMode;
use crate::error::{PdfOpsError, Result};
use crate::pdfium;

/// Vertical tolerance (points) for grouping characters into one line.
const Y_TOLERANCE: f32 = 5.0;

/// Horizontal gap (points) treated as a word break in layout mode.
const SPACE_THRESHOLD: f32 = 10.0;

/// Text extracted from one page.
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// 1-indexed page number.
    pub number: u32,
    /// Extracted text, possibly empty.
    pub text: String,
}

/// A character with its bounding box in page coordinates (points,
/// bottom-left origin).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CharBox {
    pub ch: char,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Extract text from every page of the document.
///
/// The optional `on_page` callback fires per page for progress reporting.
///
/// # Errors
///
/// Returns [`PdfOpsError::Pdfium`] if the PDFium library is unavailable or
/// the document cannot be read. [`TextMode::Ocr`] is not handled here.
pub fn extract_pages(
    data: &[u8],
    mode: TextMode,
    mut on_page: impl FnMut(u32, u32),
) -> Result<Vec<ExtractedPage>> {
    debug_assert!(mode != TextMode::Ocr, "OCR extraction lives in ops::ocr");

    let engine = pdfium::bind()?;
    let document = pdfium::load_document(&engine, data)?;

    let pages = document.pages();
    let total = pages.len() as u32;
    let mut extracted = Vec::with_capacity(total as usize);

    for index in 0..pages.len() {
        let number = index as u32 + 1;
        let page = pages.get(index).map_err(|e| PdfOpsError::Pdfium {
            reason: format!("Failed to get page {number}: {e}"),
        })?;

        let text = match mode {
            TextMode::Plain => plain_text(&page),
            TextMode::Layout | TextMode::Ocr => assemble_lines(&page_chars(&page)),
        };

        extracted.push(ExtractedPage { number, text });
        on_page(number, total);
    }

    Ok(extracted)
}

/// Join per-page text into the labeled report format.
///
/// Pages with no text are omitted; each remaining block is headed by
/// `--- Page N ---`.
pub fn render_report(pages: &[ExtractedPage]) -> String {
    pages
        .iter()
        .filter(|page| !page.text.trim().is_empty())
        .map(|page| format!("--- Page {} ---\n{}", page.number, page.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn plain_text(page: &PdfPage) -> String {
    match page.text() {
        Ok(text) => text.all(),
        Err(_) => String::new(),
    }
}

/// Collect every character on the page with its bounding box.
pub(crate) fn page_chars(page: &PdfPage) -> Vec<CharBox> {
    let Ok(text) = page.text() else {
        return Vec::new();
    };

    let mut chars = Vec::new();
    for segment in text.segments().iter() {
        let Ok(segment_chars) = segment.chars() else {
            continue;
        };
        for item in segment_chars.iter() {
            if let Some(ch) = item.unicode_char()
                && let Ok(bounds) = item.loose_bounds()
            {
                chars.push(CharBox {
                    ch,
                    left: bounds.left().value,
                    right: bounds.right().value,
                    top: bounds.top().value,
                    bottom: bounds.bottom().value,
                });
            }
        }
    }

    chars
}

/// Rebuild text from positioned characters.
///
/// Characters are sorted top to bottom, grouped into lines by vertical
/// proximity, and each line is emitted left to right with spaces inserted
/// at word-sized gaps.
pub(crate) fn assemble_lines(chars: &[CharBox]) -> String {
    if chars.is_empty() {
        return String::new();
    }

    let mut sorted: Vec<&CharBox> = chars.iter().collect();
    sorted.sort_by(|a, b| {
        b.top
            .partial_cmp(&a.top)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.left.partial_cmp(&b.left).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<Vec<&CharBox>> = Vec::new();
    let mut current: Vec<&CharBox> = Vec::new();
    let mut current_top: Option<f32> = None;

    for item in sorted {
        match current_top {
            Some(top) if (top - item.top).abs() <= Y_TOLERANCE => current.push(item),
            _ => {
                if !current.is_empty() {
                    lines.push(current);
                }
                current = vec![item];
                current_top = Some(item.top);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let mut result = String::new();
    for mut line in lines {
        line.sort_by(|a, b| a.left.partial_cmp(&b.left).unwrap_or(std::cmp::Ordering::Equal));

        let mut prev_right: Option<f32> = None;
        for item in line {
            if let Some(right) = prev_right
                && item.left - right > SPACE_THRESHOLD
                && item.ch != ' '
            {
                result.push(' ');
            }
            result.push(item.ch);
            prev_right = Some(item.right);
        }
        result.push('\n');
    }

    result.trim_end().to_string()
}
