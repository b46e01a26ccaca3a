//! Table extraction.
//!
//! Tables are reconstructed from two inputs: word boxes from the PDFium
//! text layer, and (for the `lines` strategy) ruling lines recovered from
//! the page's content stream.
//!
//! - [`TableStrategy::Lines`]: horizontal and vertical rules form the cell
//!   grid; words are assigned to cells by their center point.
//! - [`TableStrategy::Text`]: rows come from vertical clustering of words,
//!   columns from horizontal gaps that are clear across every row.
//!
//! Rulings are read without applying the current transformation matrix, so
//! grids drawn under a scaled or rotated CTM are not found; the text
//! strategy is the fallback for such documents.

use lopdf::Document;
use lopdf::content::Content;
use std::path::Path;

use crate::config::{PageScan, TableStrategy};
use crate::error::{PdfOpsError, Result};
use crate::ops::text::{CharBox, page_chars};
use crate::pdfium;

/// Horizontal gap (points) separating two words on a line.
const WORD_GAP: f32 = 4.0;

/// Vertical tolerance (points) for grouping words into a row.
const ROW_TOLERANCE: f32 = 5.0;

/// Tolerance (points) for merging near-duplicate rule positions.
const RULE_TOLERANCE: f32 = 2.0;

/// Maximum thickness (points) for a rectangle to count as a drawn rule.
const RULE_THICKNESS: f32 = 2.0;

/// Minimum column gap (points) for the text strategy.
const COLUMN_GAP: f32 = 12.0;

/// One extracted table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Cell matrix, top row first.
    pub rows: Vec<Vec<String>>,
}

/// A word with its bounding box in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WordBox {
    pub text: String,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl WordBox {
    fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

/// A ruling line recovered from the content stream.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Ruling {
    Horizontal { y: f32 },
    Vertical { x: f32 },
}

/// Extract tables from the selected pages, in page order.
///
/// # Errors
///
/// Returns an error if a specific `--page` is out of bounds, the PDFium
/// library is unavailable, or the document cannot be parsed.
pub fn extract_tables(
    data: &[u8],
    scan: PageScan,
    strategy: TableStrategy,
    mut on_page: impl FnMut(u32, u32),
) -> Result<Vec<Table>> {
    let engine = pdfium::bind()?;
    let document = pdfium::load_document(&engine, data)?;
    let pages = document.pages();
    let page_count = pages.len() as u32;

    let selected = scan.pages(page_count)?;

    // Rulings come from the raw object model, not the text layer.
    let raw = match strategy {
        TableStrategy::Lines => Some(Document::load_mem(data)?),
        TableStrategy::Text => None,
    };

    let total = selected.len() as u32;
    let mut tables = Vec::new();

    for (done, &page_no) in selected.iter().enumerate() {
        let page = pages
            .get((page_no - 1) as u16)
            .map_err(|e| PdfOpsError::Pdfium {
                reason: format!("Failed to get page {page_no}: {e}"),
            })?;

        let words = words_from_chars(&page_chars(&page));

        let table = match (&raw, strategy) {
            (Some(doc), TableStrategy::Lines) => {
                let rulings = page_rulings(doc, page_no);
                grid_table(&words, &rulings)
            }
            _ => text_table(&words),
        };

        tables.extend(table);
        on_page(done as u32 + 1, total);
    }

    Ok(tables)
}

/// Write a table as CSV.
///
/// # Errors
///
/// Returns [`PdfOpsError::FailedToWrite`] if the file cannot be written.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| PdfOpsError::FailedToWrite {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;

    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| PdfOpsError::FailedToWrite {
                path: path.to_path_buf(),
                source: std::io::Error::other(e),
            })?;
    }

    writer.flush().map_err(|e| PdfOpsError::FailedToWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Group characters into words: split at whitespace or a wide gap.
pub(crate) fn words_from_chars(chars: &[CharBox]) -> Vec<WordBox> {
    // Reuse the line clustering from the text module by sorting here: top
    // to bottom, then left to right.
    let mut sorted: Vec<&CharBox> = chars.iter().collect();
    sorted.sort_by(|a, b| {
        b.top
            .partial_cmp(&a.top)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.left.partial_cmp(&b.left).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut words = Vec::new();
    let mut current: Option<WordBox> = None;

    for item in sorted {
        let breaks_word = match &current {
            Some(word) => {
                (word.top - item.top).abs() > ROW_TOLERANCE
                    || item.left - word.right > WORD_GAP
                    || item.ch.is_whitespace()
            }
            None => item.ch.is_whitespace(),
        };

        if breaks_word {
            if let Some(word) = current.take() {
                words.push(word);
            }
            if item.ch.is_whitespace() {
                continue;
            }
        }

        match current.as_mut() {
            Some(word) => {
                word.text.push(item.ch);
                word.right = word.right.max(item.right);
                word.top = word.top.max(item.top);
                word.bottom = word.bottom.min(item.bottom);
            }
            None => {
                current = Some(WordBox {
                    text: item.ch.to_string(),
                    left: item.left,
                    right: item.right,
                    top: item.top,
                    bottom: item.bottom,
                });
            }
        }
    }

    if let Some(word) = current {
        words.push(word);
    }

    words
}

/// Recover axis-aligned rulings from a page's content stream.
pub(crate) fn page_rulings(doc: &Document, page_no: u32) -> Vec<Ruling> {
    let Some(&page_id) = doc.get_pages().get(&page_no) else {
        return Vec::new();
    };

    let Ok(content_bytes) = doc.get_page_content(page_id) else {
        return Vec::new();
    };

    let Ok(content) = Content::decode(&content_bytes) else {
        return Vec::new();
    };

    let mut rulings = Vec::new();
    let mut current_point: Option<(f32, f32)> = None;

    for op in &content.operations {
        let floats: Vec<f32> = op
            .operands
            .iter()
            .filter_map(|o| o.as_float().ok())
            .collect();

        match op.operator.as_str() {
            "re" if floats.len() == 4 => {
                let (x, y, w, h) = (floats[0], floats[1], floats[2], floats[3]);
                if h.abs() <= RULE_THICKNESS {
                    rulings.push(Ruling::Horizontal { y: y + h / 2.0 });
                } else if w.abs() <= RULE_THICKNESS {
                    rulings.push(Ruling::Vertical { x: x + w / 2.0 });
                } else {
                    // Cell borders: all four edges of the rectangle.
                    rulings.push(Ruling::Horizontal { y });
                    rulings.push(Ruling::Horizontal { y: y + h });
                    rulings.push(Ruling::Vertical { x });
                    rulings.push(Ruling::Vertical { x: x + w });
                }
            }
            "m" if floats.len() == 2 => {
                current_point = Some((floats[0], floats[1]));
            }
            "l" if floats.len() == 2 => {
                if let Some((x0, y0)) = current_point {
                    let (x1, y1) = (floats[0], floats[1]);
                    if (y1 - y0).abs() <= RULE_TOLERANCE {
                        rulings.push(Ruling::Horizontal { y: (y0 + y1) / 2.0 });
                    } else if (x1 - x0).abs() <= RULE_TOLERANCE {
                        rulings.push(Ruling::Vertical { x: (x0 + x1) / 2.0 });
                    }
                }
                current_point = Some((floats[0], floats[1]));
            }
            _ => {}
        }
    }

    rulings
}

/// Build a table from a ruling grid.
///
/// Requires at least two horizontal and two vertical rules; returns `None`
/// otherwise.
pub(crate) fn grid_table(words: &[WordBox], rulings: &[Ruling]) -> Option<Table> {
    let ys: Vec<f32> = rulings
        .iter()
        .filter_map(|r| match r {
            Ruling::Horizontal { y } => Some(*y),
            _ => None,
        })
        .collect();
    let xs: Vec<f32> = rulings
        .iter()
        .filter_map(|r| match r {
            Ruling::Vertical { x } => Some(*x),
            _ => None,
        })
        .collect();

    let mut row_bounds = cluster_positions(&ys, RULE_TOLERANCE);
    let col_bounds = cluster_positions(&xs, RULE_TOLERANCE);

    if row_bounds.len() < 2 || col_bounds.len() < 2 {
        return None;
    }

    // Rows go top-down; page coordinates go bottom-up.
    row_bounds.reverse();

    let mut rows = Vec::with_capacity(row_bounds.len() - 1);
    for row_pair in row_bounds.windows(2) {
        let (y_top, y_bottom) = (row_pair[0], row_pair[1]);
        let mut cells = Vec::with_capacity(col_bounds.len() - 1);

        for col_pair in col_bounds.windows(2) {
            let (x_left, x_right) = (col_pair[0], col_pair[1]);

            let mut cell_words: Vec<&WordBox> = words
                .iter()
                .filter(|w| {
                    let cx = w.center_x();
                    let cy = w.center_y();
                    cx >= x_left && cx < x_right && cy <= y_top && cy > y_bottom
                })
                .collect();
            cell_words
                .sort_by(|a, b| a.left.partial_cmp(&b.left).unwrap_or(std::cmp::Ordering::Equal));

            cells.push(
                cell_words
                    .iter()
                    .map(|w| w.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }

        rows.push(cells);
    }

    Some(Table { rows })
}

/// Build a table from text alone.
///
/// Words are clustered into rows; column separators are the horizontal
/// gaps left clear by every row. Needs at least two rows and two columns.
pub(crate) fn text_table(words: &[WordBox]) -> Option<Table> {
    if words.is_empty() {
        return None;
    }

    let rows = cluster_rows(words);
    if rows.len() < 2 {
        return None;
    }

    // Merge the x-extents of every word; gaps between merged intervals
    // that exceed COLUMN_GAP are column separators.
    let mut intervals: Vec<(f32, f32)> = words.iter().map(|w| (w.left, w.right)).collect();
    intervals.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut merged: Vec<(f32, f32)> = Vec::new();
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start - last.1 < COLUMN_GAP => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    if merged.len() < 2 {
        return None;
    }

    // Separator positions sit in the middle of each clear gap.
    let separators: Vec<f32> = merged
        .windows(2)
        .map(|pair| (pair[0].1 + pair[1].0) / 2.0)
        .collect();

    let table_rows = rows
        .iter()
        .map(|row_words| {
            let mut cells = vec![Vec::new(); separators.len() + 1];
            for word in row_words {
                let column = separators
                    .iter()
                    .position(|&sep| word.center_x() < sep)
                    .unwrap_or(separators.len());
                cells[column].push(*word);
            }

            cells
                .into_iter()
                .map(|mut cell_words| {
                    cell_words.sort_by(|a, b| {
                        a.left.partial_cmp(&b.left).unwrap_or(std::cmp::Ordering::Equal)
                    });
                    cell_words
                        .iter()
                        .map(|w| w.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect()
        })
        .collect();

    Some(Table { rows: table_rows })
}

/// Cluster words into visual rows, top row first.
fn cluster_rows(words: &[WordBox]) -> Vec<Vec<&WordBox>> {
    let mut sorted: Vec<&WordBox> = words.iter().collect();
    sorted.sort_by(|a, b| {
        b.top
            .partial_cmp(&a.top)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut rows: Vec<Vec<&WordBox>> = Vec::new();
    let mut current: Vec<&WordBox> = Vec::new();
    let mut current_top: Option<f32> = None;

    for word in sorted {
        match current_top {
            Some(top) if (top - word.top).abs() <= ROW_TOLERANCE => current.push(word),
            _ => {
                if !current.is_empty() {
                    rows.push(current);
                }
                current = vec![word];
                current_top = Some(word.top);
            }
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }

    rows
}

/// Sort and merge positions closer together than `tolerance`.
pub(crate) fn cluster_positions(positions: &[f32], tolerance: f32) -> Vec<f32> {
    if positions.is_empty() {
        return Vec::new();
    }

    let mut sorted = positions.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut clusters = Vec::new();
    let mut group = vec![sorted[0]];

    for &value in &sorted[1..] {
        if value - group.last().copied().unwrap_or(value) <= tolerance {
            group.push(value);
        } else {
            clusters.push(group.iter().sum::<f32>() / group.len() as f32);
            group = vec![value];
        }
    }
    clusters.push(group.iter().sum::<f32>() / group.len() as f32);

    clusters
}
