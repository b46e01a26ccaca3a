//! Best-effort PDF concatenation.
//!
//! Inputs are loaded concurrently but appended strictly in argument order.
//! An input that fails to load is skipped and recorded; the merge proceeds
//! with whatever loaded. Only a merge where nothing loads is an error.

use lopdf::{Document, Object, ObjectId};
use std::path::PathBuf;

use crate::error::{PdfOpsError, Result};
use crate::io::{LoadedPdf, PdfReader};

/// Result of a merge operation.
#[derive(Debug)]
pub struct MergeOutcome {
    /// The merged document.
    pub document: Document,

    /// Inputs that made it into the output, in order.
    pub merged: Vec<PathBuf>,

    /// Inputs that failed to load, with the reason each was skipped.
    pub skipped: Vec<(PathBuf, PdfOpsError)>,

    /// Page count of the merged document.
    pub total_pages: usize,
}

/// Merge the given inputs into a single document.
///
/// `workers` bounds how many inputs are parsed concurrently.
///
/// # Errors
///
/// Returns [`PdfOpsError::NoInputsLoaded`] when no input loads, or an
/// error if the page trees cannot be combined. Per-input load failures are
/// not errors; they are reported in [`MergeOutcome::skipped`].
pub async fn merge_paths(inputs: &[PathBuf], workers: usize) -> Result<MergeOutcome> {
    let reader = PdfReader::new();
    let results = reader.load_ordered(inputs, workers).await;

    let mut loaded = Vec::new();
    let mut skipped = Vec::new();

    for (path, result) in inputs.iter().zip(results) {
        match result {
            Ok(pdf) => loaded.push(pdf),
            Err(e) => skipped.push((path.clone(), e)),
        }
    }

    if loaded.is_empty() {
        return Err(PdfOpsError::NoInputsLoaded);
    }

    let document = combine(&loaded)?;
    let total_pages = document.get_pages().len();
    let merged = loaded.into_iter().map(|pdf| pdf.path).collect();

    Ok(MergeOutcome {
        document,
        merged,
        skipped,
        total_pages,
    })
}

/// Expand merge input arguments into concrete paths.
///
/// Arguments containing glob metacharacters are expanded (matches sorted
/// by `glob`'s traversal order); anything else passes through as a literal
/// path, so missing files surface later as per-input load failures. A
/// pattern that matches nothing contributes nothing.
///
/// # Errors
///
/// Returns [`PdfOpsError::InvalidConfig`] for an unparseable pattern.
pub fn expand_inputs(args: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for arg in args {
        if arg.contains(['*', '?', '[']) {
            let matches = glob::glob(arg).map_err(|e| {
                PdfOpsError::invalid_config(format!("Invalid glob pattern '{arg}': {e}"))
            })?;

            for entry in matches {
                match entry {
                    Ok(path) => paths.push(path),
                    Err(e) => {
                        return Err(PdfOpsError::invalid_config(format!(
                            "Failed to expand '{arg}': {e}"
                        )));
                    }
                }
            }
        } else {
            paths.push(PathBuf::from(arg));
        }
    }

    Ok(paths)
}

/// Concatenate loaded documents, first input first.
fn combine(loaded: &[LoadedPdf]) -> Result<Document> {
    let mut merged = loaded[0].document.clone();
    let mut max_id = merged.max_id;

    for pdf in &loaded[1..] {
        let mut doc = pdf.document.clone();

        // Shift object IDs past everything already merged.
        doc.renumber_objects_with(max_id + 1);
        max_id = doc.max_id;

        let doc_pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

        merged.objects.extend(doc.objects);
        append_pages(&mut merged, &doc_pages)?;
    }

    merged.compress();
    merged.renumber_objects();

    Ok(merged)
}

/// Append page references to the merged document's page tree.
fn append_pages(merged: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let catalog = merged
        .catalog_mut()
        .map_err(|e| PdfOpsError::other(format!("Failed to get catalog: {e}")))?;

    let pages_id = catalog
        .get(b"Pages")
        .and_then(|p| p.as_reference())
        .map_err(|e| PdfOpsError::other(format!("Failed to get pages reference: {e}")))?;

    let pages_dict = merged
        .get_object_mut(pages_id)
        .map_err(|e| PdfOpsError::other(format!("Failed to get pages object: {e}")))?;

    let Object::Dictionary(dict) = pages_dict else {
        return Err(PdfOpsError::other("Pages object is not a dictionary"));
    };

    match dict.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => {
            kids.extend(page_ids.iter().map(|&id| Object::Reference(id)));
        }
        _ => return Err(PdfOpsError::other("Pages dictionary missing Kids array")),
    }

    let current = dict.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
    dict.set("Count", Object::Integer(current + page_ids.len() as i64));

    // Reparent the new pages onto this tree node.
    for &page_id in page_ids {
        if let Ok(Object::Dictionary(page)) = merged.get_object_mut(page_id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    Ok(())
}
