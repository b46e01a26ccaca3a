//! Page splitting.
//!
//! Writes one single-page PDF per selected page, named
//! `{prefix}{pageNumber}.pdf` inside the output directory. Page selection
//! comes from the page-range resolver; the default is every page.

use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};

use crate::error::{PdfOpsError, Result};
use crate::io::{PdfWriter, ensure_dir};

/// Result of a split operation.
#[derive(Debug)]
pub struct SplitOutcome {
    /// Files created, in page order.
    pub files: Vec<PathBuf>,
}

/// Split selected pages into single-page documents on disk.
///
/// `pages` must already be resolved against the document's page count
/// (ascending, in bounds, deduplicated). The output directory is created
/// if missing. The optional `on_file` callback fires after each file is
/// written.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created, a page
/// cannot be extracted, or a file cannot be written.
pub async fn split_document(
    doc: &Document,
    pages: &[u32],
    output_dir: &Path,
    prefix: &str,
    mut on_file: impl FnMut(u32, &Path),
) -> Result<SplitOutcome> {
    ensure_dir(output_dir).await?;

    let writer = PdfWriter::new();
    let mut files = Vec::with_capacity(pages.len());

    for &page_no in pages {
        let single = single_page_document(doc, page_no)?;
        let path = output_dir.join(format!("{prefix}{page_no}.pdf"));

        writer.save(&single, &path).await?;
        on_file(page_no, &path);
        files.push(path);
    }

    Ok(SplitOutcome { files })
}

/// Build a new document containing only the given 1-indexed page.
///
/// The page keeps its object graph (contents, resources, annotations);
/// everything unreachable from it is pruned.
///
/// # Errors
///
/// Returns [`PdfOpsError::PageOutOfBounds`] if the page does not exist and
/// a generic error if the page tree is malformed.
pub fn single_page_document(doc: &Document, page_no: u32) -> Result<Document> {
    let pages = doc.get_pages();
    let total = pages.len() as u32;

    let page_id = *pages.get(&page_no).ok_or(PdfOpsError::PageOutOfBounds {
        page: page_no,
        total,
    })?;

    let mut single = doc.clone();
    retain_page(&mut single, page_id)?;

    single.prune_objects();
    single.renumber_objects();

    Ok(single)
}

/// Rewrite the page tree so it holds exactly one page.
fn retain_page(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let catalog = doc
        .catalog_mut()
        .map_err(|e| PdfOpsError::other(format!("Failed to get catalog: {e}")))?;

    let pages_id = catalog
        .get(b"Pages")
        .and_then(|p| p.as_reference())
        .map_err(|e| PdfOpsError::other(format!("Failed to get pages reference: {e}")))?;

    let pages_obj = doc
        .get_object_mut(pages_id)
        .map_err(|e| PdfOpsError::other(format!("Failed to get pages object: {e}")))?;

    if let Object::Dictionary(dict) = pages_obj {
        dict.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        dict.set("Count", Object::Integer(1));
    } else {
        return Err(PdfOpsError::other("Pages object is not a dictionary"));
    }

    // The kept page may have hung off an intermediate tree node.
    let page_obj = doc
        .get_object_mut(page_id)
        .map_err(|e| PdfOpsError::other(format!("Failed to get page object: {e}")))?;

    if let Object::Dictionary(dict) = page_obj {
        dict.set("Parent", Object::Reference(pages_id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use tempfile::TempDir;

    fn document_with_pages(pages: usize) -> Document {
        let mut doc = Document::with_version("1.5");

        let pages_id = doc.new_object_id();
        let mut kids = Vec::new();
        for _ in 0..pages {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(Object::Reference(page_id));
        }

        doc.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }
            .into(),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc
    }

    #[test]
    fn test_single_page_document() {
        let doc = document_with_pages(4);

        let single = single_page_document(&doc, 3).unwrap();
        assert_eq!(single.get_pages().len(), 1);
    }

    #[test]
    fn test_single_page_document_out_of_bounds() {
        let doc = document_with_pages(2);

        let err = single_page_document(&doc, 9).unwrap_err();
        assert!(matches!(
            err,
            PdfOpsError::PageOutOfBounds { page: 9, total: 2 }
        ));
    }

    #[tokio::test]
    async fn test_split_all_pages() {
        let doc = document_with_pages(4);
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("pages");

        let outcome = split_document(&doc, &[1, 2, 3, 4], &out, "page_", |_, _| {})
            .await
            .unwrap();

        assert_eq!(outcome.files.len(), 4);
        for page in 1..=4u32 {
            let path = out.join(format!("page_{page}.pdf"));
            assert!(path.exists(), "missing {}", path.display());

            let reloaded = Document::load(&path).unwrap();
            assert_eq!(reloaded.get_pages().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_split_selected_pages_with_prefix() {
        let doc = document_with_pages(5);
        let dir = TempDir::new().unwrap();

        let mut reported = Vec::new();
        let outcome = split_document(&doc, &[2, 4], dir.path(), "chapter_", |page, path| {
            reported.push((page, path.to_path_buf()));
        })
        .await
        .unwrap();

        assert_eq!(outcome.files.len(), 2);
        assert!(dir.path().join("chapter_2.pdf").exists());
        assert!(dir.path().join("chapter_4.pdf").exists());
        assert!(!dir.path().join("chapter_1.pdf").exists());
        assert_eq!(reported.len(), 2);
    }

    #[tokio::test]
    async fn test_split_empty_selection_creates_nothing() {
        let doc = document_with_pages(3);
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("none");

        let outcome = split_document(&doc, &[], &out, "page_", |_, _| {})
            .await
            .unwrap();

        assert!(outcome.files.is_empty());
        // Directory is still created.
        assert!(out.is_dir());
    }
}
