//! Integration tests for page splitting.

use lopdf::Document;
use tempfile::TempDir;

use pdfops::ops::split_document;
use pdfops::pages::resolve_selection;

use crate::common::document_with_pages;

#[tokio::test]
async fn test_split_default_selects_every_page() {
    let doc = document_with_pages(4);
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("pages");

    let selection = resolve_selection(None, 4).unwrap();
    assert_eq!(selection, vec![1, 2, 3, 4]);

    let outcome = split_document(&doc, &selection, &out, "page_", |_, _| {})
        .await
        .unwrap();

    assert_eq!(outcome.files.len(), 4);
    for page in 1..=4u32 {
        let path = out.join(format!("page_{page}.pdf"));
        assert!(path.exists());
        assert_eq!(Document::load(&path).unwrap().get_pages().len(), 1);
    }
}

#[tokio::test]
async fn test_split_with_range_expression() {
    let doc = document_with_pages(10);
    let dir = TempDir::new().unwrap();

    let selection = resolve_selection(Some("1-3,5,7-9"), 10).unwrap();
    let outcome = split_document(&doc, &selection, dir.path(), "page_", |_, _| {})
        .await
        .unwrap();

    assert_eq!(outcome.files.len(), 7);
    assert!(dir.path().join("page_5.pdf").exists());
    assert!(!dir.path().join("page_4.pdf").exists());
    assert!(!dir.path().join("page_10.pdf").exists());
}

#[tokio::test]
async fn test_split_range_out_of_bounds_creates_nothing() {
    let dir = TempDir::new().unwrap();

    let err = resolve_selection(Some("5"), 3).unwrap_err();
    assert_eq!(err.exit_code(), 1);

    // Nothing was written for the failed resolution.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_split_degenerate_range_produces_no_files() {
    let doc = document_with_pages(5);
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("none");

    let selection = resolve_selection(Some("2-1"), 5).unwrap();
    assert!(selection.is_empty());

    let outcome = split_document(&doc, &selection, &out, "page_", |_, _| {})
        .await
        .unwrap();
    assert!(outcome.files.is_empty());
}

#[tokio::test]
async fn test_split_custom_prefix() {
    let doc = document_with_pages(2);
    let dir = TempDir::new().unwrap();

    split_document(&doc, &[1, 2], dir.path(), "chapter_", |_, _| {})
        .await
        .unwrap();

    assert!(dir.path().join("chapter_1.pdf").exists());
    assert!(dir.path().join("chapter_2.pdf").exists());
}
