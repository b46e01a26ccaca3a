//! Integration tests for best-effort merging.

use lopdf::Document;
use tempfile::TempDir;

use pdfops::error::PdfOpsError;
use pdfops::io::PdfWriter;
use pdfops::ops::merge_paths;

use crate::common::write_pdf;

#[tokio::test]
async fn test_merge_writes_concatenated_document() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", 2);
    let b = write_pdf(&dir, "b.pdf", 1);
    let out = dir.path().join("merged.pdf");

    let outcome = merge_paths(&[a, b], 2).await.unwrap();
    PdfWriter::new().save(&outcome.document, &out).await.unwrap();

    let merged = Document::load(&out).unwrap();
    assert_eq!(merged.get_pages().len(), 3);
}

#[tokio::test]
async fn test_merge_continues_past_corrupt_input() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", 1);
    let corrupt = dir.path().join("b.pdf");
    std::fs::write(&corrupt, b"garbage, not a pdf").unwrap();
    let c = write_pdf(&dir, "c.pdf", 1);

    let outcome = merge_paths(&[a.clone(), corrupt.clone(), c.clone()], 4)
        .await
        .unwrap();

    // a's and c's pages made it; exactly one warning-worthy skip.
    assert_eq!(outcome.total_pages, 2);
    assert_eq!(outcome.merged, vec![a, c]);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].0, corrupt);
    assert!(outcome.skipped[0].1.is_recoverable());
}

#[tokio::test]
async fn test_merge_of_only_bad_inputs_fails() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.pdf");
    std::fs::write(&bad, b"nope").unwrap();

    let err = merge_paths(&[bad], 1).await.unwrap_err();
    assert!(matches!(err, PdfOpsError::NoInputsLoaded));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_merge_result_survives_reload_and_remerge() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", 1);
    let b = write_pdf(&dir, "b.pdf", 2);
    let first = dir.path().join("first.pdf");

    let outcome = merge_paths(&[a, b], 2).await.unwrap();
    PdfWriter::new()
        .save(&outcome.document, &first)
        .await
        .unwrap();

    // A merged document is a valid input to another merge.
    let c = write_pdf(&dir, "c.pdf", 1);
    let second = merge_paths(&[first, c], 2).await.unwrap();
    assert_eq!(second.total_pages, 4);
}
