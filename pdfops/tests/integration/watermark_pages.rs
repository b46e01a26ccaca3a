//! Integration tests for watermarking.

use lopdf::Document;
use tempfile::TempDir;

use pdfops::config::WatermarkOptions;
use pdfops::io::{PdfReader, PdfWriter};
use pdfops::ops::apply_watermark;

use crate::common::{document_with_pages, write_pdf};

#[tokio::test]
async fn test_watermarked_output_roundtrips() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "input.pdf", 3);
    let output = dir.path().join("stamped.pdf");

    let loaded = PdfReader::new().load(&input).await.unwrap();
    let mut doc = loaded.document;

    let stamped = apply_watermark(&mut doc, &WatermarkOptions::new("CONFIDENTIAL"), |_, _| {})
        .unwrap();
    assert_eq!(stamped, 3);

    PdfWriter::new().save(&doc, &output).await.unwrap();

    // Page count is unchanged and every page carries the stamp resources.
    let reloaded = Document::load(&output).unwrap();
    assert_eq!(reloaded.get_pages().len(), 3);

    for (_, page_id) in reloaded.get_pages() {
        let page = reloaded.get_dictionary(page_id).unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        assert!(resources.get(b"ExtGState").is_ok());
        assert!(resources.get(b"Font").is_ok());
    }
}

#[test]
fn test_watermark_rejects_out_of_range_opacity() {
    let mut doc = document_with_pages(1);

    let mut options = WatermarkOptions::new("DRAFT");
    options.opacity = 1.5;

    let err = apply_watermark(&mut doc, &options, |_, _| {}).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(format!("{err}").contains("Opacity"));
}

#[test]
fn test_watermark_progress_covers_every_page() {
    let mut doc = document_with_pages(5);

    let mut pages_seen = Vec::new();
    apply_watermark(&mut doc, &WatermarkOptions::new("COPY"), |page, total| {
        pages_seen.push(page);
        assert_eq!(total, 5);
    })
    .unwrap();

    assert_eq!(pages_seen, vec![1, 2, 3, 4, 5]);
}
