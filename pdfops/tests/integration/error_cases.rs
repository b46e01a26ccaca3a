//! Integration tests for error reporting.

use tempfile::TempDir;

use pdfops::error::PdfOpsError;
use pdfops::io::PdfReader;
use pdfops::pages::resolve_selection;
use pdfops::validation::Validator;

#[tokio::test]
async fn test_missing_input_maps_to_exit_code_2() {
    let err = Validator::new()
        .validate_file(std::path::Path::new("/does/not/exist.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfOpsError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_corrupt_input_maps_to_exit_code_3() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"%PDF-1.5 then garbage with no xref").unwrap();

    let err = PdfReader::new().load(&path).await.unwrap_err();
    assert!(matches!(err, PdfOpsError::FailedToLoadPdf { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_malformed_range_token_is_named_in_message() {
    let err = resolve_selection(Some("1-3,oops"), 10).unwrap_err();
    assert!(matches!(err, PdfOpsError::MalformedPageRange { .. }));
    assert!(format!("{err}").contains("oops"));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_out_of_range_message_names_page_and_bounds() {
    let err = resolve_selection(Some("12"), 10).unwrap_err();
    let message = format!("{err}");
    assert!(message.contains("12"));
    assert!(message.contains("1-10"));
}
