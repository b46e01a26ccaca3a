//! Integration tests for password protection.

use std::path::Path;
use tempfile::TempDir;

use pdfops::error::PdfOpsError;
use pdfops::io::write_bytes;
use pdfops::ops::DecryptOutcome;
use pdfops::ops::protect::{decrypt, encrypt};

use crate::common::pdf_bytes;

#[tokio::test]
async fn test_encrypt_decrypt_roundtrip_on_disk() {
    let dir = TempDir::new().unwrap();
    let input = Path::new("fixture.pdf");
    let original = pdf_bytes(2);

    let encrypted = encrypt(input, &original, "s3cret").unwrap();
    let locked_path = dir.path().join("locked.pdf");
    write_bytes(&locked_path, &encrypted).await.unwrap();

    let locked_bytes = std::fs::read(&locked_path).unwrap();
    let (plain, outcome) = decrypt(&locked_path, &locked_bytes, "s3cret").unwrap();

    assert_eq!(outcome, DecryptOutcome::Decrypted);
    assert!(plain.starts_with(b"%PDF"));
}

#[test]
fn test_wrong_password_is_fatal_and_writes_nothing() {
    let input = Path::new("fixture.pdf");
    let encrypted = encrypt(input, &pdf_bytes(1), "right").unwrap();

    let err = decrypt(input, &encrypted, "wrong").unwrap_err();
    assert!(matches!(err, PdfOpsError::IncorrectPassword { .. }));
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn test_decrypting_plain_file_is_a_warning_copy() {
    let input = Path::new("fixture.pdf");
    let original = pdf_bytes(1);

    let (bytes, outcome) = decrypt(input, &original, "anything").unwrap();
    assert_eq!(outcome, DecryptOutcome::NotEncrypted);
    assert_eq!(bytes, original);
}
