//! Password protection.
//!
//! Encryption and decryption delegate to the qpdf library (vendored FFI).
//! Encryption writes an R6 (AES-256) protected copy; decryption rewrites
//! the document with encryption stripped. Decrypting a file that was never
//! encrypted degrades to a plain copy, which the CLI reports as a warning.

use qpdf::{EncryptionParams, EncryptionParamsR6, PrintPermission, QPdf};
use std::path::Path;

use crate::error::{PdfOpsError, Result};

/// What actually happened during a decrypt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptOutcome {
    /// The input was encrypted and has been rewritten without encryption.
    Decrypted,
    /// The input was not encrypted; the output is a plain copy.
    NotEncrypted,
}

/// Encrypt a PDF with the given password.
///
/// The password is used as both user and owner password, and all usage
/// permissions are granted, matching the behavior of a plain
/// password-protect.
///
/// # Errors
///
/// Returns [`PdfOpsError::Qpdf`] if the input cannot be parsed or the
/// encrypted copy cannot be produced.
pub fn encrypt(input: &Path, data: &[u8], password: &str) -> Result<Vec<u8>> {
    let qpdf = QPdf::read_from_memory(data).map_err(|e| map_qpdf_error(input, e))?;

    let params = EncryptionParams::R6(EncryptionParamsR6 {
        user_password: password.to_string(),
        owner_password: password.to_string(),
        allow_accessibility: true,
        allow_extract: true,
        allow_assemble: true,
        allow_annotate_and_form: true,
        allow_form_filling: true,
        allow_modify_other: true,
        allow_print: PrintPermission::Full,
        encrypt_metadata: true,
    });

    let mut writer = qpdf.writer();
    writer.preserve_encryption(false).encryption_params(params);
    writer
        .write_to_memory()
        .map_err(|e| map_qpdf_error(input, e))
}

/// Remove password protection from a PDF.
///
/// Returns the rewritten bytes and whether the input was encrypted at all.
/// For an unencrypted input the original bytes are returned unchanged.
///
/// # Errors
///
/// Returns [`PdfOpsError::IncorrectPassword`] when the password does not
/// open the document and [`PdfOpsError::Qpdf`] for any other failure.
pub fn decrypt(input: &Path, data: &[u8], password: &str) -> Result<(Vec<u8>, DecryptOutcome)> {
    // An unencrypted document opens without a password.
    if QPdf::read_from_memory(data).is_ok() {
        return Ok((data.to_vec(), DecryptOutcome::NotEncrypted));
    }

    let qpdf =
        QPdf::read_from_memory_encrypted(data, password).map_err(|e| map_qpdf_error(input, e))?;

    let mut writer = qpdf.writer();
    writer.preserve_encryption(false);
    let bytes = writer
        .write_to_memory()
        .map_err(|e| map_qpdf_error(input, e))?;

    Ok((bytes, DecryptOutcome::Decrypted))
}

fn map_qpdf_error(input: &Path, e: qpdf::QPdfError) -> PdfOpsError {
    match e.error_code() {
        qpdf::QPdfErrorCode::InvalidPassword => PdfOpsError::IncorrectPassword {
            path: input.to_path_buf(),
        },
        _ => PdfOpsError::Qpdf {
            reason: e.to_string(),
        },
    }
}
