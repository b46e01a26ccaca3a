//! Interactive form fields.
//!
//! Listing walks every page's annotations and reports text fields with
//! their current values. Filling sets named text-field values on the first
//! page only, matching the original tooling; names that match nothing
//! produce warnings, not errors.

use pdfium_render::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{PdfOpsError, Result};
use crate::pdfium;

/// A text form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Fully qualified field name.
    pub name: String,
    /// Current value, if any.
    pub value: Option<String>,
}

/// Result of a fill operation.
#[derive(Debug, Default)]
pub struct FillOutcome {
    /// Names of fields that were set.
    pub filled: Vec<String>,
    /// Requested names that matched no text field on the first page.
    pub unknown: Vec<String>,
}

/// List every text field in the document.
///
/// # Errors
///
/// Returns [`PdfOpsError::Pdfium`] if the library is unavailable or the
/// document cannot be read.
pub fn list_fields(data: &[u8]) -> Result<Vec<FormField>> {
    let engine = pdfium::bind()?;
    let document = pdfium::load_document(&engine, data)?;

    let mut fields = Vec::new();
    let pages = document.pages();

    for index in 0..pages.len() {
        let page = pages.get(index).map_err(|e| PdfOpsError::Pdfium {
            reason: format!("Failed to get page {}: {e}", index + 1),
        })?;

        for annotation in page.annotations().iter() {
            if let Some(field) = annotation.as_form_field()
                && let Some(text_field) = field.as_text_field()
                && let Some(name) = field.name()
            {
                fields.push(FormField {
                    name,
                    value: text_field.value().filter(|v| !v.is_empty()),
                });
            }
        }
    }

    Ok(fields)
}

/// Set text-field values on the first page.
///
/// Returns the rewritten document bytes and a record of what was filled
/// and which names went unmatched.
///
/// # Errors
///
/// Returns [`PdfOpsError::Pdfium`] if the library is unavailable, the
/// document cannot be read, or the modified document cannot be saved.
pub fn fill_fields(
    data: &[u8],
    values: &BTreeMap<String, String>,
) -> Result<(Vec<u8>, FillOutcome)> {
    let engine = pdfium::bind()?;
    let document = pdfium::load_document(&engine, data)?;

    let mut outcome = FillOutcome::default();
    let mut remaining: BTreeMap<&str, &str> = values
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let pages = document.pages();
    if pages.len() > 0 {
        let page = pages.get(0).map_err(|e| PdfOpsError::Pdfium {
            reason: format!("Failed to get page 1: {e}"),
        })?;

        for mut annotation in page.annotations().iter() {
            if remaining.is_empty() {
                break;
            }

            if let Some(field) = annotation.as_form_field_mut() {
                let Some(name) = field.name() else {
                    continue;
                };

                if let Some(value) = remaining.get(name.as_str()).copied()
                    && let Some(text_field) = field.as_text_field_mut()
                {
                    text_field
                        .set_value(value)
                        .map_err(|e| PdfOpsError::Pdfium {
                            reason: format!("Failed to set field '{name}': {e}"),
                        })?;

                    remaining.remove(name.as_str());
                    outcome.filled.push(name);
                }
            }
        }
    }

    outcome.unknown = remaining.keys().map(|k| k.to_string()).collect();

    let bytes = document.save_to_bytes().map_err(|e| PdfOpsError::Pdfium {
        reason: format!("Failed to save modified PDF: {e}"),
    })?;

    Ok((bytes, outcome))
}

/// Parse one `name=value` field argument.
///
/// The value may itself contain `=`; only the first one splits.
///
/// # Errors
///
/// Returns [`PdfOpsError::InvalidFieldSpec`] when no `=` is present or the
/// name is empty.
pub fn parse_field_arg(spec: &str) -> Result<(String, String)> {
    match spec.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(PdfOpsError::InvalidFieldSpec {
            spec: spec.to_string(),
        }),
    }
}

/// Assemble field data from a JSON mapping file or repeated `name=value`
/// arguments.
///
/// # Errors
///
/// Returns an error when neither source is given, the JSON file cannot be
/// read or is not a string-to-string object, or a field argument is
/// malformed.
pub async fn load_field_data(
    json: Option<&Path>,
    field_args: &[String],
) -> Result<BTreeMap<String, String>> {
    if let Some(path) = json {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PdfOpsError::InvalidFieldData {
                reason: format!("{}: {e}", path.display()),
            })?;

        return serde_json::from_str(&raw).map_err(|e| PdfOpsError::InvalidFieldData {
            reason: format!("{}: {e}", path.display()),
        });
    }

    if field_args.is_empty() {
        return Err(PdfOpsError::InvalidFieldData {
            reason: "provide field data via --json or --field".to_string(),
        });
    }

    let mut values = BTreeMap::new();
    for spec in field_args {
        let (name, value) = parse_field_arg(spec)?;
        values.insert(name, value);
    }

    Ok(values)
}
