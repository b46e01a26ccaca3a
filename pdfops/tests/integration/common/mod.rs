//! Shared fixtures for integration tests.
//!
//! Tests build their own input documents with `lopdf` instead of shipping
//! binary fixtures, so every page count and content variation stays
//! readable at the call site.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::PathBuf;
use tempfile::TempDir;

/// Build a document with the given number of pages.
///
/// Each page carries a small content stream so splitting and watermarking
/// exercise the Contents-handling paths.
pub fn document_with_pages(pages: usize) -> Document {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();

    for index in 0..pages {
        let content = Content {
            operations: vec![
                Operation::new("m", vec![10.into(), 10.into()]),
                Operation::new("l", vec![(100 + index as i64).into(), 10.into()]),
                Operation::new("S", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => Object::Reference(content_id),
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

/// Write a fixture document into `dir` and return its path.
pub fn write_pdf(dir: &TempDir, name: &str, pages: usize) -> PathBuf {
    let path = dir.path().join(name);
    document_with_pages(pages).save(&path).unwrap();
    path
}

/// Serialize a fixture document to bytes.
pub fn pdf_bytes(pages: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    document_with_pages(pages).save_to(&mut bytes).unwrap();
    bytes
}
