//! Watermark compositing.
//!
//! Stamps a text watermark onto every page by appending a content stream
//! that draws the text centered on the page, rotated, through an
//! `ExtGState` carrying the requested constant alpha. Existing page content
//! is untouched; the stamp is drawn on top of it.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::config::WatermarkOptions;
use crate::error::{PdfOpsError, Result};

/// Resource names registered on each stamped page.
const FONT_RESOURCE: &str = "WmF0";
const GSTATE_RESOURCE: &str = "WmGS";

/// US Letter, used when no MediaBox can be found.
const DEFAULT_PAGE_SIZE: (f32, f32, f32, f32) = (0.0, 0.0, 612.0, 792.0);

/// Helvetica's average glyph width relative to the font size, used to
/// center the text without font metrics.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Stamp the watermark onto every page of the document.
///
/// Returns the number of pages stamped. The optional `on_page` callback
/// fires after each page, for progress reporting.
///
/// # Errors
///
/// Returns an error if the options fail validation or if a page's
/// dictionary cannot be updated.
pub fn apply_watermark(
    doc: &mut Document,
    options: &WatermarkOptions,
    mut on_page: impl FnMut(u32, usize),
) -> Result<usize> {
    options.validate()?;

    let pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();
    let total = pages.len();

    // The font and graphics state are shared by every page.
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let gstate_id = doc.add_object(dictionary! {
        "Type" => "ExtGState",
        "ca" => options.opacity as f32,
        "CA" => options.opacity as f32,
    });

    for (page_no, page_id) in pages {
        stamp_page(doc, page_id, options, font_id, gstate_id)?;
        on_page(page_no, total);
    }

    Ok(total)
}

fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    options: &WatermarkOptions,
    font_id: ObjectId,
    gstate_id: ObjectId,
) -> Result<()> {
    let (x0, y0, x1, y1) = media_box(doc, page_id);
    let center_x = x0 + (x1 - x0) / 2.0;
    let center_y = y0 + (y1 - y0) / 2.0;

    let resources = stamped_resources(doc, page_id, font_id, gstate_id)?;
    let stream_id = doc.add_object(stamp_stream(options, center_x, center_y)?);

    let page = doc
        .get_object_mut(page_id)
        .ok()
        .and_then(|obj| obj.as_dict_mut().ok())
        .ok_or_else(|| PdfOpsError::other("Page object is not a dictionary"))?;

    page.set("Resources", Object::Dictionary(resources));

    let contents = match page.get(b"Contents") {
        Ok(Object::Reference(existing)) => Object::Array(vec![
            Object::Reference(*existing),
            Object::Reference(stream_id),
        ]),
        Ok(Object::Array(existing)) => {
            let mut kids = existing.clone();
            kids.push(Object::Reference(stream_id));
            Object::Array(kids)
        }
        _ => Object::Reference(stream_id),
    };
    page.set("Contents", contents);

    Ok(())
}

/// Build the watermark content stream for one page.
fn stamp_stream(options: &WatermarkOptions, center_x: f32, center_y: f32) -> Result<Stream> {
    let angle = (options.rotation as f32).to_radians();
    let (sin, cos) = angle.sin_cos();
    let font_size = options.font_size as f32;

    // Approximate centering along the rotated baseline.
    let half_width = AVG_GLYPH_WIDTH * font_size * options.text.chars().count() as f32 / 2.0;

    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new("gs", vec![GSTATE_RESOURCE.into()]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![FONT_RESOURCE.into(), font_size.into()]),
        Operation::new("g", vec![0.5f32.into()]),
        Operation::new(
            "Tm",
            vec![
                cos.into(),
                sin.into(),
                (-sin).into(),
                cos.into(),
                center_x.into(),
                center_y.into(),
            ],
        ),
        Operation::new("Td", vec![(-half_width).into(), 0.0f32.into()]),
        Operation::new("Tj", vec![Object::string_literal(options.text.as_str())]),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
    ];

    let content = Content { operations };
    let bytes = content
        .encode()
        .map_err(|e| PdfOpsError::other(format!("Failed to encode watermark stream: {e}")))?;

    Ok(Stream::new(dictionary! {}, bytes))
}

/// The page's resources with the watermark font and graphics state added.
///
/// Inherited or indirectly referenced resource dictionaries are flattened
/// into a page-local copy so the stamp cannot disturb sibling pages.
fn stamped_resources(
    doc: &Document,
    page_id: ObjectId,
    font_id: ObjectId,
    gstate_id: ObjectId,
) -> Result<Dictionary> {
    let mut resources = resolved_entry(doc, page_id, b"Resources").unwrap_or_else(Dictionary::new);

    let mut fonts = subdictionary(doc, &resources, b"Font");
    fonts.set(FONT_RESOURCE, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let mut gstates = subdictionary(doc, &resources, b"ExtGState");
    gstates.set(GSTATE_RESOURCE, Object::Reference(gstate_id));
    resources.set("ExtGState", Object::Dictionary(gstates));

    Ok(resources)
}

/// Resolve a subdictionary entry, following one level of indirection.
fn subdictionary(doc: &Document, dict: &Dictionary, key: &[u8]) -> Dictionary {
    match dict.get(key) {
        Ok(Object::Dictionary(d)) => d.clone(),
        Ok(Object::Reference(id)) => doc
            .get_dictionary(*id)
            .cloned()
            .unwrap_or_else(|_| Dictionary::new()),
        _ => Dictionary::new(),
    }
}

/// Look up a dictionary-valued entry on the page, walking up the page tree
/// for inherited values.
fn resolved_entry(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Dictionary> {
    let mut node_id = page_id;

    for _ in 0..16 {
        let node = doc.get_dictionary(node_id).ok()?;

        match node.get(key) {
            Ok(Object::Dictionary(d)) => return Some(d.clone()),
            Ok(Object::Reference(id)) => return doc.get_dictionary(*id).cloned().ok(),
            _ => {}
        }

        match node.get(b"Parent") {
            Ok(Object::Reference(parent)) => node_id = *parent,
            _ => return None,
        }
    }

    None
}

/// The page's effective MediaBox, walking up the page tree for inherited
/// values and defaulting to US Letter.
fn media_box(doc: &Document, page_id: ObjectId) -> (f32, f32, f32, f32) {
    let mut node_id = page_id;

    for _ in 0..16 {
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };

        if let Ok(obj) = node.get(b"MediaBox") {
            let rect = match obj {
                Object::Array(values) => Some(values.clone()),
                Object::Reference(id) => doc
                    .get_object(*id)
                    .ok()
                    .and_then(|o| o.as_array().ok())
                    .cloned(),
                _ => None,
            };

            if let Some(values) = rect
                && values.len() == 4
            {
                let coords: Vec<f32> = values.iter().filter_map(|v| v.as_float().ok()).collect();
                if coords.len() == 4 {
                    return (coords[0], coords[1], coords[2], coords[3]);
                }
            }
        }

        match node.get(b"Parent") {
            Ok(Object::Reference(parent)) => node_id = *parent,
            _ => break,
        }
    }

    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document_with_pages(pages: usize) -> Document {
        let mut doc = Document::with_version("1.5");

        let pages_id = doc.new_object_id();
        let mut kids = Vec::new();
        for _ in 0..pages {
            let content = Content {
                operations: vec![Operation::new("re", vec![
                    10.into(),
                    10.into(),
                    100.into(),
                    100.into(),
                ])],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

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

    #[test]
    fn test_apply_watermark_stamps_every_page() {
        let mut doc = document_with_pages(3);
        let options = WatermarkOptions::new("CONFIDENTIAL");

        let mut seen = Vec::new();
        let stamped = apply_watermark(&mut doc, &options, |page, total| {
            seen.push((page, total));
        })
        .unwrap();

        assert_eq!(stamped, 3);
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_watermark_registers_resources() {
        let mut doc = document_with_pages(2);
        let options = WatermarkOptions::new("DRAFT");

        apply_watermark(&mut doc, &options, |_, _| {}).unwrap();

        for (_, page_id) in doc.get_pages() {
            let page = doc.get_dictionary(page_id).unwrap();
            let resources = page.get(b"Resources").unwrap().as_dict().unwrap();

            let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
            assert!(fonts.get(FONT_RESOURCE.as_bytes()).is_ok());

            let gstates = resources.get(b"ExtGState").unwrap().as_dict().unwrap();
            assert!(gstates.get(GSTATE_RESOURCE.as_bytes()).is_ok());
        }
    }

    #[test]
    fn test_watermark_appends_to_existing_contents() {
        let mut doc = document_with_pages(1);
        let options = WatermarkOptions::new("COPY");

        apply_watermark(&mut doc, &options, |_, _| {}).unwrap();

        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();

        // Original stream plus the stamp.
        let contents = page.get(b"Contents").unwrap().as_array().unwrap();
        assert_eq!(contents.len(), 2);
    }

    #[test]
    fn test_watermark_stream_draws_the_text() {
        let stream = stamp_stream(&WatermarkOptions::new("SECRET"), 306.0, 396.0).unwrap();
        let decoded = Content::decode(&stream.content).unwrap();

        let operators: Vec<&str> = decoded
            .operations
            .iter()
            .map(|op| op.operator.as_str())
            .collect();
        assert!(operators.contains(&"gs"));
        assert!(operators.contains(&"Tj"));
        assert!(operators.contains(&"Tm"));

        let tj = decoded
            .operations
            .iter()
            .find(|op| op.operator == "Tj")
            .unwrap();
        assert_eq!(
            tj.operands[0],
            Object::string_literal("SECRET")
        );
    }

    #[test]
    fn test_watermark_rejects_bad_opacity() {
        let mut doc = document_with_pages(1);
        let mut options = WatermarkOptions::new("DRAFT");
        options.opacity = 2.0;

        let err = apply_watermark(&mut doc, &options, |_, _| {}).unwrap_err();
        assert!(matches!(err, PdfOpsError::InvalidConfig { .. }));
    }

    #[test]
    fn test_gstate_carries_opacity() {
        let mut doc = document_with_pages(1);
        let mut options = WatermarkOptions::new("DRAFT");
        options.opacity = 0.25;

        apply_watermark(&mut doc, &options, |_, _| {}).unwrap();

        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let gstates = resources.get(b"ExtGState").unwrap().as_dict().unwrap();
        let gs_ref = gstates
            .get(GSTATE_RESOURCE.as_bytes())
            .unwrap()
            .as_reference()
            .unwrap();

        let gs = doc.get_dictionary(gs_ref).unwrap();
        let alpha = gs.get(b"ca").unwrap().as_float().unwrap();
        assert!((alpha - 0.25).abs() < f32::EPSILON);
    }
}
