//! PDF ingestion: text extraction plus a best-effort walk of each page's
//! link annotations. Hyperlinks matter because PDF text extraction drops
//! them (profile URLs, portfolio links), so they are collected separately
//! and handed to the model alongside the text.

use lopdf::{Document, Object};
use serde::Serialize;
use tracing::warn;

use super::ExtractError;

/// A URI action found on a page's annotations. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hyperlink {
    pub page: u32,
    pub url: String,
}

/// Extracts the full text of a PDF along with every hyperlink annotation.
///
/// Text extraction failure is fatal; hyperlink extraction failure is not
/// (the resume is still usable without its links).
pub fn extract_text_and_hyperlinks(
    pdf_bytes: &[u8],
) -> Result<(String, Vec<Hyperlink>), ExtractError> {
    let text = pdf_extract::extract_text_from_mem(pdf_bytes)
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let hyperlinks = match extract_hyperlinks(pdf_bytes) {
        Ok(links) => links,
        Err(e) => {
            warn!("Hyperlink extraction failed, continuing without links: {e}");
            Vec::new()
        }
    };

    Ok((text, hyperlinks))
}

/// Walks every page's `Annots` array and collects URI actions. Annotations
/// without an action dictionary carrying a string `URI` are skipped.
fn extract_hyperlinks(pdf_bytes: &[u8]) -> Result<Vec<Hyperlink>, lopdf::Error> {
    let doc = Document::load_mem(pdf_bytes)?;
    let mut links = Vec::new();

    for (page_number, page_id) in doc.get_pages() {
        let annots = match doc
            .get_object(page_id)
            .and_then(|o| o.as_dict())
            .and_then(|page| page.get(b"Annots"))
        {
            Ok(annots) => resolve(&doc, annots),
            Err(_) => continue,
        };
        let annots = match annots.as_array() {
            Ok(annots) => annots,
            Err(_) => continue,
        };

        for annot in annots {
            let action = match resolve(&doc, annot).as_dict().and_then(|a| a.get(b"A")) {
                Ok(action) => resolve(&doc, action),
                Err(_) => continue,
            };
            let uri = match action.as_dict().and_then(|a| a.get(b"URI")) {
                Ok(uri) => resolve(&doc, uri),
                Err(_) => continue,
            };
            if let Object::String(bytes, _) = uri {
                links.push(Hyperlink {
                    page: page_number,
                    url: String::from_utf8_lossy(bytes).into_owned(),
                });
            }
        }
    }

    Ok(links)
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

/// Builds a one-page PDF with the given body text and, optionally, a link
/// annotation carrying a URI action.
#[cfg(test)]
pub(crate) fn fixture_pdf(text: &str, url: Option<&str>) -> Vec<u8> {
    use lopdf::{dictionary, Stream};

    let mut doc = Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

    let resources = dictionary! {
        "Font" => dictionary! { "F1" => Object::Reference(font_id) },
    };

    let mut page_dict = dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
        "Contents" => Object::Reference(content_id),
        "Resources" => resources,
    };

    if let Some(url) = url {
        let annot_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![
                Object::Integer(72),
                Object::Integer(710),
                Object::Integer(200),
                Object::Integer(730),
            ],
            "A" => dictionary! {
                "S" => "URI",
                "URI" => Object::string_literal(url),
            },
        });
        page_dict.set("Annots", vec![Object::Reference(annot_id)]);
    }

    let page_id = doc.add_object(page_dict);

    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => Object::Integer(1),
    });

    if let Ok(page_obj) = doc.get_object_mut(page_id) {
        if let Ok(dict) = page_obj.as_dict_mut() {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to serialize fixture PDF");
    buf
}
