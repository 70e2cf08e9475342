//! PDF text extraction port and the lopdf/pdf-extract implementation

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::PageText;

/// Extracts plain text from a PDF file, one entry per page
///
/// Called from the blocking thread pool; implementations may block.
pub trait PdfExtractor: Send + Sync {
    /// Extract the text of every page, in page order
    fn extract(&self, path: &Path) -> Result<Vec<PageText>>;

    /// Get extractor name for logging
    fn name(&self) -> &str;
}

/// Page-aware extractor built on lopdf, with pdf-extract as fallback
#[derive(Debug, Clone, Default)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(path: &Path) -> Result<Vec<PageText>> {
        let doc = lopdf::Document::load(path)
            .map_err(|e| Error::extraction(format!("Failed to load PDF: {}", e)))?;

        let mut pages = Vec::new();
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) => pages.push(PageText::new(*page_number, cleanup_pdf_text(&text))),
                Err(e) => {
                    tracing::debug!("Could not extract text from page {}: {}", page_number, e);
                    pages.push(PageText::new(*page_number, String::new()));
                }
            }
        }

        Ok(pages)
    }

    fn extract_whole(path: &Path) -> Result<String> {
        pdf_extract::extract_text(path)
            .map(|text| cleanup_pdf_text(&text))
            .map_err(|e| Error::extraction(format!("pdf-extract failed: {}", e)))
    }
}

impl PdfExtractor for LopdfExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<PageText>> {
        let pages = Self::extract_pages(path)?;

        if pages.iter().any(|p| !p.text.trim().is_empty()) {
            return Ok(pages);
        }

        // lopdf misses text drawn with some font encodings
        tracing::warn!(
            "lopdf found no text in {} page(s), trying pdf-extract",
            pages.len()
        );
        let text = Self::extract_whole(path)?;
        if text.trim().is_empty() {
            return Ok(pages);
        }
        Ok(vec![PageText::new(1, text)])
    }

    fn name(&self) -> &str {
        "lopdf"
    }
}

/// Normalise extracted text: strip NULs, flatten typographic glyphs, trim lines
pub(crate) fn cleanup_pdf_text(text: &str) -> String {
    let replaced = text
        .replace('\0', "")
        .replace(['\u{2010}', '\u{2011}', '\u{2013}'], "-")
        .replace('\u{2014}', "--")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace('\u{2022}', "* ")
        .replace('\u{2026}', "...")
        .replace('\u{00A0}', " ")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl");

    replaced
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn hello_pdf(text: &str) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_extracts_page_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.pdf");
        std::fs::write(&path, hello_pdf("Hello World")).unwrap();

        let pages = LopdfExtractor::new().extract(&path).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert!(pages[0].text.contains("Hello"));
    }

    #[test]
    fn test_garbage_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4\nthis is not really a pdf").unwrap();

        let result = LopdfExtractor::new().extract(&path);
        assert!(matches!(result, Err(Error::Extraction(_))));
    }

    #[test]
    fn test_cleanup_flattens_glyphs() {
        let cleaned = cleanup_pdf_text("\u{FB01}rst \u{201C}quote\u{201D}\0  \nnext\u{2026}   ");
        assert_eq!(cleaned, "first \"quote\"\nnext...");
    }
}
