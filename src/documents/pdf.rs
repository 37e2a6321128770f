// PDF text extraction

use super::{ExtractedDocument, TextExtractor};
use crate::types::{AppError, AppResult};
use lopdf::Document;
use std::path::Path;
use tracing::{debug, info};

pub const PAGE_SEPARATOR: &str = "\n";
const ENCRYPTED: &str = "PDF is encrypted";

pub struct PdfExtractor {
    max_pages: usize,
}

impl PdfExtractor {
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages: max_pages.max(1),
        }
    }

    fn load(path: &Path) -> AppResult<Document> {
        if !path.is_file() {
            return Err(AppError::extraction(format!(
                "cannot open {}",
                path.display()
            )));
        }

        let doc = Document::load(path).map_err(load_error)?;

        if doc.is_encrypted() {
            return Err(AppError::extraction(ENCRYPTED));
        }
        Ok(doc)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(10)
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> AppResult<ExtractedDocument> {
        let doc = Self::load(path)?;
        let pages = doc.get_pages();
        let total_pages = pages.len();

        let mut texts = Vec::new();
        for (&page_num, _page_id) in pages.iter().take(self.max_pages) {
            let page_text = doc.extract_text(&[page_num]).map_err(|e| {
                AppError::extraction(format!("failed to read page {}: {}", page_num, e))
            })?;
            let page_text = page_text.trim_end();
            if !page_text.is_empty() {
                texts.push(page_text.to_string());
            }
        }

        let pages_read = total_pages.min(self.max_pages);
        if total_pages > self.max_pages {
            info!(
                file = %file_label(path),
                "Reading first {} of {} pages", self.max_pages, total_pages
            );
        }

        let text = texts.join(PAGE_SEPARATOR);
        debug!(file = %file_label(path), chars = text.chars().count(), pages_read, "Extracted text");

        Ok(ExtractedDocument {
            path: path.to_path_buf(),
            text,
            pages_read,
            total_pages,
        })
    }
}

fn load_error(e: lopdf::Error) -> AppError {
    match e {
        lopdf::Error::Decryption(_) => AppError::extraction(ENCRYPTED),
        other => AppError::from(other),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}


#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use tempfile::TempDir;

    #[test]
    fn test_extracts_pages_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("receipt.pdf");
        test_pdf::write(&path, &["Total Due: $42.00", "Thank you for your purchase"]);

        let doc = PdfExtractor::default().extract(&path).unwrap();
        assert_eq!(doc.total_pages, 2);
        assert_eq!(doc.pages_read, 2);

        let first = doc.text.find("Total Due").unwrap();
        let second = doc.text.find("Thank you").unwrap();
        assert!(first < second);
        assert!(doc.has_text());
    }

    #[test]
    fn test_page_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("long.pdf");
        test_pdf::write(&path, &["page one", "page two", "page three"]);

        let doc = PdfExtractor::new(2).extract(&path).unwrap();
        assert_eq!(doc.total_pages, 3);
        assert_eq!(doc.pages_read, 2);
        assert!(doc.text.contains("page two"));
        assert!(!doc.text.contains("page three"));
    }

    #[test]
    fn test_not_a_pdf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"this is plain text, not a PDF").unwrap();

        let err = PdfExtractor::default().extract(&path).unwrap_err();
        assert_eq!(err.kind(), "ExtractionError");
    }

    #[test]
    fn test_encrypted_pdf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("locked.pdf");
        test_pdf::write(&path, &["Salary statement"]);

        // Mark the document as encrypted the way a protected file would be
        let mut doc = Document::load(&path).unwrap();
        let encrypt_id = doc.add_object(lopdf::dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "O" => lopdf::Object::string_literal(vec![0u8; 32]),
            "U" => lopdf::Object::string_literal(vec![0u8; 32]),
            "P" => -4,
        });
        doc.trailer.set("Encrypt", encrypt_id);
        doc.save(&path).unwrap();

        let err = PdfExtractor::default().extract(&path).unwrap_err();
        assert_eq!(err.kind(), "ExtractionError");
        assert_eq!(err.message(), ENCRYPTED);
    }

    #[test]
    fn test_decryption_failure_maps_to_encrypted() {
        use lopdf::encryption::DecryptionError;

        let err = load_error(lopdf::Error::Decryption(DecryptionError::IncorrectPassword));
        assert_eq!(err.kind(), "ExtractionError");
        assert_eq!(err.message(), ENCRYPTED);

        let err = load_error(lopdf::Error::Header);
        assert!(err.message().starts_with("not a readable PDF"));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = PdfExtractor::default()
            .extract(&dir.path().join("gone.pdf"))
            .unwrap_err();
        assert_eq!(err.kind(), "ExtractionError");
        assert!(err.to_string().contains("gone.pdf"));
    }

    #[test]
    fn test_page_without_text_yields_empty_string() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.pdf");
        test_pdf::write(&path, &[""]);

        let doc = PdfExtractor::default().extract(&path).unwrap();
        assert!(!doc.has_text());
        assert_eq!(doc.text.trim(), "");
    }
}
