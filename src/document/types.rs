//! Core document types
//!
//! An uploaded document, its detected kind, and the text extracted from it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// MIME type declared for PDF uploads
pub const PDF_MIME: &str = "application/pdf";

/// MIME type declared for Word (OOXML) uploads
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Kind of document, as far as text extraction is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    /// Detect the kind from a declared MIME label and a file name.
    ///
    /// Rules are evaluated in order and the first match wins. Both inputs
    /// are compared case-insensitively.
    pub fn detect(mime_type: &str, file_name: &str) -> Option<Self> {
        let mime = mime_type.trim().to_ascii_lowercase();
        let name = file_name.trim().to_ascii_lowercase();

        KIND_RULES
            .iter()
            .find(|rule| (rule.matches)(&mime, &name))
            .map(|rule| rule.kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the kind detection table
struct KindRule {
    matches: fn(&str, &str) -> bool,
    kind: DocumentKind,
}

/// Detection table: exact labels, then suffixes, per kind, PDF first.
const KIND_RULES: &[KindRule] = &[
    KindRule { matches: is_pdf_mime, kind: DocumentKind::Pdf },
    KindRule { matches: has_pdf_suffix, kind: DocumentKind::Pdf },
    KindRule { matches: is_docx_mime, kind: DocumentKind::Docx },
    KindRule { matches: has_docx_suffix, kind: DocumentKind::Docx },
    KindRule { matches: is_text_mime, kind: DocumentKind::Text },
    KindRule { matches: has_txt_suffix, kind: DocumentKind::Text },
];

fn is_pdf_mime(mime: &str, _name: &str) -> bool {
    mime == PDF_MIME
}

fn has_pdf_suffix(_mime: &str, name: &str) -> bool {
    name.ends_with(".pdf")
}

fn is_docx_mime(mime: &str, _name: &str) -> bool {
    mime == DOCX_MIME
}

fn has_docx_suffix(_mime: &str, name: &str) -> bool {
    name.ends_with(".docx")
}

fn is_text_mime(mime: &str, _name: &str) -> bool {
    mime.starts_with("text/")
}

fn has_txt_suffix(_mime: &str, name: &str) -> bool {
    name.ends_with(".txt")
}

/// An uploaded document
///
/// Immutable once read. The byte buffer is shared so blocking extraction
/// work can hold it without copying.
#[derive(Debug, Clone)]
pub struct Document {
    file_name: String,
    mime_type: String,
    data: Arc<Vec<u8>>,
}

impl Document {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data: Arc::new(data),
        }
    }

    /// Original file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Declared MIME label (may be empty)
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Raw bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the raw bytes
    pub fn shared_data(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Detected kind, or `None` when the document is not supported
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::detect(&self.mime_type, &self.file_name)
    }

    /// Label used when reporting an unsupported document
    pub fn type_label(&self) -> &str {
        if self.mime_type.trim().is_empty() {
            &self.file_name
        } else {
            &self.mime_type
        }
    }
}

/// A page that could not be extracted
///
/// Recorded on the result; never turns the extraction into a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialPage {
    /// Page number (1-indexed)
    pub page: usize,
    /// What went wrong
    pub reason: String,
}

/// Successful extraction output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedText {
    /// Full plain text
    pub text: String,
    /// Kind the document was extracted as
    pub kind: DocumentKind,
    /// Number of pages (PDF only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    /// Pages that dropped out
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partial_pages: Vec<PartialPage>,
}

impl ExtractedText {
    /// Text-only result (DOCX, plain text)
    pub fn plain(kind: DocumentKind, text: String) -> Self {
        Self {
            text,
            kind,
            page_count: None,
            partial_pages: Vec::new(),
        }
    }

    /// True when nothing but whitespace was extracted
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Length in characters (not bytes)
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_mime() {
        assert_eq!(DocumentKind::detect(PDF_MIME, "upload"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::detect(DOCX_MIME, "upload"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::detect("text/markdown", "notes.md"), Some(DocumentKind::Text));
    }

    #[test]
    fn test_detect_falls_back_to_suffix() {
        assert_eq!(DocumentKind::detect("", "Report.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::detect("application/octet-stream", "letter.docx"),
            Some(DocumentKind::Docx)
        );
        assert_eq!(DocumentKind::detect("", "readme.txt"), Some(DocumentKind::Text));
    }

    #[test]
    fn test_detect_first_match_wins() {
        // A .pdf name outranks a generic text label
        assert_eq!(DocumentKind::detect("text/plain", "scan.pdf"), Some(DocumentKind::Pdf));
        // An explicit PDF label outranks a .txt name
        assert_eq!(DocumentKind::detect("application/pdf", "a.txt"), Some(DocumentKind::Pdf));
    }

    #[test]
    fn test_detect_unsupported() {
        assert_eq!(DocumentKind::detect("image/png", "image.png"), None);
        assert_eq!(DocumentKind::detect("", "archive"), None);
    }

    #[test]
    fn test_document_accessors() {
        let doc = Document::new("image.png", "", vec![1, 2, 3]);
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.kind(), None);
        assert_eq!(doc.type_label(), "image.png");

        let doc = Document::new("image.png", "image/png", vec![]);
        assert!(doc.is_empty());
        assert_eq!(doc.type_label(), "image/png");
    }

    #[test]
    fn test_extracted_text_blank() {
        let blank = ExtractedText::plain(DocumentKind::Text, " \n\t\n".to_string());
        assert!(blank.is_blank());

        let text = ExtractedText::plain(DocumentKind::Text, "héllo".to_string());
        assert!(!text.is_blank());
        assert_eq!(text.char_count(), 5);
    }
}
