//! Document text extraction
//!
//! Turns an uploaded [`Document`] into plain text:
//!
//! - **text**: bytes decoded as UTF-8
//! - **docx**: `word/document.xml` runs, paragraph by paragraph
//! - **pdf**: per-page text layer, with OCR for pages that have none
//!
//! The extractor is stateless. Password handling is a single-shot contract:
//! a [`ExtractionError::PasswordRequired`] result is retried by the caller
//! with a password; nothing is cached here.

mod docx;
mod pdf;
mod text;

use std::sync::Arc;

use crate::document::{Document, DocumentKind, ExtractionError, ExtractionResult};
use crate::ocr::OcrService;
use crate::pdf::PdfEngine;

/// Extractor tuning
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Upscale factor for page rasters handed to OCR
    pub render_scale: f32,
    /// OCR language (Tesseract code)
    pub ocr_language: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            render_scale: 2.0,
            ocr_language: "eng".to_string(),
        }
    }
}

/// Document extractor
#[derive(Clone)]
pub struct Extractor {
    pdf: Arc<dyn PdfEngine>,
    ocr: Arc<OcrService>,
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(pdf: Arc<dyn PdfEngine>, ocr: Arc<OcrService>, config: ExtractorConfig) -> Self {
        Self { pdf, ocr, config }
    }

    /// OCR service used for scanned pages
    pub fn ocr(&self) -> &Arc<OcrService> {
        &self.ocr
    }

    /// Extract the full text of a document
    ///
    /// `password` only matters for PDFs. Errors are returned, never raised
    /// past this boundary.
    pub async fn extract(&self, document: &Document, password: Option<&str>) -> ExtractionResult {
        let Some(kind) = document.kind() else {
            tracing::info!(
                "Unsupported document {:?} ({:?})",
                document.file_name(),
                document.mime_type()
            );
            return Err(ExtractionError::UnsupportedType(document.type_label().to_string()));
        };

        tracing::debug!(
            "Extracting {:?} as {} ({} bytes, password: {})",
            document.file_name(),
            kind,
            document.len(),
            if password.is_some() { "yes" } else { "no" }
        );

        let result = match kind {
            DocumentKind::Text => Ok(text::extract(document.data())),
            DocumentKind::Docx => {
                let data = document.shared_data();
                tokio::task::spawn_blocking(move || docx::extract(&data))
                    .await
                    .map_err(|e| ExtractionError::Corrupt(format!("DOCX worker failed: {}", e)))?
            }
            DocumentKind::Pdf => {
                pdf::PdfExtraction {
                    engine: &self.pdf,
                    ocr: &self.ocr,
                    config: &self.config,
                }
                .run(document, password)
                .await
            }
        };

        match &result {
            Ok(extracted) => tracing::info!(
                "Extracted {} characters from {:?} ({} pages dropped)",
                extracted.char_count(),
                document.file_name(),
                extracted.partial_pages.len()
            ),
            Err(e) => tracing::info!("Extraction of {:?} failed: {}", document.file_name(), e),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DOCX_MIME;
    use crate::ocr::{MockProvider, OcrProviderTrait, OcrServiceConfig};
    use crate::pdf::{MockPdfEngine, MupdfEngine};

    pub(crate) fn extractor_with(engine: impl PdfEngine + 'static, ocr: Arc<MockProvider>) -> Extractor {
        let providers: Vec<Arc<dyn OcrProviderTrait>> = vec![ocr];
        Extractor::new(
            Arc::new(engine),
            Arc::new(OcrService::with_providers(OcrServiceConfig::default(), providers)),
            ExtractorConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_text_document() {
        let extractor = extractor_with(MockPdfEngine::new(vec![]), Arc::new(MockProvider::new(vec![])));
        let doc = Document::new("notes.txt", "text/plain", b"Meeting at noon".to_vec());

        let result = extractor.extract(&doc, None).await.unwrap();
        assert_eq!(result.text, "Meeting at noon");
        assert_eq!(result.kind, DocumentKind::Text);
    }

    #[tokio::test]
    async fn test_docx_document() {
        let extractor = extractor_with(MockPdfEngine::new(vec![]), Arc::new(MockProvider::new(vec![])));
        let bytes = docx::tests::build_docx(&["Hello from Word"]);
        let doc = Document::new("letter.docx", DOCX_MIME, bytes);

        let result = extractor.extract(&doc, Some("ignored")).await.unwrap();
        assert_eq!(result.text.trim(), "Hello from Word");
        assert_eq!(result.kind, DocumentKind::Docx);
    }

    #[tokio::test]
    async fn test_corrupt_docx() {
        let extractor = extractor_with(MockPdfEngine::new(vec![]), Arc::new(MockProvider::new(vec![])));
        let doc = Document::new("letter.docx", "", b"not a zip".to_vec());

        let result = extractor.extract(&doc, None).await;
        assert!(matches!(result, Err(ExtractionError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_unsupported_document() {
        let extractor = extractor_with(MockPdfEngine::new(vec![]), Arc::new(MockProvider::new(vec![])));
        let doc = Document::new("image.png", "image/png", vec![0x89, b'P', b'N', b'G']);

        let result = extractor.extract(&doc, None).await;
        assert_eq!(result.unwrap_err(), ExtractionError::UnsupportedType("image/png".into()));
    }

    #[tokio::test]
    async fn test_pdf_with_mupdf_engine() {
        let pdf = crate::pdf::fixtures::build_pdf(&["Page one", "Page two", "Page three"]);
        let extractor = extractor_with(MupdfEngine::new(), Arc::new(MockProvider::new(vec![])));
        let doc = Document::new("report.pdf", "application/pdf", pdf);

        let result = extractor.extract(&doc, None).await.unwrap();
        assert_eq!(result.text, "Page one\nPage two\nPage three\n");
        assert_eq!(result.page_count, Some(3));
        assert!(result.partial_pages.is_empty());
    }

    #[tokio::test]
    async fn test_encrypted_pdf_with_mupdf_engine() {
        let pdf = crate::pdf::fixtures::build_encrypted_pdf(&["Lease terms"], "secret");
        let extractor = extractor_with(MupdfEngine::new(), Arc::new(MockProvider::new(vec![])));
        let doc = Document::new("lease.pdf", "application/pdf", pdf);

        assert_eq!(extractor.extract(&doc, None).await.unwrap_err(), ExtractionError::PasswordRequired);
        assert_eq!(
            extractor.extract(&doc, Some("wrong")).await.unwrap_err(),
            ExtractionError::PasswordRequired
        );

        let result = extractor.extract(&doc, Some("secret")).await.unwrap();
        assert_eq!(result.text, "Lease terms\n");
        assert_eq!(result.page_count, Some(1));
    }

    #[tokio::test]
    async fn test_mupdf_scanned_page_goes_to_ocr() {
        let pdf = crate::pdf::fixtures::build_pdf(&["Cover", ""]);
        let ocr = Arc::new(MockProvider::new(vec![Ok("  scanned words \n".into())]));
        let extractor = extractor_with(MupdfEngine::new(), ocr.clone());
        let doc = Document::new("mixed.pdf", "", pdf);

        let result = extractor.extract(&doc, None).await.unwrap();
        assert_eq!(result.text, "Cover\nscanned words\n");

        let calls = ocr.calls.lock();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
