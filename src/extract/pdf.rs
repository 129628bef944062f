//! PDF extraction with per-page OCR fallback
//!
//! Pages are processed strictly in order. A page whose text layer is empty
//! is rendered and sent to OCR before the next page starts, so at most one
//! raster is alive and the OCR backend sees one request at a time.
//!
//! A failing page drops out of the output and is recorded as a
//! [`PartialPage`]; it never fails the document.

use std::sync::Arc;

use thiserror::Error;

use super::ExtractorConfig;
use crate::document::{
    Document, DocumentKind, ExtractedText, ExtractionError, ExtractionResult, PartialPage,
};
use crate::ocr::{OcrError, OcrService};
use crate::pdf::{PdfEngine, PdfError, PdfResult};

/// Why a single page dropped out
#[derive(Debug, Error)]
enum PageError {
    #[error("{0}")]
    Pdf(#[from] PdfError),
    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),
}

pub(super) struct PdfExtraction<'a> {
    pub engine: &'a Arc<dyn PdfEngine>,
    pub ocr: &'a OcrService,
    pub config: &'a ExtractorConfig,
}

impl PdfExtraction<'_> {
    pub async fn run(&self, document: &Document, password: Option<&str>) -> ExtractionResult {
        let data = document.shared_data();
        let password = password.map(str::to_string);

        let page_count = self
            .blocking(&data, &password, |engine, data, password| {
                engine.page_count(data, password)
            })
            .await
            .map_err(|e| match e {
                PdfError::PasswordRequired => ExtractionError::PasswordRequired,
                other => ExtractionError::Corrupt(other.to_string()),
            })?;

        let mut text = String::new();
        let mut partial_pages = Vec::new();

        for page in 1..=page_count {
            match self.page_text(&data, &password, page).await {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => {
                    tracing::warn!(
                        "PDF extract error on page {} of {:?}: {}",
                        page,
                        document.file_name(),
                        e
                    );
                    partial_pages.push(PartialPage {
                        page,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(ExtractedText {
            text,
            kind: DocumentKind::Pdf,
            page_count: Some(page_count),
            partial_pages,
        })
    }

    /// Text of one page: the text layer, or OCR of its rendering
    async fn page_text(
        &self,
        data: &Arc<Vec<u8>>,
        password: &Option<String>,
        page: usize,
    ) -> Result<String, PageError> {
        let layer = self
            .blocking(data, password, move |engine, data, password| {
                engine.page_text(data, password, page)
            })
            .await?;

        let layer = layer.trim();
        if !layer.is_empty() {
            return Ok(layer.to_string());
        }

        tracing::debug!("Page {} has no text layer, running OCR", page);

        let scale = self.config.render_scale;
        let image = self
            .blocking(data, password, move |engine, data, password| {
                engine.render_page(data, password, page, scale)
            })
            .await?;

        let result = self
            .ocr
            .recognize(&image, None, Some(&self.config.ocr_language))
            .await?;

        Ok(result.text.trim().to_string())
    }

    /// Run an engine call on the blocking pool
    async fn blocking<T, F>(&self, data: &Arc<Vec<u8>>, password: &Option<String>, f: F) -> PdfResult<T>
    where
        F: FnOnce(&dyn PdfEngine, &[u8], Option<&str>) -> PdfResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let engine = Arc::clone(self.engine);
        let data = Arc::clone(data);
        let password = password.clone();

        tokio::task::spawn_blocking(move || f(engine.as_ref(), &data, password.as_deref()))
            .await
            .map_err(|e| PdfError::TaskError(e.to_string()))?
    }
}
