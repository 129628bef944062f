//! PDF engine trait and errors

use thiserror::Error;

/// PDF engine errors
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Password required for this PDF")]
    PasswordRequired,
    #[error("Failed to load PDF: {0}")]
    LoadError(String),
    #[error("Page {0} not found (document has {1} pages)")]
    PageNotFound(usize, usize),
    #[error("Failed to extract text: {0}")]
    TextError(String),
    #[error("Failed to render page: {0}")]
    RenderError(String),
    #[error("Image encoding error: {0}")]
    ImageError(String),
    #[error("Blocking task failed: {0}")]
    TaskError(String),
    #[error("MuPDF error: {0}")]
    MuPdfError(String),
}

impl From<mupdf::Error> for PdfError {
    fn from(e: mupdf::Error) -> Self {
        PdfError::MuPdfError(e.to_string())
    }
}

pub type PdfResult<T> = std::result::Result<T, PdfError>;

/// Stateless access to PDF pages
///
/// Page numbers are 1-indexed. A `None` password behaves like an empty one.
pub trait PdfEngine: Send + Sync {
    /// Open the document and return its page count
    ///
    /// Fails with [`PdfError::PasswordRequired`] when the document is
    /// encrypted and the password is missing or rejected.
    fn page_count(&self, data: &[u8], password: Option<&str>) -> PdfResult<usize>;

    /// Embedded text layer of a page: text runs in reading order joined by
    /// single spaces. Not trimmed.
    fn page_text(&self, data: &[u8], password: Option<&str>, page: usize) -> PdfResult<String>;

    /// Render a page to PNG at the given scale
    fn render_page(
        &self,
        data: &[u8],
        password: Option<&str>,
        page: usize,
        scale: f32,
    ) -> PdfResult<Vec<u8>>;
}
