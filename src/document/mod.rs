//! Document model
//!
//! Format-agnostic types shared by the extractor and the conversation
//! session: the uploaded [`Document`], its [`DocumentKind`], and the
//! [`ExtractionResult`] produced from it.

mod error;
mod types;

pub use error::{ExtractionError, ExtractionResult};
pub use types::{Document, DocumentKind, ExtractedText, PartialPage, DOCX_MIME, PDF_MIME};
