//! PDF engine
//!
//! Text layers and page rasters for the PDF extraction path.
//!
//! The [`PdfEngine`] trait is stateless: every call receives the document
//! bytes and the password and opens a fresh document. MuPDF's `fz_context`
//! is not thread-safe, so no document handle is ever shared or kept alive
//! between calls, and every call is safe to run on a blocking thread.
//!
//! ```rust,ignore
//! let engine = MupdfEngine::new();
//! let pages = engine.page_count(&bytes, Some("secret"))?;
//! let text = engine.page_text(&bytes, Some("secret"), 1)?;
//! let png = engine.render_page(&bytes, Some("secret"), 1, 2.0)?;
//! ```

mod engine;
mod mupdf_engine;

pub use engine::{PdfEngine, PdfError, PdfResult};
pub use mupdf_engine::MupdfEngine;

#[cfg(test)]
pub use engine::mock::{MockPage, MockPdfEngine};

#[cfg(test)]
pub mod fixtures;
