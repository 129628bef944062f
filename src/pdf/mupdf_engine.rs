//! MuPDF-backed PDF engine
//!
//! Opens a fresh document for each operation. MuPDF's fz_context is not
//! thread-safe, and documents are cheap to reopen from memory compared to the
//! page work done with them.

use std::io::Cursor;

use mupdf::{Colorspace, Document, Matrix, TextPageOptions};

use super::engine::{PdfEngine, PdfError, PdfResult};
use crate::document::PDF_MIME;

/// PDF engine backed by the MuPDF library
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfEngine;

impl MupdfEngine {
    pub fn new() -> Self {
        Self
    }

    /// Open and, if needed, unlock a document
    fn open(data: &[u8], password: Option<&str>) -> PdfResult<Document> {
        let mut doc = Document::from_bytes(data, PDF_MIME).map_err(classify_open_error)?;

        // MuPDF already tries the empty password while opening, so this
        // only stays true for documents that need a real user password.
        if doc.needs_password()? {
            let password = password.unwrap_or_default();
            if password.is_empty() || !doc.authenticate(password)? {
                return Err(PdfError::PasswordRequired);
            }
        }

        Ok(doc)
    }

    /// Convert a 1-indexed page number to MuPDF's 0-indexed page index
    fn page_index(doc: &Document, page: usize) -> PdfResult<i32> {
        let count = doc.page_count()? as usize;
        if page < 1 || page > count {
            return Err(PdfError::PageNotFound(page, count));
        }
        Ok((page - 1) as i32)
    }

    /// Encode an RGB(A) pixmap as PNG
    fn encode_png(pixmap: &mupdf::Pixmap) -> PdfResult<Vec<u8>> {
        let width = pixmap.width() as u32;
        let height = pixmap.height() as u32;
        let samples = pixmap.samples();
        let n = pixmap.n() as usize;

        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for pixel in samples.chunks(n.max(1)) {
            let r = pixel.first().copied().unwrap_or(255);
            let g = pixel.get(1).copied().unwrap_or(r);
            let b = pixel.get(2).copied().unwrap_or(r);
            rgb.extend_from_slice(&[r, g, b]);
        }

        let img = image::RgbImage::from_raw(width, height, rgb)
            .ok_or_else(|| PdfError::ImageError("Failed to create image buffer".to_string()))?;

        let mut output = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
            .map_err(|e| PdfError::ImageError(e.to_string()))?;

        Ok(output)
    }
}

/// Map an open failure to a password or load error
///
/// MuPDF reports encryption problems only through its message text.
fn classify_open_error(err: mupdf::Error) -> PdfError {
    let message = err.to_string();
    let lower = message.to_lowercase();
    if lower.contains("password") || lower.contains("encrypt") {
        PdfError::PasswordRequired
    } else {
        PdfError::LoadError(message)
    }
}

impl PdfEngine for MupdfEngine {
    fn page_count(&self, data: &[u8], password: Option<&str>) -> PdfResult<usize> {
        let doc = Self::open(data, password)?;
        Ok(doc.page_count()? as usize)
    }

    fn page_text(&self, data: &[u8], password: Option<&str>, page: usize) -> PdfResult<String> {
        let doc = Self::open(data, password)?;
        let index = Self::page_index(&doc, page)?;
        let page = doc.load_page(index)?;
        let text_page = page
            .to_text_page(TextPageOptions::empty())
            .map_err(|e| PdfError::TextError(e.to_string()))?;

        let mut runs = Vec::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let run: String = line.chars().filter_map(|ch| ch.char()).collect();
                let run = run.trim();
                if !run.is_empty() {
                    runs.push(run.to_string());
                }
            }
        }

        Ok(runs.join(" "))
    }

    fn render_page(
        &self,
        data: &[u8],
        password: Option<&str>,
        page: usize,
        scale: f32,
    ) -> PdfResult<Vec<u8>> {
        let doc = Self::open(data, password)?;
        let index = Self::page_index(&doc, page)?;
        let page = doc.load_page(index)?;

        // Clamp scale to keep rasters bounded (0.1 to 4.0)
        let scale = scale.clamp(0.1, 4.0);
        let matrix = Matrix::new_scale(scale, scale);

        // No alpha: OCR wants an opaque white background
        let pixmap = page
            .to_pixmap(&matrix, &Colorspace::device_rgb(), false, true)
            .map_err(|e| PdfError::RenderError(e.to_string()))?;

        Self::encode_png(&pixmap)
    }
}
