//! OCR Module
//!
//! Recovers text from rendered PDF pages that have no embedded text layer.
//!
//! Supports multiple backends:
//! - Tesseract (local, behind the `ocr-tesseract` feature)
//! - Ollama vision models (local LLM over HTTP)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docchat_server::ocr::{OcrService, OcrServiceConfig};
//!
//! let service = OcrService::new(OcrServiceConfig::default());
//!
//! // First available provider wins, "eng" unless told otherwise
//! let result = service.recognize(&png_bytes, None, Some("eng")).await?;
//! ```

mod provider;
mod service;
mod types;

pub use provider::{OcrProviderTrait, OllamaProvider};
pub use service::{OcrService, OcrServiceConfig};
pub use types::{OcrError, OcrProvider, OcrResult};

#[cfg(feature = "ocr-tesseract")]
pub use provider::TesseractProvider;

#[cfg(test)]
pub use provider::MockProvider;
