//! OCR Types
//!
//! Defines types for OCR processing of scanned PDF pages.

use serde::{Deserialize, Serialize};

/// OCR provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrProvider {
    /// Tesseract OCR (local)
    Tesseract,
    /// Ollama vision model (local LLM)
    Ollama,
}

impl Default for OcrProvider {
    fn default() -> Self {
        Self::Tesseract
    }
}

impl OcrProvider {
    /// Parse a provider name from configuration
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "tesseract" => Some(Self::Tesseract),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }
}

/// OCR result
#[derive(Debug, Clone, Serialize)]
pub struct OcrResult {
    /// Recognized text
    pub text: String,
    /// Confidence score (0-100)
    pub confidence: f64,
    /// Provider used
    pub provider: OcrProvider,
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_name() {
        assert_eq!(OcrProvider::from_name("Tesseract"), Some(OcrProvider::Tesseract));
        assert_eq!(OcrProvider::from_name(" ollama "), Some(OcrProvider::Ollama));
        assert_eq!(OcrProvider::from_name("openai"), None);
    }

    #[test]
    fn test_provider_serializes_lowercase() {
        let json = serde_json::to_string(&OcrProvider::Ollama).unwrap();
        assert_eq!(json, "\"ollama\"");
    }
}
