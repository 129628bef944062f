//! OCR Providers
//!
//! Defines the provider trait and implementations for different OCR backends.

use async_trait::async_trait;

use super::types::{OcrError, OcrProvider, OcrResult};

/// OCR provider trait
#[async_trait]
pub trait OcrProviderTrait: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> OcrProvider;

    /// Check if the provider is available
    async fn is_available(&self) -> bool;

    /// Perform OCR on an encoded image (PNG)
    async fn recognize(&self, image_data: &[u8], language: Option<&str>) -> Result<OcrResult, OcrError>;
}

/// Tesseract OCR provider
#[cfg(feature = "ocr-tesseract")]
pub struct TesseractProvider {
    /// Default language
    default_language: String,
}

#[cfg(feature = "ocr-tesseract")]
impl TesseractProvider {
    pub fn new(default_language: &str) -> Self {
        Self {
            default_language: default_language.to_string(),
        }
    }
}

#[cfg(feature = "ocr-tesseract")]
#[async_trait]
impl OcrProviderTrait for TesseractProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    async fn is_available(&self) -> bool {
        // Initialization fails when libtesseract has no data for the language
        let lang = self.default_language.clone();
        tokio::task::spawn_blocking(move || tesseract::Tesseract::new(None, Some(&lang)).is_ok())
            .await
            .unwrap_or(false)
    }

    async fn recognize(&self, image_data: &[u8], language: Option<&str>) -> Result<OcrResult, OcrError> {
        let lang = language.unwrap_or(&self.default_language).to_string();
        let image = image_data.to_vec();

        // libtesseract is blocking and CPU bound
        tokio::task::spawn_blocking(move || {
            let mut engine = tesseract::Tesseract::new(None, Some(&lang))
                .map_err(|e| OcrError::ProviderNotAvailable(format!("Tesseract init failed: {}", e)))?
                .set_image_from_mem(&image)
                .map_err(|e| OcrError::InvalidImage(e.to_string()))?
                .recognize()
                .map_err(|e| OcrError::ProcessingError(e.to_string()))?;

            let text = engine
                .get_text()
                .map_err(|e| OcrError::ProcessingError(e.to_string()))?;
            let confidence = engine.mean_text_conf() as f64;

            Ok(OcrResult {
                text: text.trim().to_string(),
                confidence,
                provider: OcrProvider::Tesseract,
            })
        })
        .await
        .map_err(|e| OcrError::ProcessingError(format!("Tesseract task failed: {}", e)))?
    }
}

/// Ollama vision model provider
pub struct OllamaProvider {
    /// Ollama API URL
    base_url: String,
    /// Model name (e.g., "llava", "bakllava")
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl OcrProviderTrait for OllamaProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Ollama
    }

    async fn is_available(&self) -> bool {
        // Check if Ollama is running
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn recognize(&self, image_data: &[u8], language: Option<&str>) -> Result<OcrResult, OcrError> {
        use base64::Engine;

        let url = format!("{}/api/generate", self.base_url);

        // Encode image as base64
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image_data);

        // Build prompt
        let lang_hint = language
            .map(|l| format!(" The text is in {}.", l))
            .unwrap_or_default();

        let prompt = format!(
            "Extract all text from this image exactly as written.{} Return only the extracted text, nothing else.",
            lang_hint
        );

        let request = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "images": [image_base64],
            "stream": false
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::ApiError(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to parse response: {}", e)))?;

        let text = result["response"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();

        Ok(OcrResult {
            text,
            confidence: 75.0, // LLMs don't provide confidence scores
            provider: OcrProvider::Ollama,
        })
    }
}

/// Scripted provider for tests
///
/// Pops one scripted outcome per call (`Err` becomes a processing error) and
/// records the images and languages it was given.
#[cfg(test)]
pub struct MockProvider {
    pub provider: OcrProvider,
    pub available: bool,
    script: parking_lot::Mutex<std::collections::VecDeque<Result<String, String>>>,
    pub calls: parking_lot::Mutex<Vec<(Vec<u8>, Option<String>)>>,
}

#[cfg(test)]
impl MockProvider {
    pub fn new(script: Vec<Result<String, String>>) -> Self {
        Self {
            provider: OcrProvider::Tesseract,
            available: true,
            script: parking_lot::Mutex::new(script.into()),
            calls: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable(provider: OcrProvider) -> Self {
        Self {
            provider,
            available: false,
            script: parking_lot::Mutex::new(Default::default()),
            calls: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[cfg(test)]
#[async_trait]
impl OcrProviderTrait for MockProvider {
    fn provider_type(&self) -> OcrProvider {
        self.provider
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, image_data: &[u8], language: Option<&str>) -> Result<OcrResult, OcrError> {
        self.calls
            .lock()
            .push((image_data.to_vec(), language.map(str::to_string)));

        match self.script.lock().pop_front() {
            Some(Ok(text)) => Ok(OcrResult {
                text,
                confidence: 90.0,
                provider: self.provider,
            }),
            Some(Err(reason)) => Err(OcrError::ProcessingError(reason)),
            None => Err(OcrError::ProcessingError("script exhausted".to_string())),
        }
    }
}
