//! OCR Service
//!
//! Orchestrates OCR providers for rendered page images.

use std::sync::Arc;

use super::{
    provider::{OcrProviderTrait, OllamaProvider},
    types::{OcrError, OcrProvider, OcrResult},
};

/// OCR service configuration
#[derive(Debug, Clone)]
pub struct OcrServiceConfig {
    /// Preferred provider order
    pub providers: Vec<OcrProvider>,
    /// Ollama base URL
    pub ollama_url: String,
    /// Ollama model name
    pub ollama_model: String,
    /// Default OCR language
    pub default_language: String,
}

impl Default for OcrServiceConfig {
    fn default() -> Self {
        Self {
            providers: vec![OcrProvider::Tesseract, OcrProvider::Ollama],
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llava".to_string(),
            default_language: "eng".to_string(),
        }
    }
}

/// OCR service for scanned PDF pages
pub struct OcrService {
    config: OcrServiceConfig,
    providers: Vec<Arc<dyn OcrProviderTrait>>,
}

impl OcrService {
    /// Create a new OCR service
    pub fn new(config: OcrServiceConfig) -> Self {
        let mut providers: Vec<Arc<dyn OcrProviderTrait>> = Vec::new();

        for kind in &config.providers {
            match kind {
                OcrProvider::Tesseract => {
                    #[cfg(feature = "ocr-tesseract")]
                    {
                        use super::provider::TesseractProvider;
                        providers.push(Arc::new(TesseractProvider::new(&config.default_language)));
                    }
                    #[cfg(not(feature = "ocr-tesseract"))]
                    tracing::warn!(
                        "Tesseract requested but the ocr-tesseract feature is disabled; \
                         scanned pages depend on the remaining providers"
                    );
                }
                OcrProvider::Ollama => {
                    providers.push(Arc::new(OllamaProvider::new(
                        &config.ollama_url,
                        &config.ollama_model,
                    )));
                }
            }
        }

        Self { config, providers }
    }

    /// Create a service over an explicit provider list (in priority order)
    pub fn with_providers(config: OcrServiceConfig, providers: Vec<Arc<dyn OcrProviderTrait>>) -> Self {
        Self { config, providers }
    }

    /// Language used when a caller does not name one
    pub fn default_language(&self) -> &str {
        &self.config.default_language
    }

    /// Providers in priority order, reachable or not
    pub fn configured_providers(&self) -> Vec<OcrProvider> {
        self.providers.iter().map(|p| p.provider_type()).collect()
    }

    /// Get available providers
    pub async fn available_providers(&self) -> Vec<OcrProvider> {
        let mut available = Vec::new();
        for provider in &self.providers {
            if provider.is_available().await {
                available.push(provider.provider_type());
            }
        }
        available
    }

    /// Perform OCR on an encoded page image
    pub async fn recognize(
        &self,
        image_data: &[u8],
        preferred_provider: Option<OcrProvider>,
        language: Option<&str>,
    ) -> Result<OcrResult, OcrError> {
        let lang = language.unwrap_or(&self.config.default_language);

        // If a specific provider is requested, use only that one
        if let Some(preferred) = preferred_provider {
            for provider in &self.providers {
                if provider.provider_type() == preferred {
                    if provider.is_available().await {
                        return provider.recognize(image_data, Some(lang)).await;
                    } else {
                        return Err(OcrError::ProviderNotAvailable(format!(
                            "{:?} provider is not available",
                            preferred
                        )));
                    }
                }
            }
            return Err(OcrError::ProviderNotAvailable(format!(
                "{:?} provider is not configured",
                preferred
            )));
        }

        // Try providers in order
        let mut last_error = None;
        for provider in &self.providers {
            if provider.is_available().await {
                match provider.recognize(image_data, Some(lang)).await {
                    Ok(result) => return Ok(result),
                    Err(e) => {
                        tracing::warn!(
                            "OCR provider {:?} failed: {}, trying next",
                            provider.provider_type(),
                            e
                        );
                        last_error = Some(e);
                        continue;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            OcrError::ProviderNotAvailable("No OCR providers available".to_string())
        }))
    }
}
