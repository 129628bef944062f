//! Configuration management for the document chat server

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::extract::ExtractorConfig;
use crate::ocr::{OcrProvider, OcrServiceConfig};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub chat: ChatConfig,
    pub ocr: OcrConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upload size limit in megabytes
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of the chat backend (`/query` is appended)
    pub backend_url: String,
    /// Request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub providers: Vec<OcrProvider>,
    pub ollama_url: String,
    pub ollama_model: String,
    pub language: String,
    pub render_scale: f32,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Idle time before a session is dropped
    pub idle_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_upload_mb: 50,
            },
            chat: ChatConfig {
                backend_url: "http://localhost:8000".to_string(),
                timeout_secs: None,
            },
            ocr: OcrConfig {
                providers: vec![OcrProvider::Tesseract, OcrProvider::Ollama],
                ollama_url: "http://localhost:11434".to_string(),
                ollama_model: "llava".to_string(),
                language: "eng".to_string(),
                render_scale: 2.0,
            },
            session: SessionConfig { idle_minutes: 120 },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Config {
            server: ServerConfig {
                host: var("SERVER_HOST", &defaults.server.host),
                port: parse_or(&lookup, "SERVER_PORT", defaults.server.port),
                max_upload_mb: parse_or(&lookup, "MAX_UPLOAD_MB", defaults.server.max_upload_mb),
            },
            chat: ChatConfig {
                backend_url: var("CHAT_BACKEND_URL", &defaults.chat.backend_url),
                timeout_secs: lookup("CHAT_TIMEOUT_SECS").and_then(|raw| match raw.trim().parse() {
                    Ok(secs) => Some(secs),
                    Err(_) => {
                        tracing::warn!("Invalid CHAT_TIMEOUT_SECS {:?}, no timeout will be used", raw);
                        None
                    }
                }),
            },
            ocr: OcrConfig {
                providers: lookup("OCR_PROVIDERS")
                    .map(|raw| parse_providers(&raw))
                    .unwrap_or(defaults.ocr.providers),
                ollama_url: var("OLLAMA_URL", &defaults.ocr.ollama_url),
                ollama_model: var("OLLAMA_MODEL", &defaults.ocr.ollama_model),
                language: var("OCR_LANGUAGE", &defaults.ocr.language),
                render_scale: parse_or(&lookup, "OCR_RENDER_SCALE", defaults.ocr.render_scale),
            },
            session: SessionConfig {
                idle_minutes: parse_or(&lookup, "SESSION_IDLE_MINUTES", defaults.session.idle_minutes),
            },
        }
    }

    /// Upload size limit in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn chat_timeout(&self) -> Option<Duration> {
        self.chat.timeout_secs.map(Duration::from_secs)
    }

    pub fn ocr_service_config(&self) -> OcrServiceConfig {
        OcrServiceConfig {
            providers: self.ocr.providers.clone(),
            ollama_url: self.ocr.ollama_url.clone(),
            ollama_model: self.ocr.ollama_model.clone(),
            default_language: self.ocr.language.clone(),
        }
    }

    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            render_scale: self.ocr.render_scale,
            ocr_language: self.ocr.language.clone(),
        }
    }
}

/// Parse a numeric variable, falling back to `default` with a warning
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {} {:?}, using default {}", key, raw, default);
            default
        }),
    }
}

/// Comma-separated provider names; unknown names are skipped
fn parse_providers(raw: &str) -> Vec<OcrProvider> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| {
            let provider = OcrProvider::from_name(name);
            if provider.is_none() {
                tracing::warn!("Unknown OCR provider {:?} ignored", name);
            }
            provider
        })
        .collect()
}
