//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::extract::Extractor;
use crate::ocr::OcrService;
use crate::pdf::{MupdfEngine, PdfEngine};
use crate::session::SessionManager;
use crate::transport::{ChatTransport, HttpChatTransport, TransportError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    sessions: SessionManager,
    extractor: Extractor,
    transport: Arc<dyn ChatTransport>,
}

impl AppState {
    /// Create the production state: MuPDF, configured OCR providers and the
    /// HTTP chat backend
    pub fn new(config: Config) -> Result<Self, TransportError> {
        let transport = HttpChatTransport::new(&config.chat.backend_url, config.chat_timeout())?;
        let ocr = OcrService::new(config.ocr_service_config());

        Ok(Self::with_parts(
            config,
            Arc::new(MupdfEngine::new()),
            Arc::new(ocr),
            Arc::new(transport),
        ))
    }

    /// Create a state from explicit components
    pub fn with_parts(
        config: Config,
        pdf: Arc<dyn PdfEngine>,
        ocr: Arc<OcrService>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        let extractor = Extractor::new(pdf, ocr, config.extractor_config());
        let sessions = SessionManager::new(config.session.idle_minutes);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                sessions,
                extractor,
                transport,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the session manager
    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    /// Get the document extractor
    pub fn extractor(&self) -> &Extractor {
        &self.inner.extractor
    }

    /// Get the chat transport
    pub fn transport(&self) -> Arc<dyn ChatTransport> {
        self.inner.transport.clone()
    }
}
