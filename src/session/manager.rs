//! Session Manager
//!
//! Keeps conversation sessions in memory:
//! - `tokio::sync::RwLock` map, never held across extraction or chat calls
//! - per-session busy flag against overlapping operations
//! - extraction and chat calls run on their own task, so a dropped request
//!   still finishes the operation and clears the busy flag
//! - idle expiry cleanup

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::conversation::ConversationSession;
use super::error::SessionError;
use super::types::{SessionView, UploadOutcome};
use crate::document::Document;
use crate::extract::Extractor;
use crate::transport::ChatTransport;

// ============================================================================
// Session Manager
// ============================================================================

/// Manages conversation sessions
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

struct SessionManagerInner {
    /// Sessions indexed by ID
    sessions: RwLock<HashMap<Uuid, ConversationSession>>,

    /// Idle time after which a session is dropped
    idle_timeout: chrono::Duration,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(idle_minutes: i64) -> Self {
        Self {
            inner: Arc::new(SessionManagerInner {
                sessions: RwLock::new(HashMap::new()),
                idle_timeout: chrono::Duration::minutes(idle_minutes),
            }),
        }
    }

    /// Run `f` on a session under the write lock
    async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ConversationSession) -> T,
    ) -> Result<T, SessionError> {
        let mut sessions = self.inner.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        Ok(f(session))
    }

    /// Run the second half of an operation on its own task and wait for it
    ///
    /// If the task dies, the session is released instead of staying busy.
    async fn run_detached<T, F>(&self, id: Uuid, work: F) -> Result<T, SessionError>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, SessionError>> + Send + 'static,
    {
        match tokio::spawn(work).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(session_id = %id, "Session task failed: {}", e);
                self.with_session(id, ConversationSession::abort_operation)
                    .await?;
                Err(SessionError::Interrupted(e.to_string()))
            }
        }
    }

    // ========================================================================
    // Session Lifecycle
    // ========================================================================

    /// Create a new session
    pub async fn create(&self) -> Uuid {
        let session = ConversationSession::new();
        let id = session.id();

        self.inner.sessions.write().await.insert(id, session);

        tracing::info!(session_id = %id, "Created conversation session");
        id
    }

    /// Snapshot of a session
    pub async fn snapshot(&self, id: Uuid) -> Result<SessionView, SessionError> {
        let sessions = self.inner.sessions.read().await;
        sessions
            .get(&id)
            .map(ConversationSession::view)
            .ok_or(SessionError::NotFound(id))
    }

    /// Remove a session
    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        let removed = self.inner.sessions.write().await.remove(&id);
        match removed {
            Some(_) => {
                tracing::info!(session_id = %id, "Removed conversation session");
                Ok(())
            }
            None => Err(SessionError::NotFound(id)),
        }
    }

    /// Get session count
    pub async fn session_count(&self) -> usize {
        self.inner.sessions.read().await.len()
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Select a document and extract it without a password
    pub async fn upload(
        &self,
        id: Uuid,
        document: Document,
        extractor: &Extractor,
    ) -> Result<UploadOutcome, SessionError> {
        self.with_session(id, |s| s.select_document(document.clone()))
            .await??;

        let manager = self.clone();
        let extractor = extractor.clone();
        self.run_detached(id, async move {
            let result = extractor.extract(&document, None).await;
            manager
                .with_session(id, |s| s.apply_extraction(&document, false, result))
                .await
        })
        .await
    }

    /// Retry the pending document with a password
    pub async fn submit_password(
        &self,
        id: Uuid,
        password: &str,
        extractor: &Extractor,
    ) -> Result<UploadOutcome, SessionError> {
        let document = self
            .with_session(id, |s| s.begin_password_retry(password))
            .await??;

        let manager = self.clone();
        let extractor = extractor.clone();
        let password = password.to_string();
        self.run_detached(id, async move {
            let result = extractor.extract(&document, Some(&password)).await;
            manager
                .with_session(id, |s| s.apply_extraction(&document, true, result))
                .await
        })
        .await
    }

    /// Clear the document context
    pub async fn clear_context(&self, id: Uuid) -> Result<SessionView, SessionError> {
        self.with_session(id, |s| {
            s.clear_context();
            s.view()
        })
        .await
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// Send a chat message; returns the bot reply text
    pub async fn send_message(
        &self,
        id: Uuid,
        input: &str,
        transport: Arc<dyn ChatTransport>,
    ) -> Result<String, SessionError> {
        let prompt = self.with_session(id, |s| s.begin_turn(input)).await??;

        let manager = self.clone();
        self.run_detached(id, async move {
            let reply = transport.query(&prompt).await;
            manager.with_session(id, |s| s.finish_turn(reply)).await
        })
        .await
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    /// Remove sessions idle for longer than the configured timeout
    ///
    /// Returns the number of sessions removed
    pub async fn cleanup_expired(&self) -> usize {
        let cutoff = Utc::now() - self.inner.idle_timeout;

        let mut sessions = self.inner.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = session.is_busy() || session.last_active() >= cutoff;
            if !keep {
                tracing::debug!(session_id = %id, "Cleaned up idle session");
            }
            keep
        });
        let count = before - sessions.len();

        if count > 0 {
            tracing::info!(count = count, "Cleaned up idle conversation sessions");
        }

        count
    }

    /// Start background cleanup task
    pub fn start_cleanup_task(self, period: std::time::Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);

            loop {
                interval.tick().await;
                self.cleanup_expired().await;
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
