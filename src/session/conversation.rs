//! Conversation Session
//!
//! One user's chat: message history, the loaded document context, and the
//! upload state machine. All methods are synchronous; callers that await
//! (extraction, the chat transport) use the split begin/finish methods so
//! no lock is needed across the await.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::SessionError;
use super::types::{Message, Role, SessionView, UploadOutcome, UploadState, PREVIEW_CHARS};
use crate::document::{Document, ExtractionResult};
use crate::transport::{ChatTransport, TransportError};

const CONTEXT_CLEARED: &str = "🧹 Context cleared. You can upload a new document.";
const PASSWORD_PROMPT: &str = "🔒 This PDF requires a password. Please submit it to process the file.";
const INTERRUPTED: &str = "❌ The request was interrupted. Please try again.";

/// A single conversation
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: Uuid,
    state: UploadState,
    context: Option<String>,
    preview: Option<String>,
    file_name: Option<String>,
    /// Document waiting for a password
    pending: Option<Document>,
    messages: Vec<Message>,
    busy: bool,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            state: UploadState::NoFile,
            context: None,
            preview: None,
            file_name: None,
            pending: None,
            messages: Vec::new(),
            busy: false,
            created_at: now,
            last_active: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn pending_document(&self) -> Option<&Document> {
        self.pending.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Snapshot for API responses
    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            state: self.state,
            file_name: self.file_name.clone(),
            context_length: self.context.as_deref().map_or(0, |c| c.chars().count()),
            preview: self.preview.clone(),
            pending_file_name: self.pending.as_ref().map(|d| d.file_name().to_string()),
            busy: self.busy,
            messages: self.messages.clone(),
            created_at: self.created_at,
            last_active: self.last_active,
        }
    }

    // ========================================================================
    // Context
    // ========================================================================

    /// Replace the document context
    pub fn set_context(&mut self, file_name: impl Into<String>, text: String) {
        self.preview = Some(text.chars().take(PREVIEW_CHARS).collect());
        self.context = Some(text);
        self.file_name = Some(file_name.into());
        self.state = UploadState::ContextLoaded;
        self.touch();
    }

    /// Drop the context and any document waiting for a password
    pub fn clear_context(&mut self) {
        self.context = None;
        self.preview = None;
        self.file_name = None;
        self.pending = None;
        self.state = UploadState::NoFile;
        self.append_bot_message(CONTEXT_CLEARED);
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub fn append_user_message(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
        self.touch();
    }

    pub fn append_bot_message(&mut self, text: impl Into<String>) {
        self.messages.push(Message::bot(text));
        self.touch();
    }

    /// Prompt sent to the backend for `input`
    pub fn compose_prompt(&self, input: &str) -> String {
        match self.context.as_deref() {
            Some(context) if !context.is_empty() => format!("{}\n\n{}", context, input),
            _ => input.to_string(),
        }
    }

    /// Start a chat turn: records the user message and returns the prompt
    pub fn begin_turn(&mut self, input: &str) -> Result<String, SessionError> {
        if input.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if self.busy {
            return Err(SessionError::Busy);
        }

        let prompt = self.compose_prompt(input);
        self.append_user_message(input);
        self.busy = true;

        tracing::debug!(
            session_id = %self.id,
            context_chars = self.context.as_deref().map_or(0, |c| c.chars().count()),
            prompt_chars = prompt.chars().count(),
            "Starting chat turn"
        );

        Ok(prompt)
    }

    /// Finish a chat turn; returns the appended bot text
    pub fn finish_turn(&mut self, reply: Result<String, TransportError>) -> String {
        self.busy = false;

        let text = match reply {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(session_id = %self.id, "Backend error: {}", e);
                format!("❌ Backend error: {}", e)
            }
        };

        self.append_bot_message(text.clone());
        text
    }

    /// Run a whole chat turn against a transport
    pub async fn send_message(
        &mut self,
        input: &str,
        transport: &dyn ChatTransport,
    ) -> Result<String, SessionError> {
        let prompt = self.begin_turn(input)?;
        let reply = transport.query(&prompt).await;
        Ok(self.finish_turn(reply))
    }

    // ========================================================================
    // Uploads
    // ========================================================================

    /// A new file was selected; extraction without a password follows
    pub fn select_document(&mut self, document: Document) -> Result<(), SessionError> {
        if self.busy {
            return Err(SessionError::Busy);
        }

        tracing::info!(
            session_id = %self.id,
            file_name = %document.file_name(),
            size = document.len(),
            "Document selected"
        );

        self.pending = Some(document);
        self.state = UploadState::FileSelected;
        self.busy = true;
        self.touch();
        Ok(())
    }

    /// Start a password retry; returns the document to extract again
    pub fn begin_password_retry(&mut self, password: &str) -> Result<Document, SessionError> {
        if password.trim().is_empty() {
            return Err(SessionError::EmptyPassword);
        }
        if self.busy {
            return Err(SessionError::Busy);
        }

        let document = self.pending.clone().ok_or(SessionError::NoPendingDocument)?;
        self.busy = true;
        self.touch();
        Ok(document)
    }

    /// Apply an extraction result for `document`
    pub fn apply_extraction(
        &mut self,
        document: &Document,
        password_supplied: bool,
        result: ExtractionResult,
    ) -> UploadOutcome {
        self.busy = false;
        let name = document.file_name();

        let mut outcome = UploadOutcome {
            state: UploadState::Failed,
            file_name: name.to_string(),
            message: String::new(),
            character_count: None,
            page_count: None,
            partial_pages: Vec::new(),
        };

        match result {
            Ok(extracted) if !extracted.is_blank() => {
                let count = extracted.char_count();
                outcome.message = format!(
                    "✅ Successfully loaded \"{}\" ({} characters). You can now ask questions about this document!",
                    name, count
                );
                outcome.character_count = Some(count);
                outcome.page_count = extracted.page_count;
                outcome.partial_pages = extracted.partial_pages;

                self.pending = None;
                self.set_context(name, extracted.text);
                outcome.state = UploadState::ContextLoaded;
            }
            Ok(_) => {
                outcome.message = format!(
                    "⚠️ The file \"{}\" appears to be empty or couldn't be processed.",
                    name
                );
                self.fail_upload();
            }
            Err(e) if e.is_recoverable() => {
                outcome.message = if password_supplied {
                    format!("❌ File processing error: {}", e.user_message())
                } else {
                    PASSWORD_PROMPT.to_string()
                };
                self.pending = Some(document.clone());
                self.state = UploadState::PasswordPrompted;
                outcome.state = UploadState::PasswordPrompted;
            }
            Err(e) => {
                outcome.message = format!("❌ File processing error: {}", e.user_message());
                self.fail_upload();
            }
        }

        self.append_bot_message(outcome.message.clone());

        tracing::info!(
            session_id = %self.id,
            file_name = %name,
            state = ?self.state,
            "Upload processed"
        );

        outcome
    }

    /// The upload failed; an earlier context, if any, stays usable
    fn fail_upload(&mut self) {
        self.pending = None;
        self.state = if self.context.is_some() {
            UploadState::ContextLoaded
        } else {
            UploadState::Failed
        };
    }

    /// Release the session after its extraction or chat task died
    pub fn abort_operation(&mut self) {
        self.busy = false;
        if self.state == UploadState::FileSelected {
            self.fail_upload();
        }
        self.append_bot_message(INTERRUPTED);
    }

    /// Number of messages by role
    pub fn message_count(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}
