//! Session data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::PartialPage;

/// Number of characters shown as the context preview
pub const PREVIEW_CHARS: usize = 400;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Upload lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadState {
    #[default]
    NoFile,
    FileSelected,
    PasswordPrompted,
    ContextLoaded,
    Failed,
}

/// Read-only snapshot of a session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub state: UploadState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Context length in characters
    pub context_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Name of the document waiting for a password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_file_name: Option<String>,
    pub busy: bool,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// Result of driving one extraction through a session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub state: UploadState,
    pub file_name: String,
    /// The bot message appended for this attempt
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partial_pages: Vec<PartialPage>,
}
