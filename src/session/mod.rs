//! Conversation sessions
//!
//! A session holds the chat history, the context extracted from the last
//! successfully loaded document, and the upload state machine:
//!
//! ```text
//! NoFile -> FileSelected -> ContextLoaded
//!                        -> PasswordPrompted -> (retry) -> ContextLoaded
//! any    -> Failed
//! ```

mod conversation;
mod error;
mod manager;
mod types;

pub use conversation::ConversationSession;
pub use error::SessionError;
pub use manager::SessionManager;
pub use types::{Message, Role, SessionView, UploadOutcome, UploadState, PREVIEW_CHARS};
