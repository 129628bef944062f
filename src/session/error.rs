use thiserror::Error;
use uuid::Uuid;

/// Session errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(Uuid),

    #[error("Message is empty")]
    EmptyInput,

    #[error("Password is empty")]
    EmptyPassword,

    #[error("No document is waiting for a password")]
    NoPendingDocument,

    #[error("Session is busy with another request")]
    Busy,

    #[error("Request was interrupted: {0}")]
    Interrupted(String),
}
