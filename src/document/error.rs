//! Extraction error types
//!
//! Document-level failures returned by the extractor. Per-page problems are
//! not errors; they are recorded as [`PartialPage`](super::PartialPage) notes.

use thiserror::Error;

use super::types::ExtractedText;

/// Document-level extraction failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The PDF is encrypted and no usable password was supplied.
    ///
    /// A wrong password and a missing password both end up here.
    #[error("Password required for this PDF")]
    PasswordRequired,

    /// Malformed or unreadable input
    #[error("Corrupt document: {0}")]
    Corrupt(String),

    /// Not a PDF, DOCX or text document
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
}

impl ExtractionError {
    /// Whether retrying with a password may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::PasswordRequired)
    }

    /// Description shown to the person who uploaded the file
    pub fn user_message(&self) -> String {
        match self {
            Self::PasswordRequired => self.to_string(),
            Self::Corrupt(reason) => reason.clone(),
            Self::UnsupportedType(_) => {
                "Unsupported file type. Please upload PDF, DOCX, or TXT.".to_string()
            }
        }
    }
}

/// Result of extracting one document
pub type ExtractionResult = std::result::Result<ExtractedText, ExtractionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_password_is_recoverable() {
        assert!(ExtractionError::PasswordRequired.is_recoverable());
        assert!(!ExtractionError::Corrupt("bad xref".into()).is_recoverable());
        assert!(!ExtractionError::UnsupportedType("image/png".into()).is_recoverable());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            ExtractionError::PasswordRequired.user_message(),
            "Password required for this PDF"
        );
        assert_eq!(
            ExtractionError::UnsupportedType("image/png".into()).user_message(),
            "Unsupported file type. Please upload PDF, DOCX, or TXT."
        );
        assert_eq!(
            ExtractionError::Corrupt("invalid zip archive".into()).user_message(),
            "invalid zip archive"
        );
    }
}
