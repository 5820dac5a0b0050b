use thiserror::Error;

use crate::domain::MAX_FILE_SIZE_MB;

/// Everything the controller can surface to the user. Request failures
/// render with the failing operation's name so the UI can show them
/// verbatim in its single error slot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScribeError {
    #[error("File is larger than the {limit_mb} MB upload limit.")]
    FileTooLarge { limit_mb: usize },
    #[error("Please select an audio file first.")]
    NoFileSelected,
    #[error("Transcription failed: {0}")]
    TranscriptionRequestFailed(String),
    #[error("Grammar fix failed: {0}")]
    GrammarFixRequestFailed(String),
    #[error("clipboard write failed: {0}")]
    ClipboardWriteFailed(String),
}

impl ScribeError {
    pub fn file_too_large() -> Self {
        Self::FileTooLarge {
            limit_mb: MAX_FILE_SIZE_MB,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_too_large_names_the_limit() {
        assert_eq!(
            ScribeError::file_too_large().to_string(),
            "File is larger than the 25 MB upload limit."
        );
    }

    #[test]
    fn request_failures_are_prefixed_with_the_operation() {
        assert_eq!(
            ScribeError::TranscriptionRequestFailed("Server-side failure.".into()).to_string(),
            "Transcription failed: Server-side failure."
        );
        assert_eq!(
            ScribeError::GrammarFixRequestFailed("quota exceeded".into()).to_string(),
            "Grammar fix failed: quota exceeded"
        );
    }
}
