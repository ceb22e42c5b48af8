#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use thiserror::Error;

pub const UPLOAD_FALLBACK_MESSAGE: &str = "Failed to upload";
pub const ANSWER_FALLBACK_MESSAGE: &str = "Failed to get a response from the server";

/// Failures an upload or a question can end in. None of these escape the
/// session: each one is folded into an upload state or an assistant turn.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Only PDF files are allowed.")]
    InvalidFileType(String),
    #[error("Request could not complete: {0}")]
    NetworkFailure(String),
    #[error("{0}")]
    BackendError(String),
    #[error("The backend returned a response without any usable detail.")]
    GenericFailure,
    #[error("Upload a PDF before asking questions.")]
    DocumentNotReady,
    #[error("An upload is already in progress.")]
    UploadInProgress,
    #[error("Still waiting on an answer to the previous question.")]
    QuestionPending,
    #[error("Unable to read {path}: {reason}")]
    FileRead { path: String, reason: String },
    #[error("Request cancelled.")]
    Cancelled,
}

impl ClientError {
    /// Message carried by a failed upload state.
    pub fn upload_message(&self) -> String {
        match self {
            ClientError::BackendError(detail) => return detail.to_string(),
            ClientError::NetworkFailure(_) | ClientError::GenericFailure => {
                return UPLOAD_FALLBACK_MESSAGE.to_string();
            }
            _ => return self.to_string(),
        }
    }

    /// Text of an errored assistant turn.
    pub fn answer_message(&self) -> String {
        let detail = match self {
            ClientError::BackendError(detail) => detail.to_string(),
            ClientError::NetworkFailure(_) | ClientError::GenericFailure => {
                ANSWER_FALLBACK_MESSAGE.to_string()
            }
            _ => self.to_string(),
        };

        return format!("Sorry, I encountered an error: {detail}");
    }
}
