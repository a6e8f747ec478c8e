//! Report Error Types

use crate::core::error_handling::ContextualError;

/// Failure to serialize or persist a report
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to serialize report: {message}")]
    Serialize { message: String },

    #[error("Failed to write report to {path}: {message}")]
    Io { path: String, message: String },
}

impl ContextualError for ReportError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, ReportError::Io { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ReportError::Io { message, .. } => Some(message),
            ReportError::Serialize { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(error: serde_json::Error) -> Self {
        ReportError::Serialize {
            message: error.to_string(),
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
