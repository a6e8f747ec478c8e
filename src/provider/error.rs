//! Provider Error Types

use crate::core::retry::Transient;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Rate limited (HTTP {status}): {message}")]
    RateLimited { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Invalid response: {message}")]
    Decode { message: String },
}

impl ProviderError {
    /// HTTP-style status of the failure, 0 when no response was received
    pub fn status(&self) -> u16 {
        match self {
            ProviderError::Http { status, .. } | ProviderError::RateLimited { status, .. } => {
                *status
            }
            ProviderError::Network { .. } | ProviderError::Decode { .. } => 0,
        }
    }
}

impl Transient for ProviderError {
    fn is_transient(&self) -> bool {
        match self {
            ProviderError::Network { .. } => true,
            ProviderError::Http { status, .. } => *status >= 500,
            ProviderError::RateLimited { .. } | ProviderError::Decode { .. } => false,
        }
    }
}

/// Result type for provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;
