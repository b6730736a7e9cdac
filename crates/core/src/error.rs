//! Error types for the MailPilot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for MailPilot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Mail service errors ---
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures reported by a [`MailService`](crate::mail::MailService).
///
/// The tool dispatcher turns every one of these into tool output text, so
/// the `Display` form is what the model ends up reading.
#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error("Email not found: {0}")]
    NotFound(String),

    #[error("Mail service rejected credentials: {0}")]
    Unauthorized(String),

    #[error("Mail API request failed: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected mail API response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn mail_error_displays_correctly() {
        let err = MailError::NotFound("18c2f".into());
        assert_eq!(err.to_string(), "Email not found: 18c2f");

        let err = Error::from(MailError::Api {
            status: 500,
            message: "backend error".into(),
        });
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("backend error"));
    }
}
