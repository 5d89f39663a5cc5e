//! Error types for the CEC IoT MCP server
//!
//! Failures from the vendor API are classified into coarse categories so the
//! request layer can log them uniformly and callers can decide whether a
//! missing value is tolerable or a flow-level fault.

use thiserror::Error;

/// Result type alias for CEC operations
pub type Result<T> = std::result::Result<T, CecError>;

/// Error types for CEC cloud API operations
#[derive(Error, Debug)]
pub enum CecError {
    /// Connection, DNS or timeout failure before a response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the vendor API
    #[error("HTTP error [{status}] {url}")]
    HttpStatus { status: u16, url: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication errors (token endpoint rejected the credentials)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A composed flow received a response whose shape it cannot proceed with
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl CecError {
    /// Create a network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create an authentication error
    pub fn auth<S: Into<String>>(msg: S) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid-response error
    pub fn invalid_response<S: Into<String>>(msg: S) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Whether this failure happened before any response arrived
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_error_carries_status_and_url() {
        let err = CecError::HttpStatus {
            status: 500,
            url: "https://example.com/api".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("https://example.com/api"));
    }

    #[test]
    fn network_classification() {
        assert!(CecError::network("connection refused").is_network());
        assert!(!CecError::auth("bad key").is_network());
    }
}
