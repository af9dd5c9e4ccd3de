//! CDP error types.

use pagechat_core::SessionError;
use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CdpError {
    /// The page's JavaScript context went away under a navigation, e.g. a
    /// login redirect. Lookups answer "nothing yet" until the next one exists.
    pub fn is_context_lost(&self) -> bool {
        const MESSAGES: [&str; 4] = [
            "Execution context was destroyed",
            "Cannot find default execution context",
            "Cannot find context with specified id",
            "Inspected target navigated or closed",
        ];
        match self {
            CdpError::Protocol { code: -32000, message } => {
                MESSAGES.iter().any(|m| message.contains(m))
            }
            _ => false,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::NavigationFailed(format!("Invalid URL: {}", e))
    }
}

impl From<CdpError> for SessionError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::NavigationFailed(message) => SessionError::Navigation(message),
            CdpError::Clipboard(message) => SessionError::Clipboard(message),
            CdpError::SessionClosed => SessionError::Closed,
            other => SessionError::Driver(other.to_string()),
        }
    }
}
