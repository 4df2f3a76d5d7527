// ── Core error types ──
//
// User-facing errors from schoolhub-core. Consumers never see raw HTTP
// or JSON failures; the `From<schoolhub_api::Error>` impl translates them
// into domain variants, keeping the backend's `message` when it sent one.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    /// The backend refused the operation and said why.
    #[error("{message}")]
    Rejected { message: String, status: u16 },

    #[error("Operation not supported: {operation} on {entity_type}")]
    Unsupported {
        operation: String,
        entity_type: String,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The backend's own wording, when the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Text for a notification: the server message if present, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_owned()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<schoolhub_api::Error> for CoreError {
    fn from(err: schoolhub_api::Error) -> Self {
        match err {
            schoolhub_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            schoolhub_api::Error::Api { status: 404, .. } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: "<unknown>".into(),
            },
            schoolhub_api::Error::Api {
                status,
                message: Some(message),
            } => CoreError::Rejected { message, status },
            schoolhub_api::Error::Api {
                status,
                message: None,
            } => CoreError::Api {
                message: format!("HTTP {status}"),
                status: Some(status),
            },
            schoolhub_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            schoolhub_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Base URL cannot carry paths: {url}"),
            },
            schoolhub_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            schoolhub_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            schoolhub_api::Error::Envelope { expected } => {
                CoreError::Internal(format!("Unexpected response shape: expected {expected}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_becomes_rejected() {
        let err = CoreError::from(schoolhub_api::Error::Api {
            status: 409,
            message: Some("Already approved".into()),
        });
        assert!(matches!(err, CoreError::Rejected { status: 409, .. }));
        assert_eq!(err.user_message("Failed to approve book request"), "Already approved");
    }

    #[test]
    fn bare_status_uses_fallback_message() {
        let err = CoreError::from(schoolhub_api::Error::Api {
            status: 500,
            message: None,
        });
        assert_eq!(err.user_message("Failed to load events"), "Failed to load events");
    }

    #[test]
    fn not_found_status_maps_to_not_found() {
        let err = CoreError::from(schoolhub_api::Error::Api {
            status: 404,
            message: None,
        });
        assert!(err.is_not_found());
    }
}
