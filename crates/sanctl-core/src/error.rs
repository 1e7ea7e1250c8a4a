// ── Core error types ──
//
// User-facing errors from sanctl-core. These are NOT transport-specific --
// consumers never see raw HTTP status codes or JSON parse failures.
// The `From<sanctl_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to array at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Timed out: {message}")]
    Timeout { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Job failed: {message}")]
    JobFailed { message: String },

    /// The resize saga failed after the split step. There is no
    /// automatic rollback -- the pair is reported exactly as it was
    /// left so the operator can resync once the cause is fixed.
    #[error("Pair {pair} is left split after a failed resize: {message}")]
    PairLeftSplit { pair: String, message: String },

    #[error("{entity} '{identifier}' not found")]
    NotFound { entity: String, identifier: String },

    #[error("Operation rejected by controller: {message}")]
    Rejected { message: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sanctl_api::Error> for CoreError {
    fn from(err: sanctl_api::Error) -> Self {
        match err {
            sanctl_api::Error::Authentication { endpoint, message } => {
                CoreError::AuthenticationFailed {
                    message: format!("{endpoint}: {message}"),
                }
            }
            sanctl_api::Error::Timeout { message } => CoreError::Timeout { message },
            sanctl_api::Error::JobFailed { message } => CoreError::JobFailed { message },
            sanctl_api::Error::Request { status: 404, message } => CoreError::NotFound {
                entity: "resource".into(),
                identifier: message,
            },
            sanctl_api::Error::Request { status, message } => CoreError::Rejected {
                message: format!("{message} (HTTP {status})"),
            },
            sanctl_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout {
                        message: e.to_string(),
                    }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::OperationFailed {
                        message: e.to_string(),
                    }
                }
            }
            sanctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sanctl_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            sanctl_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
