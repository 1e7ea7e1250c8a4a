use thiserror::Error;

/// Top-level error type for the `sanctl-api` crate.
///
/// Covers every failure mode of the transport core: session creation,
/// authenticated calls, retry exhaustion, and asynchronous job completion.
/// `sanctl-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Session creation against an endpoint failed (bad credentials,
    /// unreachable host, wrong address).
    #[error("Authentication against {endpoint} failed: {message}")]
    Authentication { endpoint: String, message: String },

    // ── Requests ────────────────────────────────────────────────────
    /// Non-2xx response that was not recoverable by retry.
    /// Carries the decoded message/cause/solution when the body had them.
    #[error("Request failed (HTTP {status}): {message}")]
    Request { status: u16, message: String },

    /// Socket-level timeout, or a job that did not reach a terminal
    /// state within the polling budget. Fatal; never retried here.
    #[error("Timed out: {message}")]
    Timeout { message: String },

    /// The asynchronous job reached a failure or cancel terminal state.
    /// The message is composed from every error field the job reported.
    #[error("Job failed: {message}")]
    JobFailed { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient condition that a fresh call
    /// might clear (the connection itself already spent its own budget).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Request { status, .. } => *status == 503,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Request { status: 404, .. } => true,
            _ => false,
        }
    }
}
