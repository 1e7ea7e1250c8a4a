//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sanctl_config::ConfigError;
use sanctl_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const JOB_FAILED: i32 = 5;
    pub const PAIR_STATE: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to array at {url}: {reason}")]
    #[diagnostic(
        code(sanctl::connection_failed),
        help("Check that the service processor is reachable.\nURL: {url}")
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(sanctl::auth_failed),
        help(
            "Verify the username/password for the array, or set a token\n\
             via the profile's token_env variable."
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(sanctl::no_credentials),
        help("Add username/password to the profile or set SANCTL_USERNAME / SANCTL_PASSWORD.")
    )]
    NoCredentials { profile: String },

    #[error("Profile '{profile}' has no secondary array configured")]
    #[diagnostic(
        code(sanctl::no_secondary),
        help("Replication commands need a [profiles.{profile}.secondary] block with the other array's address and credentials.")
    )]
    NoSecondary { profile: String },

    // ── Resources / operations ───────────────────────────────────────
    #[error("{entity} '{identifier}' not found")]
    #[diagnostic(code(sanctl::not_found))]
    NotFound { entity: String, identifier: String },

    #[error("Job failed: {message}")]
    #[diagnostic(code(sanctl::job_failed))]
    JobFailed { message: String },

    #[error("Pair {pair} is left split: {message}")]
    #[diagnostic(
        code(sanctl::pair_left_split),
        help("The resize stopped after the split step. Fix the cause, then run `sanctl pair resync`.")
    )]
    PairLeftSplit { pair: String, message: String },

    #[error("Operation rejected by controller: {message}")]
    #[diagnostic(code(sanctl::rejected))]
    Rejected { message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(sanctl::api_error))]
    ApiError { message: String },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sanctl::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(sanctl::no_config),
        help("Create one at: {path}\nOr pass --array/--username and the password env var.")
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(sanctl::config))]
    Config(Box<figment::Error>),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Timed out: {message}")]
    #[diagnostic(
        code(sanctl::timeout),
        help("Increase --timeout, or check controller responsiveness and job backlog.")
    )]
    Timeout { message: String },

    // ── IO / serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(sanctl::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::JobFailed { .. } => exit_code::JOB_FAILED,
            Self::PairLeftSplit { .. } => exit_code::PAIR_STATE,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoSecondary { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout { message } => CliError::Timeout { message },
            CoreError::JobFailed { message } => CliError::JobFailed { message },
            CoreError::PairLeftSplit { pair, message } => {
                CliError::PairLeftSplit { pair, message }
            }
            CoreError::NotFound { entity, identifier } => {
                CliError::NotFound { entity, identifier }
            }
            CoreError::Rejected { message } => CliError::Rejected { message },
            CoreError::OperationFailed { message } => CliError::ApiError { message },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::ApiError { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::NoSecondary { profile } => CliError::NoSecondary { profile },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
