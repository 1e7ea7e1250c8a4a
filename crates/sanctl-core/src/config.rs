// ── Runtime connection configuration ──
//
// These types describe *how* to connect to an array controller. They
// carry credential data and connection tuning, but never touch disk.
// The CLI constructs an `ArrayConfig` per array and hands it in.

use secrecy::SecretString;
use url::Url;

/// How to authenticate with an array controller.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// Username/password, exchanged for a session token on first use.
    Credentials {
        username: String,
        password: SecretString,
    },
    /// Pre-issued token, sent as-is on every call. Never renewed.
    Token(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. Default -- array service processors ship
    /// self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Which REST generation the controller speaks. Decides the job-status
/// dialect used when polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiGeneration {
    /// First-generation firmware (`progress`/`status` job fields).
    V1,
    /// Current firmware (`status`/`state` job fields).
    #[default]
    V2,
}

/// Configuration for connecting to a single array.
///
/// Built by the CLI from profiles and flags, passed to `ArrayClient` --
/// core never reads config files.
#[derive(Debug, Clone)]
pub struct ArrayConfig {
    /// Management URL (e.g., `https://array1.example.com`).
    pub url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-call socket timeout.
    pub timeout: std::time::Duration,
    /// REST generation of the controller.
    pub generation: ApiGeneration,
    /// Storage device id, if known. Looked up from the array when absent;
    /// profiles usually pin it to save a round trip.
    pub serial: Option<String>,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            url: "https://192.168.1.100".parse().unwrap(),
            auth: AuthCredentials::Credentials {
                username: "maintenance".into(),
                password: SecretString::from(String::new()),
            },
            tls: TlsVerification::default(),
            timeout: std::time::Duration::from_secs(300),
            generation: ApiGeneration::default(),
            serial: None,
        }
    }
}
