//! Shared configuration for the sanctl CLI.
//!
//! TOML profiles, credential resolution (env + plaintext), and
//! translation to `sanctl_core::ArrayConfig`. A profile describes one
//! local array and, for replication work, an optional `secondary` block
//! with its own address and credentials.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sanctl_core::{ApiGeneration, ArrayConfig, AuthCredentials, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' has no secondary array configured")]
    NoSecondary { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named array profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    300
}

/// Credentials for one array, shared by the profile itself and its
/// `secondary` block.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ArrayEntry {
    /// Management URL (e.g., "https://array1.example.com").
    pub address: String,

    /// Username for session auth.
    pub username: Option<String>,

    /// Password (plaintext -- prefer the env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Environment variable name containing a pre-issued token.
    pub token_env: Option<String>,

    /// Storage device id, pinned to save a lookup round trip.
    pub serial: Option<String>,
}

/// A named array profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// The local array.
    #[serde(flatten)]
    pub array: ArrayEntry,

    /// The secondary array for replication operations.
    pub secondary: Option<ArrayEntry>,

    /// REST generation: "v1" or "v2".
    #[serde(default = "default_api")]
    pub api: String,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Audit log file path; absent disables audit logging.
    pub audit_log: Option<PathBuf>,
}

fn default_api() -> String {
    "v2".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "sanctl", "sanctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sanctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a Config from an explicit path (tests point this at a tempdir).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SANCTL_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve credentials for one array entry.
///
/// Order: token env var, password env var, plaintext password.
pub fn resolve_auth(entry: &ArrayEntry, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    if let Some(ref env_name) = entry.token_env {
        if let Ok(token) = std::env::var(env_name) {
            return Ok(AuthCredentials::Token(SecretString::from(token)));
        }
    }

    let username = entry
        .username
        .clone()
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    if let Some(ref env_name) = entry.password_env {
        if let Ok(pw) = std::env::var(env_name) {
            return Ok(AuthCredentials::Credentials {
                username,
                password: SecretString::from(pw),
            });
        }
    }

    if let Some(ref pw) = entry.password {
        return Ok(AuthCredentials::Credentials {
            username,
            password: SecretString::from(pw.clone()),
        });
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn parse_generation(profile: &Profile) -> Result<ApiGeneration, ConfigError> {
    match profile.api.as_str() {
        "v1" => Ok(ApiGeneration::V1),
        "v2" => Ok(ApiGeneration::V2),
        other => Err(ConfigError::Validation {
            field: "api".into(),
            reason: format!("expected 'v1' or 'v2', got '{other}'"),
        }),
    }
}

fn entry_to_array_config(
    entry: &ArrayEntry,
    profile: &Profile,
    profile_name: &str,
) -> Result<ArrayConfig, ConfigError> {
    let url: url::Url = entry.address.parse().map_err(|_| ConfigError::Validation {
        field: "address".into(),
        reason: format!("invalid URL: {}", entry.address),
    })?;

    let auth = resolve_auth(entry, profile_name)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::DangerAcceptInvalid // service processors are self-signed
    };

    Ok(ArrayConfig {
        url,
        auth,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(default_timeout())),
        generation: parse_generation(profile)?,
        serial: entry.serial.clone(),
    })
}

/// Build the local array's `ArrayConfig` from a profile.
pub fn profile_to_array_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ArrayConfig, ConfigError> {
    entry_to_array_config(&profile.array, profile, profile_name)
}

/// Build the secondary array's `ArrayConfig` from a profile.
///
/// Errors when the profile has no `secondary` block -- replication
/// commands require both sides.
pub fn profile_to_secondary_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ArrayConfig, ConfigError> {
    let entry = profile
        .secondary
        .as_ref()
        .ok_or_else(|| ConfigError::NoSecondary {
            profile: profile_name.into(),
        })?;
    entry_to_array_config(entry, profile, profile_name)
}
