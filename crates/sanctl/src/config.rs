//! Profile resolution for the CLI: config file + flags + env vars.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use sanctl_config as cfg;
use sanctl_core::{ApiGeneration, ArrayConfig, AuthCredentials, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a command needs to build its clients.
pub struct ResolvedProfile {
    pub local: ArrayConfig,
    pub secondary: Option<ArrayConfig>,
    pub audit_log: Option<PathBuf>,
    pub profile_name: String,
}

/// The profile name the CLI operates on.
pub fn active_profile_name(global: &GlobalOpts, config: &cfg::Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Resolve the active profile with CLI flag overrides, falling back to
/// flags/env alone when no profile exists.
pub fn resolve(global: &GlobalOpts) -> Result<ResolvedProfile, CliError> {
    let config = cfg::load_config_or_default();
    let profile_name = active_profile_name(global, &config);

    if let Some(profile) = config.profiles.get(&profile_name) {
        let mut local = cfg::profile_to_array_config(profile, &profile_name)?;
        let secondary = match profile.secondary {
            Some(_) => Some(cfg::profile_to_secondary_config(profile, &profile_name)?),
            None => None,
        };
        apply_overrides(&mut local, global);
        return Ok(ResolvedProfile {
            local,
            secondary,
            audit_log: profile.audit_log.clone(),
            profile_name,
        });
    }

    // No profile -- build from flags / env vars alone.
    let url_str = global.array.as_deref().ok_or_else(|| CliError::NoConfig {
        path: cfg::config_path().display().to_string(),
    })?;

    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "array".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let auth = match (&global.username, &global.password) {
        (Some(username), Some(password)) => AuthCredentials::Credentials {
            username: username.clone(),
            password: SecretString::from(password.clone()),
        },
        _ => {
            return Err(CliError::NoCredentials {
                profile: profile_name,
            });
        }
    };

    let mut local = ArrayConfig {
        url,
        auth,
        tls: TlsVerification::DangerAcceptInvalid,
        timeout: Duration::from_secs(300),
        generation: ApiGeneration::default(),
        serial: None,
    };
    apply_overrides(&mut local, global);

    Ok(ResolvedProfile {
        local,
        secondary: None,
        audit_log: None,
        profile_name,
    })
}

fn apply_overrides(config: &mut ArrayConfig, global: &GlobalOpts) {
    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(timeout) = global.timeout {
        config.timeout = Duration::from_secs(timeout);
    }
}
