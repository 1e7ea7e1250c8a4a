//! Client construction shared by the command handlers.

use std::sync::Arc;

use sanctl_core::{ArrayClient, AuditLog, PairManager, SessionStore};

use crate::config::ResolvedProfile;
use crate::error::CliError;

/// Build a client for the local array only.
pub fn local_client(resolved: &ResolvedProfile) -> Result<ArrayClient, CliError> {
    Ok(ArrayClient::from_config(
        &resolved.local,
        Arc::new(SessionStore::new()),
    )?)
}

/// Build a `PairManager` spanning both arrays.
///
/// Both clients share one session store so each address keeps exactly
/// one live session for the lifetime of the command.
pub fn pair_manager(resolved: ResolvedProfile) -> Result<PairManager, CliError> {
    let secondary_config = resolved.secondary.ok_or(CliError::NoSecondary {
        profile: resolved.profile_name,
    })?;

    let sessions = Arc::new(SessionStore::new());
    let local = ArrayClient::from_config(&resolved.local, Arc::clone(&sessions))?;
    let secondary = ArrayClient::from_config(&secondary_config, sessions)?;

    let mut manager = PairManager::new(local, secondary);
    if let Some(path) = resolved.audit_log {
        manager = manager.with_audit(AuditLog::to_file(path));
    }
    Ok(manager)
}
