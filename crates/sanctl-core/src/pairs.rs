// ── Replication pair operations ──
//
// Everything that spans both arrays lives here: pair create / split /
// resync / swap / delete, plus the resize saga. All mutations are
// asynchronous on the wire -- the controller registers a job and the
// local array's poller drives it to terminal. Swap variants address the
// pair through `PairId::swapped()`; that transposition exists nowhere
// else.

use sanctl_api::{call_across, job, Method};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::array::ArrayClient;
use crate::audit::AuditLog;
use crate::error::CoreError;
use crate::model::{PairKind, ReplicationPair};
use crate::pair_id::PairId;

/// Collection path for cross-array replication pairs.
pub const PAIR_COLLECTION: &str = "v1/objects/remote-mirror-copypairs";

/// Request to create a replication pair.
#[derive(Debug, Clone)]
pub struct PairCreate {
    pub copy_group: String,
    pub pair_name: String,
    /// Defaults to `{copy_group}P_` when absent.
    pub local_device_group: Option<String>,
    /// Defaults to `{copy_group}S_` when absent.
    pub remote_device_group: Option<String>,
    pub pvol_ldev_id: i64,
    pub svol_ldev_id: i64,
    pub kind: PairKind,
}

/// Orchestrates pair operations across a local and a secondary array.
pub struct PairManager {
    local: ArrayClient,
    secondary: ArrayClient,
    audit: Option<AuditLog>,
}

impl PairManager {
    pub fn new(local: ArrayClient, secondary: ArrayClient) -> Self {
        Self {
            local,
            secondary,
            audit: None,
        }
    }

    /// Attach an audit log; mutating operations record through it.
    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn local(&self) -> &ArrayClient {
        &self.local
    }

    pub fn secondary(&self) -> &ArrayClient {
        &self.secondary
    }

    /// Build the canonical id for a pair in this manager's topology.
    pub async fn pair_id(
        &self,
        copy_group: &str,
        pair_name: &str,
        local_device_group: Option<String>,
        remote_device_group: Option<String>,
    ) -> Result<PairId, CoreError> {
        let serial = self.secondary.device_id().await?;
        Ok(PairId::new(
            serial,
            copy_group,
            pair_name,
            local_device_group,
            remote_device_group,
        ))
    }

    // ── Lifecycle operations ─────────────────────────────────────────

    /// Create a pair and wait for the copy job to register.
    pub async fn create(&self, spec: &PairCreate) -> Result<PairId, CoreError> {
        let id = self
            .pair_id(
                &spec.copy_group,
                &spec.pair_name,
                spec.local_device_group.clone(),
                spec.remote_device_group.clone(),
            )
            .await?;

        let body = json!({
            "copyGroupName": id.copy_group,
            "copyPairName": id.pair_name,
            "localDeviceGroupName": id.local_device_group,
            "remoteDeviceGroupName": id.remote_device_group,
            "remoteStorageDeviceId": id.remote_serial,
            "pvolLdevId": spec.pvol_ldev_id,
            "svolLdevId": spec.svol_ldev_id,
            "replicationType": spec.kind.to_string(),
        });

        self.execute_across(Method::POST, PAIR_COLLECTION, Some(&body))
            .await?;
        info!(pair = %id, "pair created");
        self.record("pair.create", &id);
        Ok(id)
    }

    /// Current state of a pair as the local array sees it.
    pub async fn status(&self, id: &PairId) -> Result<ReplicationPair, CoreError> {
        let raw = call_across(
            self.local.conn(),
            self.secondary.conn(),
            Method::GET,
            &format!("{PAIR_COLLECTION}/{id}"),
            None,
            false,
        )
        .await?;
        serde_json::from_value(raw)
            .map_err(|e| CoreError::Internal(format!("unexpected pair shape: {e}")))
    }

    /// Split (suspend) a pair. With `swap`, the secondary side takes
    /// over as primary and the pair is addressed by its swapped id.
    pub async fn split(&self, id: &PairId, swap: bool) -> Result<(), CoreError> {
        self.invoke_action(id, "split", swap).await
    }

    /// Resynchronize a split pair. With `swap`, copy direction reverses.
    pub async fn resync(&self, id: &PairId, swap: bool) -> Result<(), CoreError> {
        self.invoke_action(id, "resync", swap).await
    }

    /// Dissolve a pair. The volumes survive; the mirroring stops.
    pub async fn delete(&self, id: &PairId) -> Result<(), CoreError> {
        self.execute_across(Method::DELETE, &format!("{PAIR_COLLECTION}/{id}"), None)
            .await?;
        info!(pair = %id, "pair deleted");
        self.record("pair.delete", id);
        Ok(())
    }

    /// Resize both volumes of a pair.
    ///
    /// Three steps with no automatic rollback: split unless the pair is
    /// already suspended, expand the primary then the secondary volume,
    /// resync on success. An expansion failure surfaces
    /// [`CoreError::PairLeftSplit`] naming the intermediate state --
    /// the operator resyncs once the cause is fixed.
    pub async fn resize(&self, id: &PairId, additional_blocks: u64) -> Result<(), CoreError> {
        let pair = self.status(id).await?;

        if pair.is_suspended() {
            debug!(pair = %id, "pair already suspended, skipping split");
        } else {
            self.split(id, false).await?;
        }

        let pvol = pair.pvol_ldev_id.ok_or_else(|| CoreError::ValidationFailed {
            message: format!("pair {id} reports no primary volume id"),
        })?;
        let svol = pair.svol_ldev_id.ok_or_else(|| CoreError::ValidationFailed {
            message: format!("pair {id} reports no secondary volume id"),
        })?;

        let expansion = async {
            expand_volume(&self.local, pvol, additional_blocks).await?;
            expand_volume(&self.secondary, svol, additional_blocks).await
        }
        .await;

        if let Err(source) = expansion {
            self.record("pair.resize", id);
            return Err(CoreError::PairLeftSplit {
                pair: id.to_string(),
                message: source.to_string(),
            });
        }

        self.resync(id, false).await?;
        info!(pair = %id, additional_blocks, "pair resized");
        self.record("pair.resize", id);
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn invoke_action(&self, id: &PairId, action: &str, swap: bool) -> Result<(), CoreError> {
        let id = if swap { id.swapped() } else { id.clone() };
        let path = format!("{PAIR_COLLECTION}/{id}/actions/{action}/invoke");

        self.execute_across(Method::POST, &path, Some(&json!({ "parameters": {} })))
            .await?;
        info!(pair = %id, action, swap, "pair action completed");
        self.record(&format!("pair.{action}"), &id);
        Ok(())
    }

    /// Cross-array mutation: register the job without waiting for the
    /// configuration change to propagate, then poll it on the local
    /// array to terminal.
    async fn execute_across(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<String, CoreError> {
        let raw = call_across(
            self.local.conn(),
            self.secondary.conn(),
            method,
            path,
            body,
            true,
        )
        .await?;
        let job_id = job::job_id_of(&raw).ok_or_else(|| CoreError::OperationFailed {
            message: format!("response carried no job id: {raw}"),
        })?;
        self.local.await_job(&job_id).await
    }

    fn record(&self, operation: &str, id: &PairId) {
        if let Some(audit) = &self.audit {
            audit.record(operation, &id.to_string());
        }
    }
}

/// Expand one volume on one array and wait for the job.
async fn expand_volume(
    array: &ArrayClient,
    ldev_id: i64,
    additional_blocks: u64,
) -> Result<(), CoreError> {
    let path = format!("v1/objects/ldevs/{ldev_id}/actions/expand/invoke");
    let body = json!({ "parameters": { "additionalBlockCapacity": additional_blocks } });
    array.execute(Method::POST, &path, Some(&body)).await?;
    Ok(())
}
