// ── Host group teardown ──
//
// A host group cannot be deleted while LUN paths hang off it. Paths are
// independent of each other, so a bounded pool of four workers deletes
// them in parallel; the caller joins on all of them and re-raises the
// first failure. The group itself goes last.

use futures_util::stream::{self, StreamExt};
use sanctl_api::Method;
use serde_json::Value;
use tracing::{debug, info};

use crate::array::ArrayClient;
use crate::error::CoreError;

/// Concurrent path deletions during teardown.
pub const TEARDOWN_WORKERS: usize = 4;

/// Host groups are addressed by a comma-joined `{port},{number}` key.
pub fn host_group_id(port: &str, number: u32) -> String {
    format!("{port},{number}")
}

/// List the LUN path ids under a host group.
pub async fn list_lun_paths(
    array: &ArrayClient,
    port: &str,
    number: u32,
) -> Result<Vec<String>, CoreError> {
    let raw = array
        .conn()
        .get(&format!(
            "v1/objects/luns?portId={port}&hostGroupNumber={number}"
        ))
        .await?;

    let ids = raw
        .get("data")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .filter_map(|row| match row.get("lunId") {
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(Value::Number(n)) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(ids)
}

/// Delete every LUN path under a host group, then the group itself.
pub async fn delete_host_group(
    array: &ArrayClient,
    port: &str,
    number: u32,
) -> Result<(), CoreError> {
    let paths = list_lun_paths(array, port, number).await?;
    debug!(port, number, paths = paths.len(), "tearing down host group");

    let results: Vec<Result<String, CoreError>> = stream::iter(paths.into_iter().map(|lun| {
        async move {
            array
                .execute(Method::DELETE, &format!("v1/objects/luns/{lun}"), None)
                .await
        }
    }))
    .buffer_unordered(TEARDOWN_WORKERS)
    .collect()
    .await;

    // Join on all workers before surfacing the first failure.
    for result in results {
        result?;
    }

    array
        .execute(
            Method::DELETE,
            &format!("v1/objects/host-groups/{}", host_group_id(port, number)),
            None,
        )
        .await?;
    info!(port, number, "host group deleted");
    Ok(())
}
