// Wire models for replication pairs.
//
// Responses from the controller use camelCase fields and are
// inconsistent about field presence across firmware versions, so
// everything defaults rather than failing deserialization.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── Pair kinds and states ────────────────────────────────────────────

/// Replication flavor of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum PairKind {
    /// Synchronous mirroring.
    #[strum(serialize = "SYNC")]
    Sync,
    /// Journal-based asynchronous mirroring.
    #[strum(serialize = "ASYNC")]
    Async,
    /// Active-active mirroring behind a quorum disk.
    #[strum(serialize = "ACTIVE_ACTIVE")]
    ActiveActive,
}

/// Volume-side status codes as the controller reports them.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString)]
pub enum PairStatus {
    /// Unpaired volume.
    #[strum(serialize = "SMPL")]
    Simplex,
    /// Initial or resync copy in flight.
    #[strum(serialize = "COPY")]
    Copying,
    /// In sync.
    #[strum(serialize = "PAIR")]
    Synchronized,
    /// Split, primary side.
    #[strum(serialize = "PSUS")]
    SplitPrimary,
    /// Split, secondary side.
    #[strum(serialize = "SSUS")]
    SplitSecondary,
    /// Suspended by failure.
    #[strum(serialize = "PSUE")]
    SuspendedError,
    /// Anything newer firmware may add.
    #[strum(default)]
    Other(String),
}

// ── Pair resource ────────────────────────────────────────────────────

/// One replication pair as reported by the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationPair {
    #[serde(default)]
    pub copy_group_name: String,
    #[serde(default)]
    pub copy_pair_name: String,
    #[serde(default)]
    pub replication_type: Option<String>,
    #[serde(default)]
    pub pvol_ldev_id: Option<i64>,
    #[serde(default)]
    pub svol_ldev_id: Option<i64>,
    #[serde(default)]
    pub pvol_status: Option<String>,
    #[serde(default)]
    pub svol_status: Option<String>,
    #[serde(default)]
    pub fence_level: Option<String>,
    #[serde(default)]
    pub quorum_disk_id: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ReplicationPair {
    pub fn pvol_state(&self) -> PairStatus {
        parse_status(self.pvol_status.as_deref())
    }

    pub fn svol_state(&self) -> PairStatus {
        parse_status(self.svol_status.as_deref())
    }

    /// Whether both sides already report the split (suspended) state.
    /// Mutations that require a suspended pair skip their split step
    /// when this holds.
    pub fn is_suspended(&self) -> bool {
        self.pvol_state() == PairStatus::SplitPrimary
            && self.svol_state() == PairStatus::SplitSecondary
    }
}

fn parse_status(raw: Option<&str>) -> PairStatus {
    match raw {
        Some(s) => s
            .parse()
            .unwrap_or_else(|_| PairStatus::Other(s.to_owned())),
        None => PairStatus::Other(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pair_deserializes_from_camel_case() {
        let pair: ReplicationPair = serde_json::from_value(json!({
            "copyGroupName": "CG1",
            "copyPairName": "pair1",
            "pvolLdevId": 100,
            "svolLdevId": 200,
            "pvolStatus": "PSUS",
            "svolStatus": "SSUS",
            "undocumentedField": true
        }))
        .unwrap();

        assert_eq!(pair.copy_group_name, "CG1");
        assert_eq!(pair.pvol_ldev_id, Some(100));
        assert!(pair.is_suspended());
        assert!(pair.extra.contains_key("undocumentedField"));
    }

    #[test]
    fn unknown_status_is_preserved() {
        let pair: ReplicationPair = serde_json::from_value(json!({
            "pvolStatus": "SSWS"
        }))
        .unwrap();

        assert_eq!(pair.pvol_state(), PairStatus::Other("SSWS".into()));
        assert!(!pair.is_suspended());
    }

    #[test]
    fn pair_kind_wire_names() {
        assert_eq!(PairKind::Sync.to_string(), "SYNC");
        assert_eq!(PairKind::ActiveActive.to_string(), "ACTIVE_ACTIVE");
    }
}
