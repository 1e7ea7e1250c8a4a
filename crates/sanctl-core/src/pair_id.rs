// Composite replication pair identifier.
//
// A cross-array pair is addressed by five fields serialized comma-joined
// in a fixed order the controller expects. Getting the order wrong --
// or forgetting that a swap operation transposes the device groups --
// addresses the wrong half of the pair. One typed value object and one
// canonical serialization keep that contract in a single place.

use std::fmt;

/// Order-sensitive composite identifier of a cross-array replication pair.
///
/// Serialized as
/// `{remote_serial},{copy_group},{local_device_group},{remote_device_group},{pair_name}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairId {
    /// Storage device id of the secondary array.
    pub remote_serial: String,
    /// Copy group the pair belongs to.
    pub copy_group: String,
    /// Device group holding the local (primary) volume.
    pub local_device_group: String,
    /// Device group holding the remote (secondary) volume.
    pub remote_device_group: String,
    /// Name of the pair within the copy group.
    pub pair_name: String,
}

impl PairId {
    /// Build a pair id, defaulting absent device-group names by the
    /// `P_`/`S_` suffix convention: copy group `CG1` yields `CG1P_`
    /// locally and `CG1S_` remotely.
    pub fn new(
        remote_serial: impl Into<String>,
        copy_group: impl Into<String>,
        pair_name: impl Into<String>,
        local_device_group: Option<String>,
        remote_device_group: Option<String>,
    ) -> Self {
        let copy_group = copy_group.into();
        let local_device_group =
            local_device_group.unwrap_or_else(|| format!("{copy_group}P_"));
        let remote_device_group =
            remote_device_group.unwrap_or_else(|| format!("{copy_group}S_"));
        Self {
            remote_serial: remote_serial.into(),
            copy_group,
            local_device_group,
            remote_device_group,
            pair_name: pair_name.into(),
        }
    }

    /// The identifier the *other* side uses for this pair: local and
    /// remote device groups trade places. Swap operations (which reverse
    /// the primary role) must address the pair through this id.
    pub fn swapped(&self) -> Self {
        Self {
            remote_serial: self.remote_serial.clone(),
            copy_group: self.copy_group.clone(),
            local_device_group: self.remote_device_group.clone(),
            remote_device_group: self.local_device_group.clone(),
            pair_name: self.pair_name.clone(),
        }
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.remote_serial,
            self.copy_group,
            self.local_device_group,
            self.remote_device_group,
            self.pair_name
        )
    }
}
