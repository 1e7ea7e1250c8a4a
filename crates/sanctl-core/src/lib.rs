// sanctl-core: Replication pair orchestration between sanctl-api and consumers (CLI).

pub mod array;
pub mod audit;
pub mod config;
pub mod error;
pub mod hostgroup;
pub mod model;
pub mod pair_id;
pub mod pairs;

// ── Primary re-exports ──────────────────────────────────────────────
pub use array::ArrayClient;
pub use audit::AuditLog;
pub use config::{ApiGeneration, ArrayConfig, AuthCredentials, TlsVerification};
pub use error::CoreError;
pub use hostgroup::delete_host_group;
pub use model::{PairKind, PairStatus, ReplicationPair};
pub use pair_id::PairId;
pub use pairs::{PairCreate, PairManager};

// Transport-layer types consumers need to construct clients.
pub use sanctl_api::{JobPoller, SessionStore};
