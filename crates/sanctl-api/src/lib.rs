// sanctl-api: Async REST client core for storage array controllers.
//
// Everything above this crate (pair orchestration, CLI) talks to an array
// through exactly two entry points: `Connection::call` for single-array
// operations and `call_across` for operations spanning a local and a
// secondary array. Results come back as decoded JSON, a resource id
// string (via the job poller), or a typed `Error`.

pub mod connection;
pub mod endpoint;
pub mod error;
pub mod job;
pub mod remote;
pub mod session;
pub mod transport;

pub use connection::{Connection, RetryPolicy};
pub use endpoint::Endpoint;
pub use error::Error;
pub use job::{JobDialect, JobPoller, V1Dialect, V2Dialect};
pub use remote::call_across;
pub use session::{Session, SessionStore};
pub use transport::{TlsMode, TransportConfig};

// Re-export the pieces of reqwest that appear in this crate's public
// signatures, so consumers don't need their own reqwest dependency.
pub use reqwest::header::HeaderMap;
pub use reqwest::Method;
