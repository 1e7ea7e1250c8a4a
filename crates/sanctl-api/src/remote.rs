// Cross-array call path.
//
// An operation that spans a local and a secondary array authenticates
// against both: the local session rides the Authorization header, the
// secondary session rides Remote-Authorization. The two endpoints have
// independent credentials, tokens, and failure domains -- a failure to
// obtain the secondary token is fatal and short-circuits before anything
// is sent to the local array.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::connection::{session_header, Connection};
use crate::error::Error;

/// Header carrying the secondary array's session token.
pub const REMOTE_AUTHORIZATION: &str = "remote-authorization";

/// Header telling the controller not to block the call while the
/// configuration change propagates to the remote side.
pub const JOB_MODE_WAIT: &str = "job-mode-wait-configuration-change";

/// Issue a call against the local array that also addresses resources on
/// the secondary array.
///
/// The secondary token is resolved through the secondary connection's
/// own session store (an independent cache entry from the local one) and
/// carried under [`REMOTE_AUTHORIZATION`] -- the primary Authorization
/// header still belongs to the local session. With `no_wait` the
/// controller answers as soon as the job is registered instead of
/// waiting for remote configuration propagation.
pub async fn call_across(
    local: &Connection,
    secondary: &Connection,
    method: Method,
    path: &str,
    body: Option<&Value>,
    no_wait: bool,
) -> Result<Value, Error> {
    let token = secondary
        .sessions()
        .token(secondary.http(), secondary.endpoint())
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(REMOTE_AUTHORIZATION),
        session_header(&token, secondary.endpoint())?,
    );
    if no_wait {
        headers.insert(
            HeaderName::from_static(JOB_MODE_WAIT),
            HeaderValue::from_static("NoWait"),
        );
    }

    debug!(%method, path, no_wait, "cross-array call");
    local.call(method, path, body, headers).await
}
