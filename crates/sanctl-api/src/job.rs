// Asynchronous job completion.
//
// A mutating call answers immediately with a job resource; the poller
// reads that resource until it reaches a terminal state and extracts the
// created or modified resource id. Two wire dialects exist across
// controller generations; both share one state machine
// (pending -> completed-success | completed-failure) behind the
// JobDialect trait, so the poller itself is dialect-agnostic.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::connection::Connection;
use crate::error::Error;

/// Path of the job collection on every array generation.
pub const JOB_COLLECTION: &str = "v1/objects/jobs";

/// How one controller generation spells job status on the wire.
pub trait JobDialect: Send + Sync {
    /// Whether the job has reached a terminal state.
    fn is_terminal(&self, raw: &Value) -> bool;
    /// Whether a terminal job finished successfully.
    fn is_success(&self, raw: &Value) -> bool;
    /// URL-like reference to the job's affected resource, falling back
    /// to the job's self-reference.
    fn resource_ref(&self, raw: &Value) -> Option<String>;
    /// Human-readable failure message composed from the error object.
    fn error_message(&self, raw: &Value) -> String;
}

/// Current-generation dialect: `status` reaches `"Completed"`, `state`
/// distinguishes `"Succeeded"` from `"Failed"` / `"Canceled"`.
pub struct V2Dialect;

impl JobDialect for V2Dialect {
    fn is_terminal(&self, raw: &Value) -> bool {
        raw.get("status").and_then(Value::as_str) == Some("Completed")
    }

    fn is_success(&self, raw: &Value) -> bool {
        raw.get("state").and_then(Value::as_str) == Some("Succeeded")
    }

    fn resource_ref(&self, raw: &Value) -> Option<String> {
        affected_or_self(raw)
    }

    fn error_message(&self, raw: &Value) -> String {
        compose_error(raw.get("error"))
    }
}

/// First-generation dialect: `progress` reaches `"completed"`, `status`
/// is `"normal"` on success and an error word otherwise.
pub struct V1Dialect;

impl JobDialect for V1Dialect {
    fn is_terminal(&self, raw: &Value) -> bool {
        raw.get("progress").and_then(Value::as_str) == Some("completed")
    }

    fn is_success(&self, raw: &Value) -> bool {
        raw.get("status").and_then(Value::as_str) == Some("normal")
    }

    fn resource_ref(&self, raw: &Value) -> Option<String> {
        affected_or_self(raw)
    }

    fn error_message(&self, raw: &Value) -> String {
        compose_error(raw.get("error"))
    }
}

fn affected_or_self(raw: &Value) -> Option<String> {
    raw.get("affectedResources")
        .and_then(Value::as_array)
        .and_then(|rs| rs.first())
        .and_then(Value::as_str)
        .map(str::to_owned)
        .or_else(|| raw.get("self").and_then(Value::as_str).map(str::to_owned))
}

/// Every error field either generation may populate, in message order.
const ERROR_FIELDS: [&str; 7] = [
    "messageId",
    "message",
    "cause",
    "solution",
    "solutionType",
    "errorCode",
    "detailCode",
];

/// Space-join whichever error fields are present.
fn compose_error(error: Option<&Value>) -> String {
    let Some(error) = error else {
        return "no error detail reported".to_owned();
    };
    let mut parts: Vec<String> = Vec::new();
    for field in ERROR_FIELDS {
        match error.get(field) {
            Some(Value::String(s)) if !s.is_empty() => parts.push(s.clone()),
            Some(Value::String(_)) | Some(Value::Null) | None => {}
            Some(other) => parts.push(other.to_string()),
        }
    }
    if parts.is_empty() {
        "no error detail reported".to_owned()
    } else {
        parts.join(" ")
    }
}

/// Extract the job id from the response of a mutating call.
/// Controllers answer `{"jobId": 123}`; some firmware quotes the number.
pub fn job_id_of(raw: &Value) -> Option<String> {
    match raw.get("jobId") {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Polling loop tuning.
#[derive(Debug, Clone)]
pub struct JobPoller {
    /// Sleep between polls.
    pub interval: Duration,
    /// Poll budget before the job is declared timed out.
    pub max_polls: u32,
}

impl Default for JobPoller {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_polls: 60,
        }
    }
}

impl JobPoller {
    /// Poll the job until terminal, returning the affected resource id.
    ///
    /// A job that fails or is canceled becomes [`Error::JobFailed`] with
    /// every populated error field in the message. A job still pending
    /// after the poll budget becomes [`Error::Timeout`] -- fatal, not
    /// retried at any higher level.
    pub async fn await_job(
        &self,
        conn: &Connection,
        job_id: &str,
        dialect: &dyn JobDialect,
    ) -> Result<String, Error> {
        let path = format!("{JOB_COLLECTION}/{job_id}");

        for poll in 1..=self.max_polls {
            let raw = conn.get(&path).await?;

            if dialect.is_terminal(&raw) {
                if dialect.is_success(&raw) {
                    let reference = dialect
                        .resource_ref(&raw)
                        .unwrap_or_else(|| path.clone());
                    let id = last_segment(&reference);
                    debug!(job_id, resource = %id, "job completed");
                    return Ok(id);
                }
                return Err(Error::JobFailed {
                    message: dialect.error_message(&raw),
                });
            }

            debug!(job_id, poll, "job still running");
            if poll < self.max_polls {
                tokio::time::sleep(self.interval).await;
            }
        }

        Err(Error::Timeout {
            message: format!("job {job_id} not completed in time"),
        })
    }
}

/// Final path segment of a URL-like resource reference.
fn last_segment(reference: &str) -> String {
    reference
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(reference)
        .to_owned()
}
