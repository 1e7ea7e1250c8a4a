// ── Fire-and-forget audit logging ──
//
// Mutating operations append a record through an unbounded channel into
// a spawned writer task. Append failures are logged at `warn` and never
// surface -- the call path must not block or fail on audit plumbing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::warn;

/// One audit line, serialized as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub at: DateTime<Utc>,
    pub operation: String,
    pub target: String,
}

/// Handle for appending audit records. Cheap to clone; all clones feed
/// the same writer task.
#[derive(Clone)]
pub struct AuditLog {
    tx: mpsc::UnboundedSender<AuditRecord>,
}

impl AuditLog {
    /// Spawn a writer task appending JSON lines to `path`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn to_file(path: PathBuf) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<AuditRecord>();

        tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                if let Err(e) = append(&path, &record).await {
                    warn!(path = %path.display(), "audit append failed: {e}");
                }
            }
        });

        Self { tx }
    }

    /// Queue a record. Never blocks, never fails the caller; a closed
    /// channel means the process is shutting down anyway.
    pub fn record(&self, operation: &str, target: &str) {
        let _ = self.tx.send(AuditRecord {
            at: Utc::now(),
            operation: operation.to_owned(),
            target: target.to_owned(),
        });
    }
}

async fn append(path: &Path, record: &AuditRecord) -> std::io::Result<()> {
    let line = serde_json::to_string(record)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.write_all(b"\n").await
}
