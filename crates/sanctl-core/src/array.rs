// ── Array handle ──
//
// One ArrayClient per array controller: the authenticated Connection,
// the job poller tuned for it, and the dialect its firmware generation
// speaks. `execute` is the workhorse -- issue a mutating call, pull the
// job id out of the response, poll the job to terminal, and hand back
// the affected resource id.

use std::sync::Arc;

use sanctl_api::{
    job, Connection, Endpoint, HeaderMap, JobDialect, JobPoller, Method, SessionStore, TlsMode,
    TransportConfig, V1Dialect, V2Dialect,
};
use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::config::{ApiGeneration, ArrayConfig, AuthCredentials, TlsVerification};
use crate::error::CoreError;

pub struct ArrayClient {
    conn: Connection,
    poller: JobPoller,
    generation: ApiGeneration,
    /// Storage device id, fetched lazily unless pinned by config.
    device_id: OnceCell<String>,
}

impl ArrayClient {
    /// Build a client from configuration.
    ///
    /// Hand the same `SessionStore` to every client in the process so
    /// each address keeps exactly one live session.
    pub fn from_config(
        config: &ArrayConfig,
        sessions: Arc<SessionStore>,
    ) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let endpoint = build_endpoint(config);
        let conn = Connection::new(endpoint, &transport, sessions)?;

        Ok(Self {
            conn,
            poller: JobPoller::default(),
            generation: config.generation,
            device_id: OnceCell::new_with(config.serial.clone()),
        })
    }

    /// Override the job poller (tests shrink the interval here).
    pub fn with_poller(mut self, poller: JobPoller) -> Self {
        self.poller = poller;
        self
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// The job-status dialect for this array's firmware generation.
    pub fn dialect(&self) -> &'static dyn JobDialect {
        match self.generation {
            ApiGeneration::V1 => &V1Dialect,
            ApiGeneration::V2 => &V2Dialect,
        }
    }

    /// Poll a job on this array to a terminal state.
    pub async fn await_job(&self, job_id: &str) -> Result<String, CoreError> {
        Ok(self
            .poller
            .await_job(&self.conn, job_id, self.dialect())
            .await?)
    }

    /// Issue a mutating call and await the job it registers.
    /// Returns the affected resource id.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<String, CoreError> {
        let raw = self.conn.call(method, path, body, HeaderMap::new()).await?;
        let job_id = job::job_id_of(&raw).ok_or_else(|| CoreError::OperationFailed {
            message: format!("response carried no job id: {raw}"),
        })?;
        self.await_job(&job_id).await
    }

    /// This array's storage device id, fetched once and cached.
    pub async fn device_id(&self) -> Result<String, CoreError> {
        let id = self
            .device_id
            .get_or_try_init(|| async {
                let raw = self.conn.get("v1/objects/storages/instance").await?;
                raw.get("storageDeviceId")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .ok_or_else(|| CoreError::OperationFailed {
                        message: "array did not report a storageDeviceId".into(),
                    })
            })
            .await?;
        Ok(id.clone())
    }
}

fn build_endpoint(config: &ArrayConfig) -> Endpoint {
    match &config.auth {
        AuthCredentials::Credentials { username, password } => {
            Endpoint::new(config.url.clone(), username.clone(), password.clone())
        }
        AuthCredentials::Token(token) => Endpoint::new(
            config.url.clone(),
            String::new(),
            SecretString::from(String::new()),
        )
        .with_api_token(token.clone()),
    }
}

fn build_transport(config: &ArrayConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}
