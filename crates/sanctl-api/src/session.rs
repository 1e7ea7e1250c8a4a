// Session store (token cache).
//
// One live session per endpoint address, created lazily on the first
// authenticated call and replaced wholesale on renewal. The store is an
// explicit value injected into every Connection -- there is no
// process-global cache. Renewal of the same address is serialized with a
// per-address lock; distinct addresses never interfere.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::Error;

/// Path of the session-creation resource on every array generation.
pub const SESSION_PATH: &str = "v1/objects/sessions";

/// A live session with one array controller.
///
/// Replaced wholesale on renewal -- never mutated in place -- so a
/// concurrent reader can never observe a half-updated token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub session_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(serde::Deserialize)]
struct SessionResponse {
    token: String,
    #[serde(default, rename = "sessionId")]
    session_id: Option<i64>,
}

/// Process-lifetime cache of sessions, keyed by endpoint address.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    /// Per-address renewal locks. Two tasks renewing the same address
    /// serialize here instead of racing to evict each other's session.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.to_owned())
            .or_default()
            .clone()
    }

    /// Current token for the endpoint, authenticating on a cache miss.
    ///
    /// Endpoints carrying a pre-issued token short-circuit: the token is
    /// returned verbatim and no session is ever created for them.
    pub async fn token(
        &self,
        http: &reqwest::Client,
        endpoint: &Endpoint,
    ) -> Result<SecretString, Error> {
        if let Some(token) = &endpoint.api_token {
            return Ok(token.clone());
        }

        let key = endpoint.address_key();
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        if let Some(session) = self.sessions.get(&key) {
            return Ok(session.token.clone());
        }

        let session = self.create_session(http, endpoint).await?;
        let token = session.token.clone();
        self.sessions.insert(key, session);
        Ok(token)
    }

    /// Unconditionally discard any cached session for the endpoint and
    /// authenticate again.
    pub async fn renew(
        &self,
        http: &reqwest::Client,
        endpoint: &Endpoint,
    ) -> Result<SecretString, Error> {
        // A pre-issued token cannot be renewed -- minting a session the
        // operator never asked for would be a surprise. Return it as-is
        // and let the rejected call surface.
        if let Some(token) = &endpoint.api_token {
            return Ok(token.clone());
        }

        let key = endpoint.address_key();
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        self.sessions.remove(&key);
        let session = self.create_session(http, endpoint).await?;
        let token = session.token.clone();
        self.sessions.insert(key, session);
        Ok(token)
    }

    /// Drop the cached session for an endpoint without creating a new one.
    pub fn evict(&self, endpoint: &Endpoint) {
        self.sessions.remove(&endpoint.address_key());
    }

    /// Snapshot of the cached session for an endpoint, if any.
    pub fn session(&self, endpoint: &Endpoint) -> Option<Session> {
        self.sessions
            .get(&endpoint.address_key())
            .map(|s| s.clone())
    }

    /// POST empty-bodied credentials to the session-creation resource and
    /// extract the token from the JSON response.
    async fn create_session(
        &self,
        http: &reqwest::Client,
        endpoint: &Endpoint,
    ) -> Result<Session, Error> {
        let url = endpoint.url(SESSION_PATH)?;
        debug!(%url, "creating session");

        let auth_err = |message: String| Error::Authentication {
            endpoint: endpoint.address_key(),
            message,
        };

        let resp = http
            .post(url)
            .basic_auth(&endpoint.username, Some(endpoint.password.expose_secret()))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| auth_err(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let preview = &body[..body.len().min(200)];
            return Err(auth_err(format!(
                "session creation failed (HTTP {status}): {preview}"
            )));
        }

        let body = resp.text().await.map_err(|e| auth_err(e.to_string()))?;
        let parsed: SessionResponse = serde_json::from_str(&body)
            .map_err(|e| auth_err(format!("unexpected session response: {e}")))?;

        debug!(session_id = ?parsed.session_id, "session created");
        Ok(Session {
            token: SecretString::from(parsed.token),
            session_id: parsed.session_id,
            created_at: Utc::now(),
        })
    }
}
