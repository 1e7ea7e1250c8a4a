// Authenticated call path with bounded retry.
//
// One Connection per endpoint. Applies the session token, the
// server-busy backoff loop, and a single invalid-token renewal before
// giving up. The retry budget is an explicit, testable policy value --
// not recursion depth. Idempotency of a retried mutation is the
// caller's responsibility; the Connection does not deduplicate
// at-least-once side effects.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, warn};

use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::session::SessionStore;
use crate::transport::TransportConfig;

/// Retry tuning for one connection.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Sleep between attempts when the controller answers 503.
    pub busy_backoff: Duration,
    /// How many times a busy controller is retried after the initial
    /// attempt. The last 503's decoded body surfaces once exhausted.
    pub max_busy_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            busy_backoff: Duration::from_secs(300),
            max_busy_retries: 5,
        }
    }
}

/// Authenticated HTTP client for one array endpoint.
pub struct Connection {
    http: reqwest::Client,
    endpoint: Endpoint,
    sessions: Arc<SessionStore>,
    retry: RetryPolicy,
}

impl Connection {
    /// Build a connection from an endpoint and transport settings.
    ///
    /// The session store is shared -- hand the same `Arc` to every
    /// connection in the process so each address keeps one live session.
    pub fn new(
        endpoint: Endpoint,
        transport: &TransportConfig,
        sessions: Arc<SessionStore>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            endpoint,
            sessions,
            retry: RetryPolicy::default(),
        })
    }

    /// Override the retry policy (tests shrink the backoff here).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    // ── Convenience verbs ────────────────────────────────────────────

    pub async fn get(&self, path: &str) -> Result<Value, Error> {
        self.call(Method::GET, path, None, HeaderMap::new()).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, Error> {
        self.call(Method::POST, path, Some(body), HeaderMap::new())
            .await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, Error> {
        self.call(Method::PUT, path, Some(body), HeaderMap::new())
            .await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, Error> {
        self.call(Method::PATCH, path, Some(body), HeaderMap::new())
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, Error> {
        self.call(Method::DELETE, path, None, HeaderMap::new())
            .await
    }

    // ── The call state machine ───────────────────────────────────────

    /// Issue one authenticated call against this endpoint.
    ///
    /// - 2xx: decoded JSON body (`{}` for an empty body, the raw text as
    ///   a JSON string for a non-JSON body).
    /// - 503: sleep the busy backoff and re-issue, up to the policy's
    ///   retry budget; the last decoded error body surfaces after that.
    /// - Any other 4xx/5xx: decoded into [`Error::Request`]. If the
    ///   message says the session token is invalid, the token is renewed
    ///   and the call retried exactly once.
    /// - Socket timeout: [`Error::Timeout`], no retry.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        extra_headers: HeaderMap,
    ) -> Result<Value, Error> {
        let url = self.endpoint.url(path)?;
        let mut token = self.sessions.token(&self.http, &self.endpoint).await?;
        let mut renewed = false;
        let mut busy_retries: u32 = 0;

        loop {
            debug!(%method, %url, busy_retries, "issuing request");

            let mut req = self
                .http
                .request(method.clone(), url.clone())
                .header(AUTHORIZATION, session_header(&token, &self.endpoint)?)
                .header(ACCEPT, "application/json")
                .headers(extra_headers.clone());
            if let Some(body) = body {
                req = req.header(CONTENT_TYPE, "application/json").json(body);
            }

            let resp = match req.send().await {
                Ok(resp) => resp,
                Err(e) if e.is_timeout() => {
                    return Err(Error::Timeout {
                        message: format!("request to {url} timed out"),
                    });
                }
                Err(e) => return Err(Error::Transport(e)),
            };

            let status = resp.status();
            if status.is_success() {
                return decode_body(resp).await;
            }

            let message = decode_error_body(resp).await;

            if status == StatusCode::SERVICE_UNAVAILABLE {
                if busy_retries >= self.retry.max_busy_retries {
                    return Err(Error::Request {
                        status: status.as_u16(),
                        message,
                    });
                }
                warn!(
                    busy_retries,
                    backoff_secs = self.retry.busy_backoff.as_secs(),
                    "controller busy (HTTP 503), backing off"
                );
                tokio::time::sleep(self.retry.busy_backoff).await;
                busy_retries += 1;
                continue;
            }

            if !renewed && indicates_invalid_token(&message) {
                debug!("session token rejected, renewing once");
                token = self.sessions.renew(&self.http, &self.endpoint).await?;
                renewed = true;
                continue;
            }

            return Err(Error::Request {
                status: status.as_u16(),
                message,
            });
        }
    }
}

/// Build the `Authorization: Session <token>` header value.
pub(crate) fn session_header(
    token: &SecretString,
    endpoint: &Endpoint,
) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Session {}", token.expose_secret()))
        .map_err(|e| Error::Authentication {
            endpoint: endpoint.address_key(),
            message: format!("token is not a valid header value: {e}"),
        })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Whether an error message reports the session token itself as bad.
/// Controllers phrase this as "The specified token is invalid" or
/// "...has expired", depending on generation.
fn indicates_invalid_token(message: &str) -> bool {
    let m = message.to_ascii_lowercase();
    m.contains("token") && (m.contains("invalid") || m.contains("expired"))
}

/// Decode a 2xx response body.
async fn decode_body(resp: reqwest::Response) -> Result<Value, Error> {
    let body = resp.text().await.map_err(Error::Transport)?;
    if body.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    // Some firmware answers plain text on administrative endpoints.
    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(_) => Ok(Value::String(body)),
    }
}

/// Error body shape shared by both controller generations. Fields are
/// inconsistently present, so everything defaults.
#[derive(serde::Deserialize, Default)]
#[serde(default)]
struct ErrorBody {
    message: Option<String>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
    cause: Option<String>,
    solution: Option<String>,
}

/// Compose a human-readable message from a non-2xx response body.
async fn decode_error_body(resp: reqwest::Response) -> String {
    let status = resp.status();
    let raw = resp.text().await.unwrap_or_default();

    if let Ok(err) = serde_json::from_str::<ErrorBody>(&raw) {
        let mut parts: Vec<String> = Vec::new();
        if let Some(m) = err.message.or(err.error_message) {
            parts.push(m);
        }
        if let Some(c) = err.cause {
            parts.push(c);
        }
        if let Some(s) = err.solution {
            parts.push(s);
        }
        if !parts.is_empty() {
            return parts.join(" ");
        }
    }

    if raw.is_empty() {
        status.to_string()
    } else {
        raw[..raw.len().min(200)].to_owned()
    }
}
