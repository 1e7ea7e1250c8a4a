// One array controller's management address plus credentials.
//
// Endpoints are constructed once per invocation from configuration and
// treated as immutable. The address string is the identity key for
// session caching -- at most one live session per address.

use secrecy::SecretString;
use url::Url;

use crate::error::Error;

/// One storage array's management endpoint.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Management URL, e.g. `https://array1.example.com`.
    pub address: Url,
    /// Username for session creation (sent as HTTP Basic).
    pub username: String,
    /// Password for session creation.
    pub password: SecretString,
    /// Pre-issued token. When set, session creation is skipped entirely
    /// and this token is sent as-is on every call.
    pub api_token: Option<SecretString>,
}

impl Endpoint {
    pub fn new(address: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            address,
            username: username.into(),
            password,
            api_token: None,
        }
    }

    /// Attach a pre-issued token, bypassing session creation.
    pub fn with_api_token(mut self, token: SecretString) -> Self {
        self.api_token = Some(token);
        self
    }

    /// Cache key for the session store. Trailing slashes are stripped so
    /// `https://a/` and `https://a` share one session.
    pub fn address_key(&self) -> String {
        self.address.as_str().trim_end_matches('/').to_owned()
    }

    /// Join a relative API path (e.g. `"v1/objects/sessions"`) onto the
    /// management URL.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.address.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }
}
