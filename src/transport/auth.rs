use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::domain::ParamMap;
use crate::transport::http::Headers;

/// Name of the header every credential-bearing strategy writes.
pub const AUTHORIZATION: &str = "Authorization";

/// Pluggable credential-attachment policy.
///
/// Strategies are pure data transforms: they may add or overwrite the
/// `Authorization` entry but never remove or rename caller-supplied ones, and
/// they cannot fail. Whether credentials belong in headers, payload, or
/// neither is each variant's own call.
pub trait AuthStrategy: Send + Sync {
    /// Attach credentials to the outgoing headers.
    fn apply_to_headers(&self, headers: Headers) -> Headers;

    /// Attach credentials to the outgoing payload.
    fn apply_to_payload(&self, payload: ParamMap) -> ParamMap;
}

#[derive(Debug, Clone, Copy, Default)]
/// No credentials: identity on headers and payload.
pub struct NoAuth;

impl AuthStrategy for NoAuth {
    fn apply_to_headers(&self, headers: Headers) -> Headers {
        headers
    }

    fn apply_to_payload(&self, payload: ParamMap) -> ParamMap {
        payload
    }
}

#[derive(Debug, Clone)]
/// `Authorization: Bearer <token>` header credentials.
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl AuthStrategy for BearerToken {
    fn apply_to_headers(&self, mut headers: Headers) -> Headers {
        headers.insert(AUTHORIZATION.to_owned(), format!("Bearer {}", self.token));
        headers
    }

    fn apply_to_payload(&self, payload: ParamMap) -> ParamMap {
        payload
    }
}

#[derive(Debug, Clone)]
/// `Authorization: Basic <base64(username:password)>` header credentials.
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl AuthStrategy for BasicAuth {
    fn apply_to_headers(&self, mut headers: Headers) -> Headers {
        let credentials = BASE64.encode(format!("{}:{}", self.username, self.password));
        headers.insert(AUTHORIZATION.to_owned(), format!("Basic {credentials}"));
        headers
    }

    fn apply_to_payload(&self, payload: ParamMap) -> ParamMap {
        payload
    }
}
