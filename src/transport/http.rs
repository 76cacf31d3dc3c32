use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;

use tracing::debug;

/// Boxed future used by the object-safe capability traits in this crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// HTTP headers as an ordered name → value mapping.
pub type Headers = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw HTTP exchange result.
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub headers: Headers,
}

impl HttpResponse {
    /// Whether the status code falls in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
/// The exchange could not be completed (DNS, TLS, connect, timeout).
///
/// `Display` surfaces only the underlying message; the adapter copies it
/// verbatim into the failure response it builds.
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl TransportError {
    /// Create an error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error wrapping the underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Executes one HTTP exchange per call.
///
/// Implementations must surface non-2xx statuses as a normal [`HttpResponse`]
/// and reserve [`TransportError`] for exchanges that could not complete. They
/// must also be safe for concurrent use; the adapter adds no locking.
pub trait HttpTransport: Send + Sync {
    fn post<'a>(
        &'a self,
        url: &'a str,
        body: &'a str,
        headers: &'a Headers,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;

    fn get<'a>(
        &'a self,
        url: &'a str,
        headers: &'a Headers,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}

#[derive(Debug, Clone)]
/// [`HttpTransport`] backed by `reqwest`.
///
/// TLS certificate verification is always on; this type exposes no way to
/// disable it. Timeouts are a property of the wrapped client, configured at
/// wiring time; the adapter neither imposes nor overrides one.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wrap a shared default client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Wrap a caller-configured client (timeout, proxy, user-agent).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn read_response(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|text| (name.to_string(), text.to_owned()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::with_source(err.to_string(), err))?;
        Ok(HttpResponse {
            status,
            body,
            headers,
        })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for ReqwestTransport {
    fn post<'a>(
        &'a self,
        url: &'a str,
        body: &'a str,
        headers: &'a Headers,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            debug!(url, "http post");
            let mut builder = self.client.post(url).body(body.to_owned());
            for (name, value) in headers {
                builder = builder.header(name, value);
            }
            let response = builder
                .send()
                .await
                .map_err(|err| TransportError::with_source(err.to_string(), err))?;
            Self::read_response(response).await
        })
    }

    fn get<'a>(
        &'a self,
        url: &'a str,
        headers: &'a Headers,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            debug!(url, "http get");
            let mut builder = self.client.get(url);
            for (name, value) in headers {
                builder = builder.header(name, value);
            }
            let response = builder
                .send()
                .await
                .map_err(|err| TransportError::with_source(err.to_string(), err))?;
            Self::read_response(response).await
        })
    }
}
