use std::sync::Arc;

use url::Url;

use crate::domain::ValidationError;
use crate::transport::{AuthStrategy, Headers, JsonSerializer, NoAuth, PayloadSerializer};

#[derive(Clone)]
/// Provider wiring: endpoints, serializer, auth strategy, default headers.
///
/// Constructed once at wiring time and shared read-only across calls. Endpoint
/// paths are concatenated verbatim to the base URL; no slash normalization is
/// performed, so the integrator owns consistent slashes.
pub struct ProviderConfig {
    base_url: String,
    send_endpoint: String,
    reservations_endpoint: String,
    cancel_endpoint: String,
    serializer: Arc<dyn PayloadSerializer>,
    auth: Arc<dyn AuthStrategy>,
    default_headers: Headers,
}

impl ProviderConfig {
    /// Start building a config for the given base URL.
    pub fn builder(base_url: impl Into<String>) -> ProviderConfigBuilder {
        ProviderConfigBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn send_endpoint(&self) -> &str {
        &self.send_endpoint
    }

    pub fn reservations_endpoint(&self) -> &str {
        &self.reservations_endpoint
    }

    pub fn cancel_endpoint(&self) -> &str {
        &self.cancel_endpoint
    }

    pub fn serializer(&self) -> &dyn PayloadSerializer {
        self.serializer.as_ref()
    }

    pub fn auth(&self) -> &dyn AuthStrategy {
        self.auth.as_ref()
    }

    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("send_endpoint", &self.send_endpoint)
            .field("reservations_endpoint", &self.reservations_endpoint)
            .field("cancel_endpoint", &self.cancel_endpoint)
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
/// Builder for [`ProviderConfig`].
///
/// Defaults: `/send`, `/reservations`, and `/cancel` endpoints, JSON
/// serializer, no auth, no default headers.
pub struct ProviderConfigBuilder {
    base_url: String,
    send_endpoint: String,
    reservations_endpoint: String,
    cancel_endpoint: String,
    serializer: Arc<dyn PayloadSerializer>,
    auth: Arc<dyn AuthStrategy>,
    default_headers: Headers,
}

impl ProviderConfigBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            send_endpoint: "/send".to_owned(),
            reservations_endpoint: "/reservations".to_owned(),
            cancel_endpoint: "/cancel".to_owned(),
            serializer: Arc::new(JsonSerializer),
            auth: Arc::new(NoAuth),
            default_headers: Headers::new(),
        }
    }

    /// Override the send endpoint path.
    pub fn send_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.send_endpoint = endpoint.into();
        self
    }

    /// Override the list-reservations endpoint path.
    pub fn reservations_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.reservations_endpoint = endpoint.into();
        self
    }

    /// Override the cancel endpoint path.
    pub fn cancel_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.cancel_endpoint = endpoint.into();
        self
    }

    /// Select the payload serializer for POST bodies.
    pub fn serializer(mut self, serializer: Arc<dyn PayloadSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Select the credential-attachment strategy.
    pub fn auth(mut self, auth: Arc<dyn AuthStrategy>) -> Self {
        self.auth = auth;
        self
    }

    /// Add a header sent with every request.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Validate and build the config.
    ///
    /// The base URL must parse as an absolute URL; it is stored verbatim, so
    /// the parsed form is used for validation only.
    pub fn build(self) -> Result<ProviderConfig, ValidationError> {
        if Url::parse(&self.base_url).is_err() {
            return Err(ValidationError::InvalidBaseUrl {
                input: self.base_url,
            });
        }
        Ok(ProviderConfig {
            base_url: self.base_url,
            send_endpoint: self.send_endpoint,
            reservations_endpoint: self.reservations_endpoint,
            cancel_endpoint: self.cancel_endpoint,
            serializer: self.serializer,
            auth: self.auth,
            default_headers: self.default_headers,
        })
    }
}
