//! Client layer: provider wiring and the outward-facing facade.

mod config;
mod provider;

pub use config::{ProviderConfig, ProviderConfigBuilder};
pub use provider::{
    ErrorKind, HttpProvider, ParseError, RequestTransformer, ResponseParser, SmsProvider,
    classify_status, keys,
};

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    CancelRequest, CancelResponse, GetReservationsRequest, GetReservationsResponse,
    SendMessageRequest, SendMessageResponse, ValidationError,
};
use crate::transport::{HttpTransport, ReqwestTransport, SerializationError, TransportError};

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsClient`] operations.
///
/// Only programmer and configuration errors surface here. Remote conditions
/// (transport failures, non-2xx statuses, unparseable bodies) never do; they
/// arrive as typed responses with `success == false`.
pub enum SmsClientError {
    /// A domain constructor or the config builder rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The configured serializer could not encode the payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// The HTTP client could not be constructed at wiring time.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),
}

#[derive(Clone)]
/// Outward-facing SMS client.
///
/// Pure delegation to the wired [`SmsProvider`]; all orchestration lives in
/// the provider adapter. Cheap to clone, and clones share the provider.
pub struct SmsClient {
    provider: Arc<dyn SmsProvider>,
}

impl SmsClient {
    /// Wrap an already-constructed provider.
    pub fn new(provider: Arc<dyn SmsProvider>) -> Self {
        Self { provider }
    }

    /// Start building an HTTP-backed client.
    pub fn builder(
        config: ProviderConfig,
        transformer: Arc<dyn RequestTransformer>,
        parser: Arc<dyn ResponseParser>,
    ) -> SmsClientBuilder {
        SmsClientBuilder::new(config, transformer, parser)
    }

    /// Send (or schedule) one SMS message.
    pub async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, SmsClientError> {
        self.provider.send_message(request).await
    }

    /// Convenience: send an immediate message from bare parts.
    pub async fn send_to(
        &self,
        to: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<SendMessageResponse, SmsClientError> {
        let request = SendMessageRequest::new(to, message);
        self.send_message(&request).await
    }

    /// List scheduled, not-yet-delivered messages.
    pub async fn get_reservations(
        &self,
        request: &GetReservationsRequest,
    ) -> Result<GetReservationsResponse, SmsClientError> {
        self.provider.get_reservations(request).await
    }

    /// Cancel previously scheduled messages.
    pub async fn cancel_reservations(
        &self,
        request: &CancelRequest,
    ) -> Result<CancelResponse, SmsClientError> {
        self.provider.cancel_reservations(request).await
    }
}

/// Builder for an HTTP-backed [`SmsClient`].
///
/// Wires a [`ReqwestTransport`] by default; tests and exotic setups can
/// substitute any [`HttpTransport`].
pub struct SmsClientBuilder {
    config: ProviderConfig,
    transformer: Arc<dyn RequestTransformer>,
    parser: Arc<dyn ResponseParser>,
    transport: Option<Arc<dyn HttpTransport>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SmsClientBuilder {
    /// Create a builder with the default transport and no timeout or
    /// user-agent override.
    pub fn new(
        config: ProviderConfig,
        transformer: Arc<dyn RequestTransformer>,
        parser: Arc<dyn ResponseParser>,
    ) -> Self {
        Self {
            config,
            transformer,
            parser,
            transport: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Set an HTTP timeout applied to the entire exchange.
    ///
    /// Ignored when a custom transport is supplied: timeout is a transport
    /// concern and a custom transport brings its own.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header. Ignored when a custom
    /// transport is supplied.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Substitute a custom transport (in-memory fake, instrumented client).
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build an [`SmsClient`] backed by an [`HttpProvider`].
    pub fn build(self) -> Result<SmsClient, SmsClientError> {
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                let client = builder.build().map_err(|err| {
                    SmsClientError::Transport(TransportError::with_source(err.to_string(), err))
                })?;
                Arc::new(ReqwestTransport::from_client(client))
            }
        };

        let provider = HttpProvider::new(self.config, self.transformer, self.parser, transport);
        Ok(SmsClient::new(Arc::new(provider)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::domain::{MessageId, ParamMap};
    use crate::transport::{BoxFuture, Headers, HttpResponse, JsonSerializer, NoAuth};

    use super::*;

    /// In-memory provider that records which operation was invoked.
    #[derive(Clone, Default)]
    struct RecordingProvider {
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl SmsProvider for RecordingProvider {
        fn send_message<'a>(
            &'a self,
            request: &'a SendMessageRequest,
        ) -> BoxFuture<'a, Result<SendMessageResponse, SmsClientError>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push("send");
                Ok(SendMessageResponse {
                    success: true,
                    message_id: Some(format!("echo:{}", request.to())),
                    error_message: None,
                    raw: ParamMap::new(),
                })
            })
        }

        fn get_reservations<'a>(
            &'a self,
            _request: &'a GetReservationsRequest,
        ) -> BoxFuture<'a, Result<GetReservationsResponse, SmsClientError>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push("list");
                Ok(GetReservationsResponse {
                    success: true,
                    count: 0,
                    reservations: Vec::new(),
                    error_message: None,
                    raw: ParamMap::new(),
                })
            })
        }

        fn cancel_reservations<'a>(
            &'a self,
            request: &'a CancelRequest,
        ) -> BoxFuture<'a, Result<CancelResponse, SmsClientError>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push("cancel");
                Ok(CancelResponse {
                    success: true,
                    canceled_count: request.message_ids().len() as u64,
                    canceled_ids: request
                        .message_ids()
                        .iter()
                        .map(|id| id.as_str().to_owned())
                        .collect(),
                    error_message: None,
                    raw: ParamMap::new(),
                })
            })
        }
    }

    struct EchoTransformer;

    impl RequestTransformer for EchoTransformer {
        fn transform_send(&self, request: &SendMessageRequest) -> ParamMap {
            ParamMap::new().with("to", request.to())
        }

        fn transform_reservations(&self, _request: &GetReservationsRequest) -> ParamMap {
            ParamMap::new()
        }

        fn transform_cancel(&self, _request: &CancelRequest) -> ParamMap {
            ParamMap::new()
        }
    }

    struct EmptyParser;

    impl ResponseParser for EmptyParser {
        fn parse_send(
            &self,
            _body: &str,
            _status: u16,
            _request: &SendMessageRequest,
        ) -> Result<ParamMap, ParseError> {
            Ok(ParamMap::new())
        }

        fn parse_reservations(
            &self,
            _body: &str,
            _status: u16,
            _request: &GetReservationsRequest,
        ) -> Result<ParamMap, ParseError> {
            Ok(ParamMap::new())
        }

        fn parse_cancel(
            &self,
            _body: &str,
            _status: u16,
            _request: &CancelRequest,
        ) -> Result<ParamMap, ParseError> {
            Ok(ParamMap::new())
        }
    }

    #[derive(Clone)]
    struct StaticTransport;

    impl HttpTransport for StaticTransport {
        fn post<'a>(
            &'a self,
            _url: &'a str,
            _body: &'a str,
            _headers: &'a Headers,
        ) -> BoxFuture<'a, Result<HttpResponse, crate::transport::TransportError>> {
            Box::pin(async {
                Ok(HttpResponse {
                    status: 200,
                    body: String::new(),
                    headers: Headers::new(),
                })
            })
        }

        fn get<'a>(
            &'a self,
            _url: &'a str,
            _headers: &'a Headers,
        ) -> BoxFuture<'a, Result<HttpResponse, crate::transport::TransportError>> {
            Box::pin(async {
                Ok(HttpResponse {
                    status: 200,
                    body: String::new(),
                    headers: Headers::new(),
                })
            })
        }
    }

    #[tokio::test]
    async fn facade_delegates_each_operation_to_the_provider() {
        let provider = RecordingProvider::default();
        let client = SmsClient::new(Arc::new(provider.clone()));

        let send = client
            .send_message(&SendMessageRequest::new("0901", "hi"))
            .await
            .unwrap();
        assert_eq!(send.message_id.as_deref(), Some("echo:0901"));

        client
            .get_reservations(&GetReservationsRequest::new())
            .await
            .unwrap();

        let cancel = client
            .cancel_reservations(
                &CancelRequest::new(vec![MessageId::new("m1").unwrap()]).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(cancel.canceled_count, 1);

        assert_eq!(
            provider.calls.lock().unwrap().as_slice(),
            &["send", "list", "cancel"]
        );
    }

    #[tokio::test]
    async fn send_to_assembles_an_immediate_request() {
        let provider = RecordingProvider::default();
        let client = SmsClient::new(Arc::new(provider));

        let response = client.send_to("0901", "hi").await.unwrap();
        assert_eq!(response.message_id.as_deref(), Some("echo:0901"));
    }

    #[tokio::test]
    async fn builder_uses_the_substituted_transport() {
        let config = ProviderConfig::builder("https://api.example.com")
            .serializer(Arc::new(JsonSerializer))
            .auth(Arc::new(NoAuth))
            .build()
            .unwrap();
        let client = SmsClient::builder(config, Arc::new(EchoTransformer), Arc::new(EmptyParser))
            .transport(Arc::new(StaticTransport))
            .build()
            .unwrap();

        let response = client.send_to("0901", "hi").await.unwrap();
        // EmptyParser recovers nothing, so success falls back to the HTTP
        // predicate of StaticTransport's 200.
        assert!(response.success);
        assert!(response.message_id.is_none());
        assert!(response.raw.is_empty());
    }

    #[test]
    fn builder_constructs_the_default_transport() {
        let config = ProviderConfig::builder("https://api.example.com")
            .build()
            .unwrap();
        let client = SmsClient::builder(config, Arc::new(EchoTransformer), Arc::new(EmptyParser))
            .timeout(Duration::from_secs(5))
            .user_agent("smsbridge-test")
            .build();
        assert!(client.is_ok());
    }
}
