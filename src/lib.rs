//! Provider-agnostic SMS client SDK for HTTP-backed providers.
//!
//! The design keeps the three operations (send message, list reservations,
//! cancel reservations) behind one abstract interface while each provider's
//! wire format is supplied through pluggable strategies: a request
//! transformer, an auth strategy, a payload serializer, an HTTP transport,
//! and a response parser. The [`HttpProvider`] adapter composes those into a
//! single request/response cycle and absorbs transport and provider failures
//! into typed responses, so callers have one failure idiom: check `success`.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use smsbridge::{
//!     BearerToken, JsonSerializer, ParamMap, ParseError, ProviderConfig, RequestTransformer,
//!     ResponseParser, SendMessageRequest, SmsClient, keys,
//! };
//!
//! struct AcmeTransformer;
//!
//! impl RequestTransformer for AcmeTransformer {
//!     fn transform_send(&self, request: &SendMessageRequest) -> ParamMap {
//!         ParamMap::new()
//!             .with("to", request.to())
//!             .with("body", request.message())
//!     }
//!     # fn transform_reservations(
//!     #     &self,
//!     #     _request: &smsbridge::GetReservationsRequest,
//!     # ) -> ParamMap {
//!     #     ParamMap::new()
//!     # }
//!     # fn transform_cancel(&self, _request: &smsbridge::CancelRequest) -> ParamMap {
//!     #     ParamMap::new()
//!     # }
//! }
//!
//! struct AcmeParser;
//!
//! impl ResponseParser for AcmeParser {
//!     fn parse_send(
//!         &self,
//!         body: &str,
//!         _status: u16,
//!         _request: &SendMessageRequest,
//!     ) -> Result<ParamMap, ParseError> {
//!         let json: serde_json::Value = serde_json::from_str(body)?;
//!         let mut parsed = ParamMap::new();
//!         if let Some(id) = json.get("id").and_then(|v| v.as_str()) {
//!             parsed.insert(keys::MESSAGE_ID, id);
//!         }
//!         Ok(parsed)
//!     }
//!     # fn parse_reservations(
//!     #     &self,
//!     #     _body: &str,
//!     #     _status: u16,
//!     #     _request: &smsbridge::GetReservationsRequest,
//!     # ) -> Result<ParamMap, ParseError> {
//!     #     Ok(ParamMap::new())
//!     # }
//!     # fn parse_cancel(
//!     #     &self,
//!     #     _body: &str,
//!     #     _status: u16,
//!     #     _request: &smsbridge::CancelRequest,
//!     # ) -> Result<ParamMap, ParseError> {
//!     #     Ok(ParamMap::new())
//!     # }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smsbridge::SmsClientError> {
//!     let config = ProviderConfig::builder("https://api.acme-sms.example")
//!         .send_endpoint("/v1/messages")
//!         .serializer(Arc::new(JsonSerializer))
//!         .auth(Arc::new(BearerToken::new("token")))
//!         .build()?;
//!     let client =
//!         SmsClient::builder(config, Arc::new(AcmeTransformer), Arc::new(AcmeParser)).build()?;
//!
//!     let response = client.send_to("+819012345678", "hello").await?;
//!     if !response.success {
//!         eprintln!("send failed: {:?}", response.error_message);
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod transport;

pub use client::{
    ErrorKind, HttpProvider, ParseError, ProviderConfig, ProviderConfigBuilder, RequestTransformer,
    ResponseParser, SmsClient, SmsClientBuilder, SmsClientError, SmsProvider, classify_status, keys,
};
pub use domain::{
    CancelRequest, CancelResponse, GetReservationsRequest, GetReservationsResponse, MessageId,
    ParamMap, ParamValue, PhoneNumber, SendMessageRequest, SendMessageResponse, UnixTimestamp,
    ValidationError,
};
pub use transport::{
    AUTHORIZATION, AuthStrategy, BasicAuth, BearerToken, BoxFuture, FormSerializer, Headers,
    HttpResponse, HttpTransport, JsonSerializer, NoAuth, PayloadSerializer, ReqwestTransport,
    SerializationError, TransportError, encode_query,
};
