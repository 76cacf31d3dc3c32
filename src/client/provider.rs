use std::error::Error as StdError;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::SmsClientError;
use crate::client::config::ProviderConfig;
use crate::domain::{
    CancelRequest, CancelResponse, GetReservationsRequest, GetReservationsResponse, ParamMap,
    ParamValue, SendMessageRequest, SendMessageResponse,
};
use crate::transport::{
    BoxFuture, Headers, HttpResponse, HttpTransport, SerializationError, TransportError,
    encode_query,
};

/// Normalized mapping keys the adapter reads when building typed responses.
///
/// A [`ResponseParser`] fills in whichever of these it can recover; the
/// adapter substitutes documented defaults for the rest.
pub mod keys {
    /// Boolean. Defaults to the HTTP-success predicate when omitted.
    pub const SUCCESS: &str = "success";
    /// String id of the accepted message.
    pub const MESSAGE_ID: &str = "message_id";
    /// Human-readable failure detail. Synthesized when omitted on failure.
    pub const ERROR_MESSAGE: &str = "error_message";
    /// Integer reservation count. Defaults to 0.
    pub const COUNT: &str = "count";
    /// List of reservation records (maps); non-map elements are ignored.
    pub const RESERVATIONS: &str = "reservations";
    /// Integer count of canceled messages. Defaults to 0.
    pub const CANCELED_COUNT: &str = "canceled_count";
    /// List of canceled id strings; non-string elements are ignored.
    pub const CANCELED_IDS: &str = "canceled_ids";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Failure taxonomy used when synthesizing error messages.
///
/// Diagnostic only: classification never changes control flow.
pub enum ErrorKind {
    Network,
    Authentication,
    Validation,
    Provider,
    Timeout,
    RateLimit,
}

impl ErrorKind {
    /// Short human-readable description used as an error-message prefix.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Authentication => "authentication failed",
            Self::Validation => "validation error",
            Self::Provider => "provider error",
            Self::Timeout => "operation timed out",
            Self::RateLimit => "rate limit exceeded",
        }
    }
}

/// Map a non-2xx HTTP status to a failure kind.
pub fn classify_status(status: u16) -> ErrorKind {
    match status {
        401 | 403 => ErrorKind::Authentication,
        400 | 422 => ErrorKind::Validation,
        408 => ErrorKind::Timeout,
        429 => ErrorKind::RateLimit,
        _ => ErrorKind::Provider,
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
/// A response body could not be normalized by a [`ResponseParser`].
///
/// The adapter treats this as a provider failure and converts it into an
/// unsuccessful response; it never reaches the caller as an error.
pub struct ParseError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

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

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(format!("invalid json: {err}"), err)
    }
}

/// Maps typed requests into the provider's expected key/value shape.
///
/// Implementations must be pure functions with no network or state access.
/// The adapter does not validate the returned mapping's shape.
pub trait RequestTransformer: Send + Sync {
    fn transform_send(&self, request: &SendMessageRequest) -> ParamMap;
    fn transform_reservations(&self, request: &GetReservationsRequest) -> ParamMap;
    fn transform_cancel(&self, request: &CancelRequest) -> ParamMap;
}

/// Maps a raw provider response into the normalized [`keys`] mapping.
///
/// Parsers should tolerate malformed bodies by returning whatever fields they
/// can recover. Returning an error is allowed; the adapter treats it as a
/// provider failure.
pub trait ResponseParser: Send + Sync {
    fn parse_send(
        &self,
        body: &str,
        status: u16,
        request: &SendMessageRequest,
    ) -> Result<ParamMap, ParseError>;

    fn parse_reservations(
        &self,
        body: &str,
        status: u16,
        request: &GetReservationsRequest,
    ) -> Result<ParamMap, ParseError>;

    fn parse_cancel(
        &self,
        body: &str,
        status: u16,
        request: &CancelRequest,
    ) -> Result<ParamMap, ParseError>;
}

/// The three SMS operations every provider backend exposes.
///
/// Object-safe so tests and integrators can substitute in-memory fakes for
/// the HTTP-backed implementation.
pub trait SmsProvider: Send + Sync {
    fn send_message<'a>(
        &'a self,
        request: &'a SendMessageRequest,
    ) -> BoxFuture<'a, Result<SendMessageResponse, SmsClientError>>;

    fn get_reservations<'a>(
        &'a self,
        request: &'a GetReservationsRequest,
    ) -> BoxFuture<'a, Result<GetReservationsResponse, SmsClientError>>;

    fn cancel_reservations<'a>(
        &'a self,
        request: &'a CancelRequest,
    ) -> BoxFuture<'a, Result<CancelResponse, SmsClientError>>;
}

/// Outcome of one HTTP exchange, tagged by failure origin.
enum Exchange {
    Completed(HttpResponse),
    TransportFailed(TransportError),
}

#[derive(Clone)]
/// Generic HTTP-backed provider: composes a request transformer, an auth
/// strategy, a payload serializer, an HTTP transport, and a response parser
/// into one request/response cycle per operation.
///
/// Remote conditions (transport failures and non-2xx statuses) are absorbed
/// here and converted into typed responses with `success == false`; they are
/// never raised to the caller. Serialization failures indicate configuration
/// errors and do propagate. There is no retry loop and no state shared
/// between calls.
pub struct HttpProvider {
    config: ProviderConfig,
    transformer: Arc<dyn RequestTransformer>,
    parser: Arc<dyn ResponseParser>,
    http: Arc<dyn HttpTransport>,
}

impl HttpProvider {
    pub fn new(
        config: ProviderConfig,
        transformer: Arc<dyn RequestTransformer>,
        parser: Arc<dyn ResponseParser>,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            config,
            transformer,
            parser,
            http,
        }
    }

    /// Send (or schedule) one message via `POST <baseUrl><sendEndpoint>`.
    ///
    /// The transformed payload gets payload auth applied before
    /// serialization; headers are the defaults plus the serializer's
    /// `Content-Type`, with header auth applied last.
    pub async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, SmsClientError> {
        let payload = self.transformer.transform_send(request);
        let payload = self.config.auth().apply_to_payload(payload);
        let body = self.config.serializer().serialize(&payload)?;
        let headers = self.post_headers();
        let url = format!("{}{}", self.config.base_url(), self.config.send_endpoint());

        debug!(url = %url, "dispatching send message");
        let exchange = match self.http.post(&url, &body, &headers).await {
            Ok(response) => Exchange::Completed(response),
            Err(err) => Exchange::TransportFailed(err),
        };
        Ok(self.build_send_response(request, exchange))
    }

    /// List scheduled messages via `GET <baseUrl><reservationsEndpoint>`.
    ///
    /// GET requests carry no body, so payload auth is not applied here;
    /// payload-shaped credentials would otherwise leak into the query string.
    /// Only header credentials are attached.
    pub async fn get_reservations(
        &self,
        request: &GetReservationsRequest,
    ) -> Result<GetReservationsResponse, SmsClientError> {
        let payload = self.transformer.transform_reservations(request);
        let url = self.get_url(self.config.reservations_endpoint(), &payload)?;
        let headers = self.get_headers();

        debug!(url = %url, "dispatching get reservations");
        let exchange = match self.http.get(&url, &headers).await {
            Ok(response) => Exchange::Completed(response),
            Err(err) => Exchange::TransportFailed(err),
        };
        Ok(self.build_reservations_response(request, exchange))
    }

    /// Cancel scheduled messages via `GET <baseUrl><cancelEndpoint>`.
    ///
    /// Same auth asymmetry as [`HttpProvider::get_reservations`].
    pub async fn cancel_reservations(
        &self,
        request: &CancelRequest,
    ) -> Result<CancelResponse, SmsClientError> {
        let payload = self.transformer.transform_cancel(request);
        let url = self.get_url(self.config.cancel_endpoint(), &payload)?;
        let headers = self.get_headers();

        debug!(url = %url, "dispatching cancel reservations");
        let exchange = match self.http.get(&url, &headers).await {
            Ok(response) => Exchange::Completed(response),
            Err(err) => Exchange::TransportFailed(err),
        };
        Ok(self.build_cancel_response(request, exchange))
    }

    fn post_headers(&self) -> Headers {
        let mut headers = self.config.default_headers().clone();
        headers.insert(
            "Content-Type".to_owned(),
            self.config.serializer().content_type().to_owned(),
        );
        self.config.auth().apply_to_headers(headers)
    }

    fn get_headers(&self) -> Headers {
        self.config
            .auth()
            .apply_to_headers(self.config.default_headers().clone())
    }

    fn get_url(&self, endpoint: &str, params: &ParamMap) -> Result<String, SerializationError> {
        let mut url = format!("{}{}", self.config.base_url(), endpoint);
        let query = encode_query(params)?;
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }

    fn build_send_response(
        &self,
        request: &SendMessageRequest,
        exchange: Exchange,
    ) -> SendMessageResponse {
        match self.normalize(exchange, "send message", |body, status| {
            self.parser.parse_send(body, status, request)
        }) {
            Err(error_message) => SendMessageResponse {
                success: false,
                message_id: None,
                error_message: Some(error_message),
                raw: ParamMap::new(),
            },
            Ok((response, parsed)) => {
                let success = resolved_success(&parsed, &response);
                SendMessageResponse {
                    success,
                    message_id: parsed
                        .get(keys::MESSAGE_ID)
                        .and_then(ParamValue::as_str)
                        .map(str::to_owned),
                    error_message: resolved_error(success, "send message", &response, &parsed),
                    raw: parsed,
                }
            }
        }
    }

    fn build_reservations_response(
        &self,
        request: &GetReservationsRequest,
        exchange: Exchange,
    ) -> GetReservationsResponse {
        match self.normalize(exchange, "get reservations", |body, status| {
            self.parser.parse_reservations(body, status, request)
        }) {
            Err(error_message) => GetReservationsResponse {
                success: false,
                count: 0,
                reservations: Vec::new(),
                error_message: Some(error_message),
                raw: ParamMap::new(),
            },
            Ok((response, parsed)) => {
                let success = resolved_success(&parsed, &response);
                GetReservationsResponse {
                    success,
                    count: parsed
                        .get(keys::COUNT)
                        .and_then(ParamValue::as_u64)
                        .unwrap_or(0),
                    reservations: parsed
                        .get(keys::RESERVATIONS)
                        .and_then(ParamValue::as_list)
                        .map(|items| {
                            items
                                .iter()
                                .filter_map(ParamValue::as_map)
                                .cloned()
                                .collect()
                        })
                        .unwrap_or_default(),
                    error_message: resolved_error(success, "get reservations", &response, &parsed),
                    raw: parsed,
                }
            }
        }
    }

    fn build_cancel_response(&self, request: &CancelRequest, exchange: Exchange) -> CancelResponse {
        match self.normalize(exchange, "cancel reservations", |body, status| {
            self.parser.parse_cancel(body, status, request)
        }) {
            Err(error_message) => CancelResponse {
                success: false,
                canceled_count: 0,
                canceled_ids: Vec::new(),
                error_message: Some(error_message),
                raw: ParamMap::new(),
            },
            Ok((response, parsed)) => {
                let success = resolved_success(&parsed, &response);
                CancelResponse {
                    success,
                    canceled_count: parsed
                        .get(keys::CANCELED_COUNT)
                        .and_then(ParamValue::as_u64)
                        .unwrap_or(0),
                    canceled_ids: parsed
                        .get(keys::CANCELED_IDS)
                        .and_then(ParamValue::as_list)
                        .map(|items| {
                            items
                                .iter()
                                .filter_map(ParamValue::as_str)
                                .map(str::to_owned)
                                .collect()
                        })
                        .unwrap_or_default(),
                    error_message: resolved_error(
                        success,
                        "cancel reservations",
                        &response,
                        &parsed,
                    ),
                    raw: parsed,
                }
            }
        }
    }

    /// Resolve an exchange into the parsed mapping, or into the error message
    /// the unsuccessful response should carry.
    ///
    /// Non-2xx responses are still parsed; providers often put structured
    /// error detail in their error bodies.
    fn normalize(
        &self,
        exchange: Exchange,
        operation: &str,
        parse: impl FnOnce(&str, u16) -> Result<ParamMap, ParseError>,
    ) -> Result<(HttpResponse, ParamMap), String> {
        match exchange {
            Exchange::TransportFailed(err) => {
                warn!(operation, error = %err, "transport failure converted to response");
                Err(err.to_string())
            }
            Exchange::Completed(response) => match parse(&response.body, response.status) {
                Ok(parsed) => Ok((response, parsed)),
                Err(err) => {
                    warn!(operation, error = %err, "unparseable provider response");
                    Err(format!("{operation} response could not be parsed: {err}"))
                }
            },
        }
    }
}

impl SmsProvider for HttpProvider {
    fn send_message<'a>(
        &'a self,
        request: &'a SendMessageRequest,
    ) -> BoxFuture<'a, Result<SendMessageResponse, SmsClientError>> {
        Box::pin(HttpProvider::send_message(self, request))
    }

    fn get_reservations<'a>(
        &'a self,
        request: &'a GetReservationsRequest,
    ) -> BoxFuture<'a, Result<GetReservationsResponse, SmsClientError>> {
        Box::pin(HttpProvider::get_reservations(self, request))
    }

    fn cancel_reservations<'a>(
        &'a self,
        request: &'a CancelRequest,
    ) -> BoxFuture<'a, Result<CancelResponse, SmsClientError>> {
        Box::pin(HttpProvider::cancel_reservations(self, request))
    }
}

fn resolved_success(parsed: &ParamMap, response: &HttpResponse) -> bool {
    parsed
        .get(keys::SUCCESS)
        .and_then(ParamValue::as_bool)
        .unwrap_or_else(|| response.is_success())
}

fn resolved_error(
    success: bool,
    operation: &str,
    response: &HttpResponse,
    parsed: &ParamMap,
) -> Option<String> {
    let reported = parsed
        .get(keys::ERROR_MESSAGE)
        .and_then(ParamValue::as_str)
        .map(str::to_owned);
    if success {
        return reported;
    }
    Some(reported.unwrap_or_else(|| {
        if response.is_success() {
            format!("{operation} rejected by provider")
        } else {
            status_error_message(operation, response)
        }
    }))
}

fn status_error_message(operation: &str, response: &HttpResponse) -> String {
    let kind = classify_status(response.status);
    let mut message = format!(
        "{}: {operation} failed with status code {}",
        kind.describe(),
        response.status
    );
    let body = response.body.trim();
    if !body.is_empty() {
        message.push_str(": ");
        message.push_str(body);
    }
    if kind == ErrorKind::RateLimit {
        let retry_after = response
            .headers
            .get("Retry-After")
            .or_else(|| response.headers.get("retry-after"));
        if let Some(retry_after) = retry_after {
            message.push_str(&format!(" (retry after {retry_after})"));
        }
    }
    message
}
