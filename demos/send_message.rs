//! Sends one message through a JSON-over-HTTP provider.
//!
//! The provider wire format here is the simple shape many aggregators use:
//! `POST /messages` with `{"to": ..., "body": ...}` answering `{"id": ...}`.

use std::io;
use std::sync::Arc;

use smsbridge::{
    BearerToken, GetReservationsRequest, JsonSerializer, ParamMap, ParseError, ProviderConfig,
    RequestTransformer, ResponseParser, SendMessageRequest, SmsClient, keys,
};

struct DemoTransformer;

impl RequestTransformer for DemoTransformer {
    fn transform_send(&self, request: &SendMessageRequest) -> ParamMap {
        let mut params = ParamMap::new()
            .with("to", request.to())
            .with("body", request.message());
        if let Some(at) = request.scheduled_at() {
            params.insert("send_at", at.value() as i64);
        }
        params
    }

    fn transform_reservations(&self, _request: &GetReservationsRequest) -> ParamMap {
        ParamMap::new()
    }

    fn transform_cancel(&self, _request: &smsbridge::CancelRequest) -> ParamMap {
        ParamMap::new()
    }
}

struct DemoParser;

impl ResponseParser for DemoParser {
    fn parse_send(
        &self,
        body: &str,
        _status: u16,
        _request: &SendMessageRequest,
    ) -> Result<ParamMap, ParseError> {
        let json: serde_json::Value = serde_json::from_str(body)?;
        let mut parsed = ParamMap::new();
        if let Some(id) = json.get("id").and_then(|v| v.as_str()) {
            parsed.insert(keys::MESSAGE_ID, id);
        }
        if let Some(error) = json.get("error").and_then(|v| v.as_str()) {
            parsed.insert(keys::ERROR_MESSAGE, error);
        }
        Ok(parsed)
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
        _request: &smsbridge::CancelRequest,
    ) -> Result<ParamMap, ParseError> {
        Ok(ParamMap::new())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::var("SMS_BASE_URL").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS_BASE_URL environment variable is required",
        )
    })?;
    let token = std::env::var("SMS_TOKEN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS_TOKEN environment variable is required",
        )
    })?;
    let to = std::env::var("SMS_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS_TO environment variable is required",
        )
    })?;
    let message =
        std::env::var("SMS_MESSAGE").unwrap_or_else(|_| "Hello from smsbridge.".to_owned());

    let config = ProviderConfig::builder(base_url)
        .send_endpoint("/messages")
        .serializer(Arc::new(JsonSerializer))
        .auth(Arc::new(BearerToken::new(token)))
        .build()?;
    let client = SmsClient::builder(config, Arc::new(DemoTransformer), Arc::new(DemoParser))
        .user_agent("smsbridge-demo")
        .build()?;

    let response = client.send_to(to, message).await?;
    println!(
        "success: {}, message_id: {:?}, error: {:?}",
        response.success, response.message_id, response.error_message
    );

    Ok(())
}
