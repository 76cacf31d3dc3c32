//! Lists scheduled messages, then cancels them.
//!
//! Demonstrates the GET operations: the transformed mapping travels as a
//! query string and credentials stay in headers.

use std::io;
use std::sync::Arc;

use smsbridge::{
    BasicAuth, CancelRequest, GetReservationsRequest, JsonSerializer, MessageId, ParamMap,
    ParamValue, ParseError, ProviderConfig, RequestTransformer, ResponseParser, SendMessageRequest,
    SmsClient, keys,
};

struct DemoTransformer;

impl RequestTransformer for DemoTransformer {
    fn transform_send(&self, request: &SendMessageRequest) -> ParamMap {
        ParamMap::new()
            .with("to", request.to())
            .with("body", request.message())
    }

    fn transform_reservations(&self, request: &GetReservationsRequest) -> ParamMap {
        let mut params = ParamMap::new();
        if let Some(start) = request.start() {
            params.insert("from", start.value() as i64);
        }
        if let Some(end) = request.end() {
            params.insert("to", end.value() as i64);
        }
        if let Some(limit) = request.limit() {
            params.insert("limit", limit);
        }
        params
    }

    fn transform_cancel(&self, request: &CancelRequest) -> ParamMap {
        let ids = request
            .message_ids()
            .iter()
            .map(MessageId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        ParamMap::new().with("ids", ids)
    }
}

struct DemoParser;

impl DemoParser {
    fn common(body: &str) -> Result<(serde_json::Value, ParamMap), ParseError> {
        let json: serde_json::Value = serde_json::from_str(body)?;
        Ok((json, ParamMap::new()))
    }
}

impl ResponseParser for DemoParser {
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
        body: &str,
        _status: u16,
        _request: &GetReservationsRequest,
    ) -> Result<ParamMap, ParseError> {
        let (json, mut parsed) = Self::common(body)?;
        if let Some(items) = json.get("reservations").and_then(|v| v.as_array()) {
            parsed.insert(keys::COUNT, items.len() as i64);
            let records = items
                .iter()
                .map(|item| {
                    let mut record = ParamMap::new();
                    if let Some(id) = item.get("id").and_then(|v| v.as_str()) {
                        record.insert("id", id);
                    }
                    if let Some(to) = item.get("to").and_then(|v| v.as_str()) {
                        record.insert("to", to);
                    }
                    ParamValue::Map(record)
                })
                .collect::<Vec<_>>();
            parsed.insert(keys::RESERVATIONS, records);
        }
        Ok(parsed)
    }

    fn parse_cancel(
        &self,
        body: &str,
        _status: u16,
        _request: &CancelRequest,
    ) -> Result<ParamMap, ParseError> {
        let (json, mut parsed) = Self::common(body)?;
        if let Some(count) = json.get("canceled").and_then(|v| v.as_i64()) {
            parsed.insert(keys::CANCELED_COUNT, count);
        }
        Ok(parsed)
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
    let username = std::env::var("SMS_USERNAME").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS_USERNAME environment variable is required",
        )
    })?;
    let password = std::env::var("SMS_PASSWORD").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS_PASSWORD environment variable is required",
        )
    })?;

    let config = ProviderConfig::builder(base_url)
        .reservations_endpoint("/reservations")
        .cancel_endpoint("/reservations/cancel")
        .serializer(Arc::new(JsonSerializer))
        .auth(Arc::new(BasicAuth::new(username, password)))
        .build()?;
    let client = SmsClient::builder(config, Arc::new(DemoTransformer), Arc::new(DemoParser))
        .user_agent("smsbridge-demo")
        .build()?;

    let listed = client
        .get_reservations(&GetReservationsRequest::new().with_limit(50))
        .await?;
    println!("success: {}, count: {}", listed.success, listed.count);
    if !listed.success {
        println!("error: {:?}", listed.error_message);
        return Ok(());
    }

    let ids = listed
        .reservations
        .iter()
        .filter_map(|record| record.get("id").and_then(ParamValue::as_str))
        .map(MessageId::new)
        .collect::<Result<Vec<_>, _>>()?;
    if ids.is_empty() {
        println!("nothing to cancel");
        return Ok(());
    }

    let canceled = client
        .cancel_reservations(&CancelRequest::new(ids)?)
        .await?;
    println!(
        "success: {}, canceled: {}",
        canceled.success, canceled.canceled_count
    );

    Ok(())
}
