use crate::domain::params::{ParamMap, ParamValue};
use crate::domain::validation::ValidationError;
use crate::domain::value::{MessageId, UnixTimestamp};

#[derive(Debug, Clone)]
/// Request to send (or schedule) one SMS message.
///
/// The core performs no validation of the destination or body; malformed
/// addresses and empty texts are provider concerns, surfaced through the
/// provider's own response.
pub struct SendMessageRequest {
    to: String,
    message: String,
    scheduled_at: Option<UnixTimestamp>,
    additional_params: ParamMap,
}

impl SendMessageRequest {
    /// Create a request for immediate delivery.
    pub fn new(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            message: message.into(),
            scheduled_at: None,
            additional_params: ParamMap::new(),
        }
    }

    /// Schedule delivery instead of sending immediately.
    pub fn with_scheduled_at(mut self, at: UnixTimestamp) -> Self {
        self.scheduled_at = Some(at);
        self
    }

    /// Attach a provider-specific parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.additional_params.insert(key, value);
        self
    }

    /// Destination address as supplied by the caller.
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Message body.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Scheduled delivery time, if any.
    pub fn scheduled_at(&self) -> Option<UnixTimestamp> {
        self.scheduled_at
    }

    /// Provider-specific parameters.
    pub fn additional_params(&self) -> &ParamMap {
        &self.additional_params
    }
}

#[derive(Debug, Clone, Default)]
/// Request to list scheduled, not-yet-delivered messages.
pub struct GetReservationsRequest {
    start: Option<UnixTimestamp>,
    end: Option<UnixTimestamp>,
    limit: Option<u32>,
    offset: Option<u32>,
    additional_params: ParamMap,
}

impl GetReservationsRequest {
    /// Create a request with no window or paging constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict results to reservations scheduled at or after `start`.
    pub fn with_start(mut self, start: UnixTimestamp) -> Self {
        self.start = Some(start);
        self
    }

    /// Restrict results to reservations scheduled at or before `end`.
    pub fn with_end(mut self, end: UnixTimestamp) -> Self {
        self.end = Some(end);
        self
    }

    /// Cap the number of returned reservations.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first `offset` reservations.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Attach a provider-specific parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.additional_params.insert(key, value);
        self
    }

    pub fn start(&self) -> Option<UnixTimestamp> {
        self.start
    }

    pub fn end(&self) -> Option<UnixTimestamp> {
        self.end
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    pub fn additional_params(&self) -> &ParamMap {
        &self.additional_params
    }
}

#[derive(Debug, Clone)]
/// Request to cancel previously scheduled messages.
///
/// Invariant: carries at least one message id; order is preserved.
pub struct CancelRequest {
    message_ids: Vec<MessageId>,
    additional_params: ParamMap,
}

impl CancelRequest {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "message_ids";

    /// Create a validated cancel request.
    pub fn new(message_ids: Vec<MessageId>) -> Result<Self, ValidationError> {
        if message_ids.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self {
            message_ids,
            additional_params: ParamMap::new(),
        })
    }

    /// Attach a provider-specific parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.additional_params.insert(key, value);
        self
    }

    /// Ids to cancel, in caller order.
    pub fn message_ids(&self) -> &[MessageId] {
        &self.message_ids
    }

    pub fn additional_params(&self) -> &ParamMap {
        &self.additional_params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_request_defaults_to_immediate_delivery() {
        let request = SendMessageRequest::new("09012345678", "hello");
        assert_eq!(request.to(), "09012345678");
        assert_eq!(request.message(), "hello");
        assert!(request.scheduled_at().is_none());
        assert!(request.additional_params().is_empty());
    }

    #[test]
    fn send_request_carries_schedule_and_params() {
        let request = SendMessageRequest::new("09012345678", "hello")
            .with_scheduled_at(UnixTimestamp::new(1_700_000_000))
            .with_param("sender", "ACME");
        assert_eq!(
            request.scheduled_at(),
            Some(UnixTimestamp::new(1_700_000_000))
        );
        assert!(request.additional_params().contains_key("sender"));
    }

    #[test]
    fn reservations_request_collects_window_and_paging() {
        let request = GetReservationsRequest::new()
            .with_start(UnixTimestamp::new(100))
            .with_end(UnixTimestamp::new(200))
            .with_limit(10)
            .with_offset(20);
        assert_eq!(request.start(), Some(UnixTimestamp::new(100)));
        assert_eq!(request.end(), Some(UnixTimestamp::new(200)));
        assert_eq!(request.limit(), Some(10));
        assert_eq!(request.offset(), Some(20));
    }

    #[test]
    fn cancel_request_rejects_empty_id_list() {
        let err = CancelRequest::new(Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Empty {
                field: CancelRequest::FIELD
            }
        ));
    }

    #[test]
    fn cancel_request_preserves_id_order() {
        let ids = vec![
            MessageId::new("b").unwrap(),
            MessageId::new("a").unwrap(),
            MessageId::new("c").unwrap(),
        ];
        let request = CancelRequest::new(ids).unwrap();
        let order = request
            .message_ids()
            .iter()
            .map(MessageId::as_str)
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["b", "a", "c"]);
    }
}
