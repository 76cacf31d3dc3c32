use serde::Serialize;

use crate::domain::params::ParamMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Result of a send operation.
///
/// Built exclusively by the provider adapter; `raw` always carries the
/// parser's normalized mapping for diagnostics, even on success. Transport
/// and provider failures arrive here as `success == false` with a populated
/// `error_message`; they are never raised to the caller.
pub struct SendMessageResponse {
    pub success: bool,
    pub message_id: Option<String>,
    pub error_message: Option<String>,
    pub raw: ParamMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Result of a list-reservations operation.
pub struct GetReservationsResponse {
    pub success: bool,
    pub count: u64,
    pub reservations: Vec<ParamMap>,
    pub error_message: Option<String>,
    pub raw: ParamMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Result of a cancel-reservations operation.
pub struct CancelResponse {
    pub success: bool,
    pub canceled_count: u64,
    pub canceled_ids: Vec<String>,
    pub error_message: Option<String>,
    pub raw: ParamMap,
}
