//! Domain layer: strong types with validation and invariants (no I/O).

mod params;
mod request;
mod response;
mod validation;
mod value;

pub use params::{ParamMap, ParamValue};
pub use request::{CancelRequest, GetReservationsRequest, SendMessageRequest};
pub use response::{CancelResponse, GetReservationsResponse, SendMessageResponse};
pub use validation::ValidationError;
pub use value::{MessageId, PhoneNumber, UnixTimestamp};
