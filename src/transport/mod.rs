//! Transport layer: HTTP and wire-format details (auth, serialization, query
//! encoding, the HTTP capability and its `reqwest` implementation).

mod auth;
mod http;
mod serializer;

pub use auth::{AUTHORIZATION, AuthStrategy, BasicAuth, BearerToken, NoAuth};
pub use http::{BoxFuture, Headers, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use serializer::{
    FormSerializer, JsonSerializer, PayloadSerializer, SerializationError, encode_query,
};
