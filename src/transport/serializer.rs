use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::domain::{ParamMap, ParamValue};

// RFC 3986 unreserved characters stay literal; everything else is
// percent-encoded, including space (as %20, not +).
const RFC3986_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, thiserror::Error)]
/// A payload could not be rendered into the configured wire format.
///
/// These indicate programmer or configuration errors, not remote conditions,
/// and propagate out of the adapter as hard failures.
pub enum SerializationError {
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("value for key {key:?} cannot be encoded")]
    UnsupportedValue { key: String },
}

/// Encodes a payload mapping into a wire body plus content type.
///
/// Implementations are pure functions of their input.
pub trait PayloadSerializer: Send + Sync {
    /// Render the payload into a request body.
    fn serialize(&self, payload: &ParamMap) -> Result<String, SerializationError>;

    /// Content type announced alongside the body.
    fn content_type(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
/// `application/json` bodies via `serde_json`.
///
/// Non-ASCII text is rendered verbatim, not escaped.
pub struct JsonSerializer;

impl PayloadSerializer for JsonSerializer {
    fn serialize(&self, payload: &ParamMap) -> Result<String, SerializationError> {
        Ok(serde_json::to_string(payload)?)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// `application/x-www-form-urlencoded` bodies with RFC 3986 percent-encoding.
pub struct FormSerializer;

impl PayloadSerializer for FormSerializer {
    fn serialize(&self, payload: &ParamMap) -> Result<String, SerializationError> {
        encode_pairs(payload)
    }

    fn content_type(&self) -> &'static str {
        "application/x-www-form-urlencoded"
    }
}

/// Encode a mapping as a URL query string (no leading `?`).
///
/// Uses the same RFC 3986 pair encoding as [`FormSerializer`]; an empty
/// mapping encodes to the empty string.
pub fn encode_query(params: &ParamMap) -> Result<String, SerializationError> {
    encode_pairs(params)
}

fn encode_pairs(params: &ParamMap) -> Result<String, SerializationError> {
    let mut pairs = Vec::new();
    for (key, value) in params.iter() {
        match value {
            // Absent-by-null entries are dropped rather than rendered.
            ParamValue::Null => {}
            ParamValue::List(items) => {
                for item in items {
                    pairs.push(encode_pair(key, scalar_text(key, item)?));
                }
            }
            scalar => pairs.push(encode_pair(key, scalar_text(key, scalar)?)),
        }
    }
    Ok(pairs.join("&"))
}

fn encode_pair(key: &str, value: String) -> String {
    format!(
        "{}={}",
        utf8_percent_encode(key, RFC3986_ENCODE_SET),
        utf8_percent_encode(&value, RFC3986_ENCODE_SET)
    )
}

fn scalar_text(key: &str, value: &ParamValue) -> Result<String, SerializationError> {
    match value {
        ParamValue::Str(text) => Ok(text.clone()),
        ParamValue::Int(number) => Ok(number.to_string()),
        ParamValue::Float(number) if number.is_finite() => Ok(number.to_string()),
        ParamValue::Bool(flag) => Ok(if *flag { "1" } else { "0" }.to_owned()),
        _ => Err(SerializationError::UnsupportedValue {
            key: key.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_serializer_renders_non_ascii_verbatim() {
        let payload = ParamMap::new().with("key", "value").with("jp", "日本語");
        let body = JsonSerializer.serialize(&payload).unwrap();
        assert_eq!(body, r#"{"key":"value","jp":"日本語"}"#);
        assert_eq!(JsonSerializer.content_type(), "application/json");
    }

    #[test]
    fn json_serializer_rejects_non_finite_numbers() {
        let payload = ParamMap::new().with("bad", f64::INFINITY);
        assert!(matches!(
            JsonSerializer.serialize(&payload),
            Err(SerializationError::Json(_))
        ));
    }

    #[test]
    fn form_serializer_percent_encodes_rfc3986() {
        let payload = ParamMap::new().with("key", "value").with("space", "a b");
        let body = FormSerializer.serialize(&payload).unwrap();
        assert_eq!(body, "key=value&space=a%20b");
        assert_eq!(
            FormSerializer.content_type(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn form_serializer_renders_scalars_and_repeats_lists() {
        let payload = ParamMap::new()
            .with("limit", 10)
            .with("test", true)
            .with(
                "ids",
                vec![ParamValue::from("a"), ParamValue::from("b")],
            );
        let body = FormSerializer.serialize(&payload).unwrap();
        assert_eq!(body, "limit=10&test=1&ids=a&ids=b");
    }

    #[test]
    fn form_serializer_drops_null_entries() {
        let payload = ParamMap::new()
            .with("keep", "x")
            .with("skip", ParamValue::Null);
        assert_eq!(FormSerializer.serialize(&payload).unwrap(), "keep=x");
    }

    #[test]
    fn form_serializer_rejects_nested_maps() {
        let payload = ParamMap::new().with("nested", ParamMap::new().with("a", 1));
        let err = FormSerializer.serialize(&payload).unwrap_err();
        assert!(matches!(
            err,
            SerializationError::UnsupportedValue { key } if key == "nested"
        ));
    }

    #[test]
    fn query_encoding_matches_form_encoding_and_handles_empty() {
        let params = ParamMap::new().with("ids", "1,2");
        assert_eq!(encode_query(&params).unwrap(), "ids=1%2C2");
        assert_eq!(encode_query(&ParamMap::new()).unwrap(), "");
    }

    #[test]
    fn reserved_characters_in_keys_are_encoded() {
        let params = ParamMap::new().with("a&b", "c=d");
        assert_eq!(encode_query(&params).unwrap(), "a%26b=c%3Dd");
    }
}
