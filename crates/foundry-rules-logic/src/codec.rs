//! Wire codec for rule logic.
//!
//! The platform stores rule logic as an LZ-string "encoded URI component"
//! wrapped in a two-field envelope:
//!
//! ```json
//! {"compressedValue": "<opaque>", "type": "compressedValue"}
//! ```
//!
//! The envelope shape is a compatibility contract and must not change.

use serde_json::{Value, json};

use crate::error::{LogicError, Result};

/// Value of the envelope's `type` field.
pub const ENVELOPE_TYPE: &str = "compressedValue";

/// Characters the URI-safe encoding may produce. A space is also accepted
/// on input, since form encoding turns `+` into a space.
const URI_SAFE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-$";

/// Compress a rule-logic document into the envelope JSON string.
pub fn compress(document: &Value) -> String {
    let compressed = compress_to_encoded_uri_component(&document.to_string());
    json!({
        "compressedValue": compressed,
        "type": ENVELOPE_TYPE,
    })
    .to_string()
}

/// Decompress an envelope JSON string back into the original document.
pub fn decompress(envelope: &str) -> Result<Value> {
    let wrapper: Value = serde_json::from_str(envelope)
        .map_err(|e| LogicError::MalformedEnvelope(format!("not valid JSON: {}", e)))?;

    let compressed = match wrapper.get("compressedValue") {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::String(_)) | Some(Value::Null) | None => {
            return Err(LogicError::MalformedEnvelope(
                "missing compressedValue in wrapper".to_string(),
            ));
        }
        Some(other) => {
            return Err(LogicError::MalformedEnvelope(format!(
                "compressedValue must be a string, got: {}",
                other
            )));
        }
    };

    let text = decompress_from_encoded_uri_component(compressed)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LogicError::DecodeFailure("invalid compressed value".to_string()))?;

    serde_json::from_str(&text).map_err(|e| {
        LogicError::DecodeFailure(format!("decompressed text is not valid JSON: {}", e))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// LZ-string (encoded URI component variant)
// ─────────────────────────────────────────────────────────────────────────────

/// Compress text with LZ-string into a URI-safe string.
pub fn compress_to_encoded_uri_component(input: &str) -> String {
    lz_str::compress_to_encoded_uri_component(input)
}

/// Inverse of [`compress_to_encoded_uri_component`].
///
/// Returns `None` when the input is empty, contains characters outside the
/// alphabet, or does not decode to valid UTF-16.
pub fn decompress_from_encoded_uri_component(input: &str) -> Option<String> {
    if input.is_empty()
        || !input
            .bytes()
            .all(|b| b == b' ' || URI_SAFE_ALPHABET.contains(&b))
    {
        return None;
    }

    let units = lz_str::decompress_from_encoded_uri_component(input)?;
    String::from_utf16(&units).ok()
}
