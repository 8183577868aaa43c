//! JSON ↔ XML transcoding through a [`Value`] tree.

use std::borrow::Cow;

use serde_json::Value;

use super::xml;
use crate::{Error, Result, TargetFormat};

/// Re-render `body` from one structured format into another.
///
/// Identical formats return the body untouched. Otherwise the body is decoded
/// into a [`Value`] tree and encoded again; XML ↔ JSON is a structural,
/// best-effort mapping (see [`xml`]).
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if `body` does not decode as `from`.
pub fn transcode(body: &[u8], from: TargetFormat, to: TargetFormat) -> Result<Cow<'_, [u8]>> {
    if from == to {
        return Ok(Cow::Borrowed(body));
    }

    let value = decode_value(body, from)?;
    encode_value(&value, to).map(Cow::Owned)
}

/// Decode a JSON or XML document into a [`Value`] tree.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if `body` does not decode as `format`.
pub fn decode_value(body: &[u8], format: TargetFormat) -> Result<Value> {
    match format {
        TargetFormat::Json => {
            serde_json::from_slice(body).map_err(|e| Error::malformed(format, e.to_string()))
        }
        TargetFormat::Xml => xml::to_value(body),
    }
}

/// Encode a [`Value`] tree as a JSON or XML document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_value(value: &Value, format: TargetFormat) -> Result<Vec<u8>> {
    match format {
        TargetFormat::Json => serde_json::to_vec(value).map_err(Into::into),
        TargetFormat::Xml => xml::from_value(value),
    }
}
