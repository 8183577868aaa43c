//! Body-format conversion.
//!
//! A response body arrives in one format and the caller wants it in another.
//! [`convert`] reads the body with the reader for its [`SourceFormat`],
//! renders it into the expected [`TargetFormat`], then deserializes it:
//!
//! | Source        | Reader                                  |
//! |---------------|-----------------------------------------|
//! | `Json`, `Xml` | [`transcode`](transcode::transcode)     |
//! | `Jsonp`       | [`jsonp::unwrap`], then JSON transcode  |
//! | `Csv`         | [`csv::read`]                           |
//! | `Spreadsheet` | [`spreadsheet::read`]                   |
//!
//! # Example
//!
//! ```
//! use reshape_core::{SourceFormat, TargetFormat, convert};
//! use serde::Deserialize;
//!
//! #[derive(Debug, PartialEq, Deserialize)]
//! struct Stock { code: String, name: String }
//!
//! let body = b"code,name\n000001,Ping An\n";
//! let stocks: Vec<Stock> = convert(TargetFormat::Json, body, SourceFormat::Csv).expect("convert");
//! assert_eq!(stocks, vec![Stock { code: "000001".into(), name: "Ping An".into() }]);
//! ```

pub mod csv;
pub mod jsonp;
pub mod spreadsheet;
mod tabular;
pub mod transcode;
pub mod xml;

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use tracing::debug;

pub use tabular::{Record, Table};
pub use transcode::transcode;

use crate::{Format, Result, SourceFormat, TargetFormat};

/// Render `body` (read as `actual`) into the `expected` format.
///
/// Returns the body untouched when the formats already match.
///
/// # Errors
///
/// Returns [`crate::Error::MalformedInput`] if `body` does not parse as `actual`.
pub fn normalize(
    expected: TargetFormat,
    body: &[u8],
    actual: SourceFormat,
) -> Result<Cow<'_, [u8]>> {
    if SourceFormat::from(expected) == actual {
        return Ok(Cow::Borrowed(body));
    }

    match actual {
        SourceFormat::Json => transcode(body, TargetFormat::Json, expected),
        SourceFormat::Xml => transcode(body, TargetFormat::Xml, expected),
        SourceFormat::Jsonp => transcode(jsonp::unwrap(body)?, TargetFormat::Json, expected),
        SourceFormat::Csv => csv::read(body, expected).map(Cow::Owned),
        SourceFormat::Spreadsheet => spreadsheet::read(body, expected).map(Cow::Owned),
    }
}

/// Deserialize a JSON or XML document.
///
/// # Errors
///
/// Returns a deserialization error if `body` does not fit `T`.
pub fn decode<T: DeserializeOwned>(format: TargetFormat, body: &[u8]) -> Result<T> {
    match format {
        TargetFormat::Json => crate::from_json(body),
        TargetFormat::Xml => crate::from_xml(body),
    }
}

/// Convert a body received as `actual` into a `T` shaped by `expected`.
///
/// Nothing is returned on failure, so a caller's value is never half filled.
///
/// # Errors
///
/// Returns [`crate::Error::MalformedInput`] if `body` does not parse as
/// `actual`, or a deserialization error if the result does not fit `T`.
pub fn convert<T: DeserializeOwned>(
    expected: TargetFormat,
    body: &[u8],
    actual: SourceFormat,
) -> Result<T> {
    debug!(%actual, %expected, len = body.len(), "converting body");
    let normalized = normalize(expected, body, actual)?;
    decode(expected, &normalized)
}

/// [`convert`] over declared [`Format`] values.
///
/// `expected` is checked first: only `Json` and `Xml` can be decoded. An
/// `actual` of [`Format::Default`] means the body was not classified, and it
/// is decoded as `expected` directly.
///
/// # Errors
///
/// Returns [`crate::Error::UnsupportedFormat`] if `expected` is not `Json` or
/// `Xml` or if `actual` is [`Format::UrlQuery`], otherwise as [`convert`].
pub fn convert_declared<T: DeserializeOwned>(
    expected: Format,
    body: &[u8],
    actual: Format,
) -> Result<T> {
    let expected = TargetFormat::try_from(expected)?;
    match actual {
        Format::Default => {
            debug!(%expected, len = body.len(), "decoding unclassified body");
            decode(expected, body)
        }
        declared => convert(expected, body, SourceFormat::try_from(declared)?),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Pair {
        a: String,
        b: String,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Pairs {
        item: Vec<Pair>,
    }

    #[test]
    fn identity_skips_readers() {
        let body = br#"{"a":"1","b":"2"}"#;
        let normalized = normalize(TargetFormat::Json, body, SourceFormat::Json).expect("normalize");
        assert!(matches!(normalized, Cow::Borrowed(_)));

        let pair: Pair = convert(TargetFormat::Json, body, SourceFormat::Json).expect("convert");
        assert_eq!(pair, crate::from_json::<Pair>(body).expect("direct"));
    }

    #[test]
    fn identity_decode_errors_match_direct_decode() {
        let body = br#"{"a":"1"}"#;
        let converted = convert::<Pair>(TargetFormat::Json, body, SourceFormat::Json)
            .expect_err("missing field");
        let direct = crate::from_json::<Pair>(body).expect_err("missing field");
        assert_eq!(converted.to_string(), direct.to_string());
    }

    #[test]
    fn csv_to_json() {
        let pairs: Vec<Pair> =
            convert(TargetFormat::Json, b"a,b\n1,2\n", SourceFormat::Csv).expect("convert");
        assert_eq!(
            pairs,
            vec![Pair {
                a: "1".to_string(),
                b: "2".to_string()
            }]
        );
    }

    #[test]
    fn csv_to_xml() {
        let pairs: Pairs =
            convert(TargetFormat::Xml, b"a,b\n1,2\n3,4\n", SourceFormat::Csv).expect("convert");
        assert_eq!(pairs.item.len(), 2);
        assert_eq!(pairs.item.last().map(|p| p.b.as_str()), Some("4"));
    }

    #[test]
    fn jsonp_to_json() {
        let body = br#"jsonpCallback15325({"a": "b"})"#;
        let normalized =
            normalize(TargetFormat::Json, body, SourceFormat::Jsonp).expect("normalize");
        assert_eq!(&*normalized, br#"{"a": "b"}"#);

        let value: Value = convert(TargetFormat::Json, body, SourceFormat::Jsonp).expect("convert");
        assert_eq!(value, json!({ "a": "b" }));
    }

    #[test]
    fn jsonp_to_xml() {
        let normalized = normalize(TargetFormat::Xml, br#"cb({"a": "b"})"#, SourceFormat::Jsonp)
            .expect("normalize");
        assert_eq!(&*normalized, b"<root><a>b</a></root>");
    }

    #[test]
    fn xml_to_json_struct() {
        let pair: Pair = convert(
            TargetFormat::Json,
            b"<pair><a>x</a><b>y</b></pair>",
            SourceFormat::Xml,
        )
        .expect("convert");
        assert_eq!(pair.a, "x");
        assert_eq!(pair.b, "y");
    }

    #[test]
    fn json_to_xml_struct() {
        #[derive(Debug, Deserialize)]
        struct User {
            name: String,
            age: u32,
            tags: Vec<String>,
        }

        let body = br#"{"name":"Alice","age":30,"tags":["a","b"]}"#;
        let user: User = convert(TargetFormat::Xml, body, SourceFormat::Json).expect("convert");
        assert_eq!(user.name, "Alice");
        assert_eq!(user.age, 30);
        assert_eq!(user.tags, vec!["a", "b"]);
    }

    #[test]
    fn reader_errors_short_circuit() {
        let err = convert::<Value>(TargetFormat::Json, b"not jsonp", SourceFormat::Jsonp)
            .expect_err("bad wrapper");
        assert!(err.is_malformed_input());

        let err = convert::<Value>(TargetFormat::Json, b"", SourceFormat::Csv)
            .expect_err("empty grid");
        assert!(err.is_malformed_input());
    }

    #[test]
    fn declared_rejects_non_decodable_expectation() {
        for expected in [
            Format::Csv,
            Format::Spreadsheet,
            Format::Jsonp,
            Format::UrlQuery,
            Format::Default,
        ] {
            let err = convert_declared::<Value>(expected, b"{}", Format::Json)
                .expect_err("unsupported");
            assert!(err.is_unsupported_format(), "{expected}: {err}");
        }
    }

    #[test]
    fn declared_rejects_url_query_source() {
        let err = convert_declared::<Value>(Format::Json, b"a=1", Format::UrlQuery)
            .expect_err("unsupported");
        assert!(err.is_unsupported_format());
    }

    #[test]
    fn declared_default_source_decodes_directly() {
        let value: Value =
            convert_declared(Format::Json, br#"{"ok":true}"#, Format::Default).expect("decode");
        assert_eq!(value, json!({ "ok": true }));

        let err = convert_declared::<Value>(Format::Json, b"a,b", Format::Default)
            .expect_err("not json");
        assert!(err.is_deserialization());
    }

    #[test]
    fn declared_csv_source() {
        let pairs: Vec<Pair> =
            convert_declared(Format::Json, b"a,b\n1,2\n", Format::Csv).expect("convert");
        assert_eq!(pairs.len(), 1);
    }
}
