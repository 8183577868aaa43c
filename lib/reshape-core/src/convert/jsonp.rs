//! JSONP unwrapping.

use crate::{Error, Result, SourceFormat};

/// Strip a `callback( ... )` wrapper, returning the bytes between the first
/// `(` and the last `)`.
///
/// The inner payload is not validated; that is left to the JSON decoder.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if either delimiter is missing or the
/// closing parenthesis comes before the opening one.
pub fn unwrap(body: &[u8]) -> Result<&[u8]> {
    let open = body.iter().position(|&b| b == b'(');
    let close = body.iter().rposition(|&b| b == b')');

    match (open, close) {
        (Some(open), Some(close)) if open < close => body
            .get(open + 1..close)
            .ok_or_else(|| Error::malformed(SourceFormat::Jsonp, "not a valid JSONP wrapper")),
        _ => Err(Error::malformed(
            SourceFormat::Jsonp,
            "not a valid JSONP wrapper",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_callback() {
        let inner = unwrap(br#"jsonpCallback15325({"a": "b"})"#).expect("unwrap");
        assert_eq!(inner, br#"{"a": "b"}"#);
    }

    #[test]
    fn keeps_inner_parentheses_and_trailing_semicolon() {
        let inner = unwrap(br#"cb({"f": "g(x)"});"#).expect("unwrap");
        assert_eq!(inner, br#"{"f": "g(x)"}"#);
    }

    #[test]
    fn empty_payload() {
        assert_eq!(unwrap(b"cb()").expect("unwrap"), b"");
    }

    #[test]
    fn rejects_missing_or_reversed_delimiters() {
        for body in [&b"{\"a\": 1}"[..], b"cb({\"a\": 1}", b"cb{\"a\": 1})", b")(", b""] {
            let err = unwrap(body).expect_err("not jsonp");
            assert!(err.is_malformed_input());
            assert_eq!(err.to_string(), "malformed jsonp body: not a valid JSONP wrapper");
        }
    }
}
