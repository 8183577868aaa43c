//! HTTP response handling.
//!
//! [`Response`] provides access to status, headers, and body, and runs the
//! body through the conversion engine on decode.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use bytes::Bytes;
//! use reshape_core::{Format, Response, TargetFormat};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Quote { code: String, price: String }
//!
//! let headers = HashMap::from([("content-type".to_string(), "text/csv".to_string())]);
//! let response = Response::new(200, headers, Bytes::from("code,price\nAAPL,187.3\n"));
//!
//! assert_eq!(response.format(), Format::Csv);
//! let quotes: Vec<Quote> = response.decode(TargetFormat::Json).expect("decode");
//! assert_eq!(quotes[0].price, "187.3");
//! ```

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::{Format, TargetFormat};

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
    format: Option<Format>,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
            format: None,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// The `Content-Type` header, whatever its case.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }

    /// The declared body format.
    ///
    /// A format set with [`Response::with_format`] wins; otherwise it is
    /// detected from the `Content-Type` header.
    #[must_use]
    pub fn format(&self) -> Format {
        self.format.unwrap_or_else(|| {
            self.content_type()
                .map_or(Format::Default, Format::from_content_type)
        })
    }

    /// Declare the real format of the body, e.g. [`Format::Jsonp`] for a
    /// callback-wrapped payload served as `text/javascript`.
    #[must_use]
    pub const fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// In-place form of [`Response::with_format`].
    pub const fn set_format(&mut self, format: Format) {
        self.format = Some(format);
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HashMap<String, String>, B) {
        (self.status, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 3xx.
    #[must_use]
    pub const fn is_redirection(&self) -> bool {
        self.status >= 300 && self.status < 400
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Transform the body with a function.
    pub fn map_body<F, B2>(self, f: F) -> Response<B2>
    where
        F: FnOnce(B) -> B2,
    {
        Response {
            status: self.status,
            headers: self.headers,
            body: f(self.body),
            format: self.format,
        }
    }
}

impl Response<Bytes> {
    /// Deserialize the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }

    /// Deserialize the response body as XML.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn xml<T: DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_xml(&self.body)
    }

    /// Get the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Convert the body from its declared [`format`](Response::format) and
    /// decode it as `expected`.
    ///
    /// # Errors
    ///
    /// See [`convert_declared`](crate::convert_declared).
    pub fn decode<T: DeserializeOwned>(&self, expected: TargetFormat) -> crate::Result<T> {
        crate::convert_declared(expected.into(), &self.body, self.format())
    }

    /// [`Response::decode`] with a declared expectation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnsupportedFormat`] if `expected` cannot be
    /// decoded into, otherwise as [`Response::decode`].
    pub fn decode_declared<T: DeserializeOwned>(&self, expected: Format) -> crate::Result<T> {
        crate::convert_declared(expected, &self.body, self.format())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn response(content_type: &str, body: &'static str) -> Response {
        let headers = HashMap::from([("Content-Type".to_string(), content_type.to_string())]);
        Response::new(200, headers, Bytes::from(body))
    }

    #[test]
    fn response_basic() {
        let response = response("application/json", r#"{"id":1}"#);

        assert_eq!(response.status(), 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert!(response.is_success());
        assert!(!response.is_client_error());
        assert!(!response.is_server_error());
    }

    #[test]
    fn response_status_checks() {
        let response = Response::new(301, HashMap::new(), Bytes::new());
        assert!(response.is_redirection());

        let response = Response::new(404, HashMap::new(), Bytes::new());
        assert!(response.is_client_error());

        let response = Response::new(500, HashMap::new(), Bytes::new());
        assert!(response.is_server_error());
    }

    #[test]
    fn response_json() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct User {
            id: u64,
            name: String,
        }

        let response = response("application/json", r#"{"id":1,"name":"test"}"#);

        let user: User = response.json().expect("deserialize");
        assert_eq!(
            user,
            User {
                id: 1,
                name: "test".to_string()
            }
        );
    }

    #[test]
    fn response_text() {
        let response = Response::new(200, HashMap::new(), Bytes::from("Hello, World!"));

        let text = response.text().expect("text");
        assert_eq!(text, "Hello, World!");
    }

    #[test]
    fn response_map_body() {
        let response = Response::new(200, HashMap::new(), Bytes::from("test"))
            .with_format(Format::Csv);
        let mapped = response.map_body(|b| b.len());

        assert_eq!(mapped.status(), 200);
        assert_eq!(*mapped.body(), 4);
        assert_eq!(mapped.format(), Format::Csv);
    }

    #[test]
    fn format_from_content_type_any_case() {
        let headers = HashMap::from([("content-TYPE".to_string(), "text/csv".to_string())]);
        let response = Response::new(200, headers, Bytes::new());
        assert_eq!(response.content_type(), Some("text/csv"));
        assert_eq!(response.format(), Format::Csv);

        assert_eq!(
            Response::new(200, HashMap::new(), Bytes::new()).format(),
            Format::Default
        );
    }

    #[test]
    fn with_format_overrides_content_type() {
        let response = response("text/javascript", r#"cb({"a":"b"})"#);
        assert_eq!(response.format(), Format::Default);

        let mut response = response.with_format(Format::Json);
        response.set_format(Format::Jsonp);
        assert_eq!(response.format(), Format::Jsonp);

        let value: Value = response.decode(TargetFormat::Json).expect("decode");
        assert_eq!(value, json!({ "a": "b" }));
    }

    #[test]
    fn decode_xml_body_as_json() {
        #[derive(Debug, serde::Deserialize)]
        struct Book {
            title: String,
        }

        let response = response("application/xml", "<book><title>Dune</title></book>");
        let book: Book = response.decode(TargetFormat::Json).expect("decode");
        assert_eq!(book.title, "Dune");
    }

    #[test]
    fn decode_unclassified_body_directly() {
        let response = response("text/plain", r#"{"ok":true}"#);
        let value: Value = response.decode(TargetFormat::Json).expect("decode");
        assert_eq!(value, json!({ "ok": true }));
    }

    #[test]
    fn decode_declared_rejects_csv_expectation() {
        let response = response("text/csv", "a\n1\n");
        let err = response
            .decode_declared::<Value>(Format::Csv)
            .expect_err("unsupported");
        assert!(err.is_unsupported_format());
    }
}
