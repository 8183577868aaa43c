//! Core types for the reshape HTTP client.
//!
//! This crate is transport-agnostic. It provides:
//! - [`Format`], [`SourceFormat`], [`TargetFormat`] and [`RequestFormat`] - body formats
//! - [`convert()`] and friends - the body-format conversion engine
//! - [`Method`], [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - HTTP response type with format-aware decoding
//! - [`Error`] and [`Result`] - Error handling
//! - [`HttpClient`] and [`HttpClientExt`] - Core client traits
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod body;
mod client;
pub mod convert;
mod error;
mod format;
mod method;
pub mod prelude;
mod request;
mod response;

pub use body::{ContentType, from_json, from_xml, to_form, to_json, to_query_string, to_xml};
pub use client::{HttpClient, HttpClientExt};
pub use convert::{Record, Table, convert, convert_declared, decode, normalize};
pub use error::{Error, Result};
pub use format::{Format, RequestFormat, SourceFormat, TargetFormat};
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
