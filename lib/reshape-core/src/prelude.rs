//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```
//! use reshape_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Error, Format, HttpClient, HttpClientExt, Method, Request, RequestBuilder,
    RequestFormat, Response, Result, SourceFormat, TargetFormat, convert, convert_declared,
    from_json, from_xml, to_form, to_json, to_xml,
};
