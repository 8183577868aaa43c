//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```
//! use reshape::prelude::*;
//! ```

pub use crate::{
    ApiClient, ClientConfig, ContentType, Error, Format, HttpClient, HttpClientExt, HyperClient,
    Method, Request, RequestBuilder, RequestFormat, Response, Result, SourceFormat, StatusCode,
    TargetFormat, convert, from_json, header, to_json,
};
pub use serde::{Deserialize, Serialize};
