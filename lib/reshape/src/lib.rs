//! HTTP client that decodes whatever a server answers with.
//!
//! Responses arrive as JSON, XML, CSV, JSONP or spreadsheets. `reshape`
//! detects the body format from `Content-Type` (or takes it from a hook),
//! renders the body as the JSON or XML your type expects, and decodes it.
//!
//! # Example
//!
//! ```no_run
//! use reshape::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Stock {
//!     code: String,
//!     name: String,
//! }
//!
//! # async fn run() -> reshape::Result<()> {
//! let api = ApiClient::new(HyperClient::new(), "https://quotes.example.com/")?;
//! let request = api.request(Method::Get, "stocks.csv")?.build();
//!
//! // `text/csv` rows become one `Stock` per line.
//! let stocks: Vec<Stock> = api.fetch(request, TargetFormat::Json).await?;
//! # let _ = stocks;
//! # Ok(())
//! # }
//! ```

mod api_client;
mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;

// Re-export client types
pub use api_client::ApiClient;
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_TIMEOUT};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use reshape_core::{
    ContentType, Error, Format, HttpClient, HttpClientExt, Method, Record, Request,
    RequestBuilder, RequestFormat, Response, Result, SourceFormat, Table, TargetFormat, convert,
    convert_declared, decode, from_json, from_xml, normalize, to_form, to_json, to_query_string,
    to_xml,
};

// Re-export http types for status codes and headers
pub use reshape_core::{StatusCode, header};

pub use url;
