//! Tower middleware layers for the reshape HTTP client.
//!
//! This module provides composable middleware layers that can be applied to
//! the HTTP client using Tower's `Layer` trait. The last layer added is the
//! first to process requests.
//!
//! # Feature Flags
//!
//! Builder helpers are feature-gated; all of them are on by default:
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `middleware-logging` | `.with_logging()` / `.with_debug_logging()` helpers |
//! | `middleware-hooks` | `.with_hooks()` helper |
//! | `middleware-routing` | `.route()` helper |
//!
//! # Available Layers
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//! - [`HooksLayer`] - Runs [`Hook`]s before and after each request
//! - [`RouteLayer`] - Sends matching requests to child clients
//!
//! # Example
//!
//! ```
//! use reshape::HyperClient;
//! use reshape::middleware::{HookMerge, after_response};
//! use reshape::Format;
//!
//! // Quotes served as `text/javascript` are really JSONP.
//! let client = HyperClient::builder()
//!     .with_hooks(
//!         [after_response(|request, response| {
//!             if request.url().path().ends_with(".js") {
//!                 response.set_format(Format::Jsonp);
//!             }
//!             Ok(())
//!         })],
//!         HookMerge::Append,
//!     )
//!     .with_logging()
//!     .build();
//! # let _ = client;
//! ```

mod hooks;
mod logging;
mod route;

pub use hooks::{
    CallHooks, Hook, HookMerge, Hooks, HooksLayer, WithHooks, after_response, before_request,
};
pub use logging::{LogLevel, Logging, LoggingLayer, MAX_LOGGED_BODY, body_preview};
pub use route::{RouteLayer, Routed};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
