//! Request/response logging middleware.
//!
//! At [`LogLevel::Info`] one line is logged per request and per outcome. At
//! [`LogLevel::Debug`] headers and bodies are logged too, each body cut at
//! [`MAX_LOGGED_BODY`] bytes.

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{Error, Request, Response, Result};

/// Largest body prefix written to the debug log.
pub const MAX_LOGGED_BODY: usize = 16 * 1024;

/// Layer that adds request/response logging.
///
/// # Example
///
/// ```
/// use reshape::HyperClient;
/// use reshape::middleware::LoggingLayer;
///
/// let client = HyperClient::builder()
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogLevel {
    /// Log at debug level (headers and bodies).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs requests and responses.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

/// Render a body for the log, cut at [`MAX_LOGGED_BODY`] bytes with a `...` marker.
#[must_use]
pub fn body_preview(body: &[u8]) -> Cow<'_, str> {
    match body.get(..MAX_LOGGED_BODY) {
        Some(head) if body.len() > MAX_LOGGED_BODY => {
            Cow::Owned(format!("{}...", String::from_utf8_lossy(head)))
        }
        _ => String::from_utf8_lossy(body),
    }
}

impl<S> Service<Request<Bytes>> for Logging<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let method = request.method();
        let url = request.url().to_string();
        let level = self.level;

        let span = span!(Level::INFO, "http_request", %method, %url);

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();

                match level {
                    LogLevel::Debug => {
                        let body = request.body().map(|body| body_preview(body));
                        debug!(
                            headers = ?request.headers(),
                            body = body.as_deref().unwrap_or_default(),
                            "> sending request"
                        );
                    }
                    LogLevel::Info => {
                        info!("sending request");
                    }
                }

                let result = inner.call(request).await;
                let elapsed = start.elapsed();

                // Saturating conversion to u64 (truncates after ~584 million years)
                let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        let status = response.status();
                        let format = response.format();
                        if response.is_success() {
                            info!(status, %format, elapsed_ms, "request completed");
                        } else {
                            warn!(status, %format, elapsed_ms, "request failed with HTTP error");
                        }
                        if matches!(level, LogLevel::Debug) {
                            debug!(
                                headers = ?response.headers(),
                                body = %body_preview(response.body()),
                                "< received response"
                            );
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
