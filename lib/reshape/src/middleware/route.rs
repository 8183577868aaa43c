//! Child-client routing.
//!
//! A [`RouteLayer`] holds an ordered list of `(predicate, client)` routes.
//! The first route whose predicate accepts the request handles it; a request
//! no route accepts goes to the wrapped service.
//!
//! Apply it outermost so that a routed request skips the parent's other layers.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::util::BoxCloneService;
use tower::{Layer, Service};
use tracing::debug;

use crate::client::SyncService;
use crate::{Error, Request, Response, Result};

type Predicate = Arc<dyn Fn(&Request<Bytes>) -> bool + Send + Sync>;

#[derive(Clone)]
struct Route {
    matches: Predicate,
    service: SyncService,
}

/// Layer that sends matching requests to child clients.
///
/// # Example
///
/// ```
/// use reshape::HyperClient;
/// use reshape::middleware::RouteLayer;
///
/// let quotes = HyperClient::builder().with_debug_logging().build();
/// let routes = RouteLayer::new()
///     .route(|request| request.url().host_str() == Some("quotes.example.com"), quotes);
///
/// let client = HyperClient::builder().layer(routes).build();
/// # let _ = client;
/// ```
#[derive(Clone, Default)]
pub struct RouteLayer {
    routes: Vec<Route>,
}

impl RouteLayer {
    /// Create a layer with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. Routes are tried in the order they were added.
    #[must_use]
    pub fn route<P, S>(mut self, predicate: P, service: S) -> Self
    where
        P: Fn(&Request<Bytes>) -> bool + Send + Sync + 'static,
        S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error>
            + Clone
            + Send
            + 'static,
        S::Future: Send + 'static,
    {
        self.routes.push(Route {
            matches: Arc::new(predicate),
            service: SyncService::new(BoxCloneService::new(service)),
        });
        self
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no route was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for RouteLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteLayer")
            .field("routes", &self.routes.len())
            .finish()
    }
}

impl<S> Layer<S> for RouteLayer {
    type Service = Routed<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Routed {
            inner,
            routes: self.routes.iter().cloned().collect(),
        }
    }
}

/// Service that sends matching requests to child clients.
#[derive(Clone)]
pub struct Routed<S> {
    inner: S,
    routes: Arc<[Route]>,
}

impl<S: fmt::Debug> fmt::Debug for Routed<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routed")
            .field("inner", &self.inner)
            .field("routes", &self.routes.len())
            .finish()
    }
}

impl<S> Service<Request<Bytes>> for Routed<S>
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
        if let Some((index, route)) = self
            .routes
            .iter()
            .enumerate()
            .find(|(_, route)| (route.matches)(&request))
        {
            debug!(route = index, url = %request.url(), "routing request to child client");
            return route.service.call(request);
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}
