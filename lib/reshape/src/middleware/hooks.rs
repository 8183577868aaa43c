//! Request/response hooks.
//!
//! A [`Hook`] sees every request before it is sent, and the request together
//! with its response once the call completes. A client carries its own hooks
//! in a [`HooksLayer`]; a single call may bring more with [`CallHooks`]. The
//! two lists are combined according to a [`HookMerge`] policy.
//!
//! A hook that returns an error aborts the call with that error.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::trace;

use crate::{Error, Request, Response, Result};

/// Observes or amends requests and responses.
pub trait Hook: Send + Sync {
    /// Called before the request is sent.
    fn before(&self, request: &mut Request<Bytes>) -> Result<()> {
        let _ = request;
        Ok(())
    }

    /// Called with the sent request once its response arrived.
    fn after(&self, request: &Request<Bytes>, response: &mut Response<Bytes>) -> Result<()> {
        let _ = (request, response);
        Ok(())
    }
}

/// How the client's hooks combine with the hooks of a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookMerge {
    /// Call hooks run first, then client hooks.
    Prepend,
    /// Client hooks run first, then call hooks.
    #[default]
    Append,
    /// Call hooks replace the client hooks, unless there are none.
    Replace,
    /// Call hooks are ignored, unless the client has none.
    Discard,
}

/// Shared list of hooks.
pub type Hooks = Arc<[Arc<dyn Hook>]>;

/// Hooks for one call, attached as a request extension.
///
/// ```
/// use reshape::{Method, Request};
/// use reshape::middleware::{CallHooks, before_request};
///
/// let url = "https://api.example.com".parse().expect("url");
/// let request = Request::<bytes::Bytes>::builder(Method::Get, url)
///     .extension(CallHooks::new([before_request(|request| {
///         request.headers_mut().insert("X-Trace".into(), "1".into());
///         Ok(())
///     })]))
///     .build();
/// # let _ = request;
/// ```
#[derive(Clone)]
pub struct CallHooks(Hooks);

impl CallHooks {
    /// Collect the hooks for one call.
    pub fn new(hooks: impl IntoIterator<Item = Arc<dyn Hook>>) -> Self {
        Self(hooks.into_iter().collect())
    }
}

impl fmt::Debug for CallHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CallHooks").field(&self.0.len()).finish()
    }
}

struct BeforeFn<F>(F);

impl<F> Hook for BeforeFn<F>
where
    F: Fn(&mut Request<Bytes>) -> Result<()> + Send + Sync,
{
    fn before(&self, request: &mut Request<Bytes>) -> Result<()> {
        (self.0)(request)
    }
}

struct AfterFn<F>(F);

impl<F> Hook for AfterFn<F>
where
    F: Fn(&Request<Bytes>, &mut Response<Bytes>) -> Result<()> + Send + Sync,
{
    fn after(&self, request: &Request<Bytes>, response: &mut Response<Bytes>) -> Result<()> {
        (self.0)(request, response)
    }
}

/// A hook that only runs before the request is sent.
pub fn before_request<F>(f: F) -> Arc<dyn Hook>
where
    F: Fn(&mut Request<Bytes>) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(BeforeFn(f))
}

/// A hook that only runs once the response arrived.
pub fn after_response<F>(f: F) -> Arc<dyn Hook>
where
    F: Fn(&Request<Bytes>, &mut Response<Bytes>) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(AfterFn(f))
}

fn merge(client: &[Arc<dyn Hook>], call: &[Arc<dyn Hook>], policy: HookMerge) -> Vec<Arc<dyn Hook>> {
    match policy {
        HookMerge::Prepend => call.iter().chain(client).cloned().collect(),
        HookMerge::Append => client.iter().chain(call).cloned().collect(),
        HookMerge::Replace if !call.is_empty() => call.to_vec(),
        HookMerge::Discard if client.is_empty() => call.to_vec(),
        HookMerge::Replace | HookMerge::Discard => client.to_vec(),
    }
}

/// Layer that runs client and per-call hooks around each request.
#[derive(Clone)]
pub struct HooksLayer {
    hooks: Hooks,
    merge: HookMerge,
}

impl HooksLayer {
    /// Create a hooks layer.
    pub fn new(hooks: impl IntoIterator<Item = Arc<dyn Hook>>, merge: HookMerge) -> Self {
        Self {
            hooks: hooks.into_iter().collect(),
            merge,
        }
    }
}

impl fmt::Debug for HooksLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HooksLayer")
            .field("hooks", &self.hooks.len())
            .field("merge", &self.merge)
            .finish()
    }
}

impl<S> Layer<S> for HooksLayer {
    type Service = WithHooks<S>;

    fn layer(&self, inner: S) -> Self::Service {
        WithHooks {
            inner,
            hooks: Arc::clone(&self.hooks),
            merge: self.merge,
        }
    }
}

/// Service that runs hooks around each request.
#[derive(Clone)]
pub struct WithHooks<S> {
    inner: S,
    hooks: Hooks,
    merge: HookMerge,
}

impl<S: fmt::Debug> fmt::Debug for WithHooks<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithHooks")
            .field("inner", &self.inner)
            .field("hooks", &self.hooks.len())
            .field("merge", &self.merge)
            .finish()
    }
}

impl<S> Service<Request<Bytes>> for WithHooks<S>
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

    fn call(&mut self, mut request: Request<Bytes>) -> Self::Future {
        let call_hooks = request.extensions_mut().remove::<CallHooks>();
        let call_hooks = call_hooks.as_ref().map_or(&[][..], |hooks| &hooks.0[..]);
        let hooks = merge(&self.hooks, call_hooks, self.merge);

        let mut inner = self.inner.clone();
        if hooks.is_empty() {
            return Box::pin(async move { inner.call(request).await });
        }

        Box::pin(async move {
            trace!(hooks = hooks.len(), "running request hooks");
            for hook in &hooks {
                hook.before(&mut request)?;
            }

            let sent = request.clone();
            let mut response = inner.call(request).await?;

            for hook in &hooks {
                hook.after(&sent, &mut response)?;
            }
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Named(&'static str, Arc<Mutex<Vec<&'static str>>>);

    impl Hook for Named {
        fn before(&self, _request: &mut Request<Bytes>) -> Result<()> {
            self.1.lock().expect("lock").push(self.0);
            Ok(())
        }
    }

    fn named(names: &[&'static str], log: &Arc<Mutex<Vec<&'static str>>>) -> Vec<Arc<dyn Hook>> {
        names
            .iter()
            .map(|&name| Arc::new(Named(name, Arc::clone(log))) as Arc<dyn Hook>)
            .collect()
    }

    fn order(client: &[&'static str], call: &[&'static str], policy: HookMerge) -> Vec<&'static str> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let merged = merge(&named(client, &log), &named(call, &log), policy);

        let url = url::Url::parse("https://example.com").expect("url");
        let mut request = Request::builder(crate::Method::Get, url).build();
        for hook in merged {
            hook.before(&mut request).expect("hook");
        }
        log.lock().expect("lock").clone()
    }

    #[test]
    fn append_runs_client_hooks_first() {
        assert_eq!(order(&["c1", "c2"], &["o1"], HookMerge::Append), ["c1", "c2", "o1"]);
    }

    #[test]
    fn prepend_runs_call_hooks_first() {
        assert_eq!(order(&["c1"], &["o1", "o2"], HookMerge::Prepend), ["o1", "o2", "c1"]);
    }

    #[test]
    fn replace_prefers_call_hooks() {
        assert_eq!(order(&["c1"], &["o1"], HookMerge::Replace), ["o1"]);
        assert_eq!(order(&["c1"], &[], HookMerge::Replace), ["c1"]);
    }

    #[test]
    fn discard_prefers_client_hooks() {
        assert_eq!(order(&["c1"], &["o1"], HookMerge::Discard), ["c1"]);
        assert_eq!(order(&[], &["o1"], HookMerge::Discard), ["o1"]);
    }

    #[test]
    fn default_merge_is_append() {
        assert_eq!(HookMerge::default(), HookMerge::Append);
    }
}
