//! HTTP client traits.
//!
//! - [`HttpClient`] - Low-level HTTP execution
//! - [`HttpClientExt`] - Convenience methods, including [`fetch`](HttpClientExt::fetch)
//!   which executes a request and decodes whatever format the server answered with

use std::future::Future;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::{Request, Response, Result, TargetFormat};

/// Core HTTP client trait.
///
/// This trait defines the interface for executing HTTP requests.
/// Implementations should be async-first and support connection pooling.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid response
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

/// Extension trait for [`HttpClient`] with convenience methods.
pub trait HttpClientExt: HttpClient {
    /// Execute a request and decode the response body into `T`.
    ///
    /// The body is read in the format its `Content-Type` declares and
    /// rendered as `expected` before decoding. Non-2xx responses fail with
    /// [`crate::Error::Http`] carrying the body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 2xx, or the
    /// body cannot be converted.
    fn fetch<T: DeserializeOwned + Send>(
        &self,
        request: Request<Bytes>,
        expected: TargetFormat,
    ) -> impl Future<Output = Result<T>> + Send {
        async move {
            let response = self.execute(request).await?;
            if !response.is_success() {
                let status = response.status();
                return Err(crate::Error::http_with_body(
                    status,
                    format!("unexpected status {status}"),
                    response.into_body(),
                ));
            }
            response.decode(expected)
        }
    }

    /// Execute a GET request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn get(&self, url: &str) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        async move {
            let url = url::Url::parse(url)?;
            let request = Request::builder(crate::Method::Get, url).build();
            self.execute(request).await
        }
    }

    /// Execute a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the request fails.
    fn post_json<T: serde::Serialize + Send + Sync>(
        &self,
        url: &str,
        body: &T,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        async move {
            let url = url::Url::parse(url)?;
            let request = Request::builder(crate::Method::Post, url)
                .json(body)?
                .build();
            self.execute(request).await
        }
    }

    /// Execute a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn delete(&self, url: &str) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        async move {
            let url = url::Url::parse(url)?;
            let request = Request::builder(crate::Method::Delete, url).build();
            self.execute(request).await
        }
    }
}

// Blanket implementation for all HttpClient implementors
impl<T: HttpClient> HttpClientExt for T {}
