//! Base-URL API client wrapper.
//!
//! This module provides [`ApiClient`], a wrapper that combines any [`HttpClient`]
//! with a base URL so that calls can name endpoints by relative path.

use std::future::Future;

use bytes::Bytes;
use url::Url;

use crate::{Error, HttpClient, Method, Request, RequestBuilder, Response, Result};

/// Base-URL API client wrapper.
///
/// Wraps any [`HttpClient`] with a base URL. This is useful for sharing a
/// single HTTP client (with its connection pool and middleware) across
/// several services.
///
/// # Example
///
/// ```
/// use reshape::{ApiClient, HyperClient, Method};
///
/// let http = HyperClient::builder().with_logging().build();
/// let quotes = ApiClient::new(http, "https://quotes.example.com/v1/").expect("base url");
///
/// let request = quotes.request(Method::Get, "stocks.csv").expect("url").build();
/// assert_eq!(request.url().as_str(), "https://quotes.example.com/v1/stocks.csv");
/// ```
#[derive(Debug)]
pub struct ApiClient<C> {
    client: C,
    base_url: Url,
}

impl<C: Clone> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl<C> ApiClient<C> {
    /// Create a new API client with the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(client: C, base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url.as_ref()).map_err(Error::InvalidUrl)?,
        })
    }

    /// Create a new API client with a pre-parsed URL.
    #[must_use]
    pub fn with_url(client: C, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// The base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the base URL.
    ///
    /// Resolution follows URL rules: keep a trailing `/` on the base URL to
    /// resolve below it, and an absolute path or URL replaces it.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not form a valid URL.
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    /// Start a request to `path`, resolved against the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not form a valid URL.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder<Bytes>> {
        Ok(Request::builder(method, self.url(path)?))
    }

    /// Get a reference to the inner HTTP client.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Get a mutable reference to the inner HTTP client.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Consume the wrapper and return the inner HTTP client.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.client
    }
}

impl<C: HttpClient> HttpClient for ApiClient<C> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        self.client.execute(request)
    }
}
