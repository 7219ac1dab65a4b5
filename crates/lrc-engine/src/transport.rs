//! Request transport
//!
//! [`Transport`] is the engine's only suspension point. [`HttpTransport`]
//! is the reqwest-backed implementation; tests substitute their own.

use crate::config::CacheConfig;
use crate::error::TransportError;
use async_trait::async_trait;
use lrc_query::{Descriptor, Method};
use serde_json::Value;
use std::time::Duration;

/// One outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Method
    pub method: Method,
    /// Path relative to the transport base, or an absolute URL
    pub url: String,
    /// JSON body
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Request described by a descriptor
    #[must_use]
    pub fn from_descriptor<D: Descriptor + ?Sized>(descriptor: &D) -> Self {
        Self {
            method: descriptor.method(),
            url: descriptor.url().to_string(),
            body: descriptor.body().cloned(),
        }
    }
}

/// One response; any status is a response, not an error
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body; `None` for empty bodies
    pub body: Option<Value>,
}

impl HttpResponse {
    /// `200` with a JSON body
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    /// Bodiless response with `status`
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    /// Whether the status is 2xx
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Convert a non-2xx response into [`TransportError::Status`]
    ///
    /// # Errors
    /// Returns the status error for non-2xx responses
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self
            .body
            .as_ref()
            .and_then(|body| body.get("detail"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        Err(TransportError::status(self.status, message))
    }
}

/// Sends requests on behalf of the engine
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request
    ///
    /// # Errors
    /// Returns error when no response was received. Non-2xx answers are
    /// returned as responses.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// JSON-over-HTTP transport on `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create transport for `base_url` with a per-request timeout
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create transport from configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn from_config(config: &CacheConfig) -> Result<Self, TransportError> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    /// Base URL requests are resolved against
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `url` (pagination links are already absolute)
    #[must_use]
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", self.base_url, url)
        }
    }
}

fn map_reqwest_error(e: &reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.resolve(&request.url);
        tracing::debug!("HTTP {} {}", request.method, url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| map_reqwest_error(&e))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| map_reqwest_error(&e))?;

        let body = if bytes.is_empty() {
            None
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(e) if status.is_success() => return Err(TransportError::Decode(e.to_string())),
                // Error pages are often HTML; the status is what matters.
                Err(_) => None,
            }
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}
