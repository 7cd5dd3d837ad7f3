//! HTTP transport abstraction.
//!
//! The client never talks to the network directly. It builds a
//! [`TransportRequest`] and hands it to a [`Transport`], which returns the raw
//! [`TransportResponse`] whatever its status. Classifying the status is the
//! dispatcher's job, not the transport's.
//!
//! [`HttpTransport`] is the reqwest-backed implementation. Tests and callers
//! with special networking needs can plug in their own.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use appstore_server_api::transport::{HttpTransport, Transport, TransportRequest};
//! use url::Url;
//!
//! # async fn example() -> appstore_server_api::error::Result<()> {
//! let transport = HttpTransport::new()?;
//!
//! let request = TransportRequest {
//!     method: "GET".to_owned(),
//!     url: Url::parse("https://api.storekit-sandbox.itunes.apple.com/inApps/v1/notifications/test/abc")
//!         .expect("valid url"),
//!     headers: vec![("Authorization".to_owned(), "Bearer eyJ...".to_owned())],
//!     body: None,
//!     timeout: Duration::from_secs(5),
//! };
//!
//! let response = transport.send(request).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;
use std::time::Duration;

use url::Url;

use crate::error::Result;

pub mod config;
pub mod http;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// One outbound HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Upper-case HTTP method.
    pub method: String,
    /// Absolute URL, query string included.
    pub url: Url,
    /// Request headers.
    pub headers: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<String>,
    /// Deadline for the whole exchange.
    pub timeout: Duration,
}

impl TransportRequest {
    /// Returns the first header value with the given name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response from a transport.
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase for the status, empty if unknown.
    pub reason: String,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    /// Returns true for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends requests over the network.
///
/// Implementations must return every HTTP response, success or not, and
/// fail only when no response was received, with
/// [`ClientError::TransportError`](crate::error::ClientError::TransportError).
pub trait Transport: Send + Sync {
    /// Sends one request and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TransportError`](crate::error::ClientError::TransportError)
    /// on connection, TLS or timeout failures.
    fn send(&self, request: TransportRequest)
    -> impl Future<Output = Result<TransportResponse>> + Send;
}
