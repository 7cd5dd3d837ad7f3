//! HTTP transport configuration.
//!
//! Deserialized from the `[http]` table of the client configuration:
//!
//! ```toml
//! [http]
//! pool_max_idle_per_host = 10
//! connect_timeout_secs = 5
//! http_version = "http2"
//! ```
//!
//! The per-request timeout is not set here; the client passes it with every
//! request.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{ClientError, Result};

/// HTTP transport configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    /// Maximum idle connections per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// HTTP version preference.
    #[serde(default)]
    pub http_version: HttpVersion,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: default_pool_max_idle(),
            connect_timeout_secs: default_connect_timeout_secs(),
            http_version: HttpVersion::default(),
        }
    }
}

impl HttpConfig {
    /// Validates configuration values are within acceptable bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if `connect_timeout_secs`
    /// is outside 1-60 seconds.
    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 60 {
            return Err(ClientError::ConfigurationError(
                "connect_timeout_secs must be between 1 and 60".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns connect timeout as Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// HTTP version preference.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HttpVersion {
    /// HTTP/1.1 only.
    Http1,
    /// HTTP/2 only (prior knowledge).
    Http2,
    /// Negotiate via ALPN.
    #[default]
    Auto,
}

const fn default_pool_max_idle() -> usize {
    10
}

const fn default_connect_timeout_secs() -> u64 {
    10
}
