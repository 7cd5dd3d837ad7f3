//! Error types for the App Store Server API client.
//!
//! Every fallible operation in this crate returns [`Result<T>`], whose error
//! side is [`ClientError`]. Variants map one-to-one onto the failure categories
//! a caller has to tell apart.
//!
//! # Error Categories
//!
//! - **Configuration** ([`ClientError::ConfigurationError`]): bad key material or
//!   an invalid [`ClientConfig`](crate::client::ClientConfig)
//! - **Caller misuse** ([`ClientError::BadMethod`], [`ClientError::BadPath`]):
//!   rejected by the dispatcher before any network activity
//! - **Network** ([`ClientError::TransportError`]): the request never produced
//!   an HTTP response
//! - **Remote** ([`ClientError::ApiError`]): the App Store answered with a
//!   non-success status
//! - **Inbound** ([`ClientError::BadRequest`]): a malformed notification body
//!
//! # Examples
//!
//! ```
//! use appstore_server_api::error::{ClientError, Result};
//!
//! fn require_transaction_id(id: &str) -> Result<&str> {
//!     if id.is_empty() {
//!         return Err(ClientError::BadPath("transaction id must not be empty".to_owned()));
//!     }
//!     Ok(id)
//! }
//!
//! assert!(require_transaction_id("2000000000000001").is_ok());
//! ```

use thiserror::Error;

/// Result type alias for client operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the App Store Server API.
///
/// None of these are retried by the client. Retry policy, if any, belongs to
/// the caller.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum ClientError {
    /// Signing key material or client configuration is invalid.
    ///
    /// Raised when the private key cannot be parsed as an EC P-256 key, when
    /// token signing fails, or when [`ClientConfig::validate`](crate::client::ClientConfig::validate)
    /// rejects a value.
    ///
    /// # Recovery
    ///
    /// Fatal for the current configuration. Check the `.p8` key file, the key
    /// id and the issuer id in App Store Connect.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// The HTTP method passed to [`call_api`](crate::client::AppStoreServerApiClient::call_api)
    /// is not one of `GET`, `HEAD`, `POST`, `PUT`, `DELETE`, `PATCH`.
    #[error("Bad method: {0}")]
    BadMethod(String),

    /// The request path is outside the `inApps/` namespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use appstore_server_api::error::ClientError;
    ///
    /// let err = ClientError::BadPath("/google".to_owned());
    /// assert_eq!(err.to_string(), "Bad path: /google");
    /// ```
    #[error("Bad path: {0}")]
    BadPath(String),

    /// Network-level failure: connection refused, DNS, TLS or timeout.
    ///
    /// The message is the transport's own description of the failure.
    #[error("HTTP transport failed: {0}")]
    TransportError(String),

    /// The App Store returned a non-2xx status.
    ///
    /// `code` and `message` come from the JSON error body when present;
    /// otherwise `code` is `0` and `message` is the HTTP reason phrase.
    ///
    /// # Examples
    ///
    /// ```
    /// use appstore_server_api::error::ClientError;
    ///
    /// let err = ClientError::ApiError {
    ///     code: 4_040_010,
    ///     message: "Transaction id not found.".to_owned(),
    ///     http_status: 404,
    /// };
    /// assert_eq!(err.api_code(), Some(4_040_010));
    /// assert_eq!(err.http_status(), Some(404));
    /// ```
    #[error("App Store error {code} (HTTP {http_status}): {message}")]
    ApiError {
        /// Numeric App Store error code, `0` when the body carried none.
        code: i64,
        /// Human-readable message.
        message: String,
        /// HTTP status that triggered the error.
        http_status: u16,
    },

    /// An inbound notification body is malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A JSON source handed to a strict model constructor is not valid JSON.
    ///
    /// Only [`Model::try_from_json`](crate::model::Model::try_from_json)
    /// produces this; the lenient constructors keep default field values instead.
    #[error("JSON parse error: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Returns the App Store error code for [`ApiError`](Self::ApiError).
    #[must_use]
    pub const fn api_code(&self) -> Option<i64> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns the HTTP status for [`ApiError`](Self::ApiError).
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::ApiError { http_status, .. } => Some(*http_status),
            _ => None,
        }
    }

    /// Returns true if the remote service rejected the request.
    #[must_use]
    pub const fn is_api_error(&self) -> bool {
        matches!(self, Self::ApiError { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        Self::TransportError(error.to_string())
    }
}

impl From<josekit::JoseError> for ClientError {
    fn from(error: josekit::JoseError) -> Self {
        Self::ConfigurationError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ClientError::BadMethod("TRACE".into());
        assert_eq!(error.to_string(), "Bad method: TRACE");
    }

    #[test]
    fn test_api_error_display() {
        let error = ClientError::ApiError {
            code: 4_000_006,
            message: "Invalid transaction id.".to_owned(),
            http_status: 400,
        };
        assert_eq!(error.to_string(), "App Store error 4000006 (HTTP 400): Invalid transaction id.");
        assert!(error.is_api_error());
    }

    #[test]
    fn test_non_api_error_accessors() {
        let error = ClientError::TransportError("connection refused".into());
        assert_eq!(error.api_code(), None);
        assert_eq!(error.http_status(), None);
        assert!(!error.is_api_error());
    }

    #[test]
    fn test_configuration_error() {
        let error = ClientError::ConfigurationError("invalid PEM".into());
        assert!(error.to_string().contains("configuration error"));
    }

    #[test]
    fn test_bad_request_error() {
        let error = ClientError::BadRequest("Incorrect notification body".to_owned());
        assert_eq!(error.to_string(), "Bad request: Incorrect notification body");
    }
}
