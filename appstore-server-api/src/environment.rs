//! App Store deployment targets.

use std::{fmt, str::FromStr};

use serde::Deserialize;
use url::Url;

use crate::error::ClientError;

/// Base URL of the production App Store Server API.
pub const PRODUCTION_BASE_URL: &str = "https://api.storekit.itunes.apple.com/";

/// Base URL of the sandbox App Store Server API.
pub const SANDBOX_BASE_URL: &str = "https://api.storekit-sandbox.itunes.apple.com/";

/// Sandbox or production.
///
/// The API version is part of each request path (`inApps/v1/...`,
/// `inApps/v2/...`), never of the base URL.
///
/// # Examples
///
/// ```
/// use appstore_server_api::environment::Environment;
///
/// let env: Environment = "sandbox".parse().unwrap();
/// assert_eq!(env.base_url(), "https://api.storekit-sandbox.itunes.apple.com/");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Test purchases made with sandbox accounts.
    #[default]
    Sandbox,
    /// Live purchases.
    Production,
}

impl Environment {
    /// Returns the base URL for this environment, with a trailing slash.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }

    /// Parses [`base_url`](Self::base_url).
    ///
    /// # Errors
    ///
    /// Never fails for the built-in hosts.
    pub fn url(self) -> Result<Url, ClientError> {
        Url::parse(self.base_url())
            .map_err(|e| ClientError::ConfigurationError(format!("invalid base URL: {e}")))
    }

    /// The name the App Store uses in payloads (`Sandbox`, `Production`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "Sandbox",
            Self::Production => "Production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            _ => Err(ClientError::ConfigurationError(format!("unknown environment: {value}"))),
        }
    }
}
