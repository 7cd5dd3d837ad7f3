//! Per-request bearer tokens.
//!
//! Every App Store Server API request carries a freshly minted ES256 JWT:
//!
//! - `iss`: issuer id of the API key
//! - `iat`: now minus a 10 second clock-skew margin
//! - `exp`: now plus the token TTL, minus the same margin
//! - `aud`: always `appstoreconnect-v1`
//! - `nonce`: random v4 UUID, never reused
//! - `bid`: bundle id of the active bundle
//!
//! Tokens are never cached.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiKey, Bundle, Es256Signer, JwsSigner};
use crate::error::Result;

/// Audience claim shared by every App Store Server API version.
pub const AUDIENCE: &str = "appstoreconnect-v1";

/// Seconds subtracted from `iat` and `exp` to absorb clock skew.
pub const CLOCK_SKEW_SECS: i64 = 10;

/// Default token lifetime in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Claims of an App Store Server API token.
///
/// # Examples
///
/// ```
/// use appstore_server_api::auth::TokenClaims;
///
/// let claims = TokenClaims::new("issuer-id", "com.example.app", 3600);
/// assert_eq!(claims.aud, "appstoreconnect-v1");
/// assert_eq!(claims.exp - claims.iat, 3600);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Issuer id of the API key.
    pub iss: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiration, Unix seconds.
    pub exp: i64,
    /// Fixed audience, see [`AUDIENCE`].
    pub aud: String,
    /// Random per-request nonce.
    pub nonce: String,
    /// Bundle identifier.
    pub bid: String,
}

impl TokenClaims {
    /// Creates claims issued now.
    #[must_use]
    pub fn new(issuer_id: &str, bundle_id: &str, ttl_secs: u64) -> Self {
        Self::at(Utc::now().timestamp(), issuer_id, bundle_id, ttl_secs)
    }

    /// Creates claims as if issued at `now` (Unix seconds).
    #[must_use]
    pub fn at(now: i64, issuer_id: &str, bundle_id: &str, ttl_secs: u64) -> Self {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);

        Self {
            iss: issuer_id.to_owned(),
            iat: now - CLOCK_SKEW_SECS,
            exp: now.saturating_add(ttl) - CLOCK_SKEW_SECS,
            aud: AUDIENCE.to_owned(),
            nonce: Uuid::new_v4().to_string(),
            bid: bundle_id.to_owned(),
        }
    }
}

/// Mints one token per request for a fixed API key.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: ApiKey,
    ttl_secs: u64,
    signer: Arc<dyn JwsSigner>,
}

impl TokenIssuer {
    /// Creates an issuer signing with [`Es256Signer`] and the default TTL.
    #[must_use]
    pub fn new(key: ApiKey) -> Self {
        Self::with_signer(key, Arc::new(Es256Signer))
    }

    /// Creates an issuer with a custom signing capability.
    #[must_use]
    pub fn with_signer(key: ApiKey, signer: Arc<dyn JwsSigner>) -> Self {
        Self {
            key,
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            signer,
        }
    }

    /// Token lifetime in seconds.
    #[must_use]
    pub const fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Changes the lifetime of tokens minted from now on.
    pub fn set_ttl_secs(&mut self, ttl_secs: u64) {
        self.ttl_secs = ttl_secs;
    }

    /// The API key tokens are signed with.
    #[must_use]
    pub const fn key(&self) -> &ApiKey {
        &self.key
    }

    /// Builds the claims for `bundle` without signing them.
    #[must_use]
    pub fn claims(&self, bundle: &Bundle) -> TokenClaims {
        TokenClaims::new(self.key.issuer_id(), &bundle.bundle_id, self.ttl_secs)
    }

    /// Mints a signed token for `bundle`.
    ///
    /// # Errors
    ///
    /// Propagates the signer's error, a
    /// [`ConfigurationError`](crate::error::ClientError::ConfigurationError)
    /// for malformed key material.
    pub fn issue(&self, bundle: &Bundle) -> Result<String> {
        self.signer.sign(&self.claims(bundle), &self.key)
    }
}
