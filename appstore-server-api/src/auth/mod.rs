//! Request authentication.
//!
//! [`TokenIssuer`] turns an [`ApiKey`] and the active [`Bundle`] into a
//! signed bearer token for each request. Signing goes through the
//! [`JwsSigner`] capability; [`Es256Signer`] is the default.
//!
//! # Examples
//!
//! ```no_run
//! use appstore_server_api::auth::{ApiKey, Bundle, TokenIssuer};
//!
//! # fn example() -> appstore_server_api::error::Result<()> {
//! let key = ApiKey::from_file("AuthKey_2X9R4HXF34.p8", "2X9R4HXF34", "57246542-96fe-1a63")?;
//! let issuer = TokenIssuer::new(key);
//! let token = issuer.issue(&Bundle::new("com.example.app"))?;
//! assert_eq!(token.split('.').count(), 3);
//! # Ok(())
//! # }
//! ```

mod key;
mod signer;
mod token;

pub use key::{ApiKey, Bundle};
pub use signer::{Es256Signer, JwsSigner};
pub use token::{AUDIENCE, CLOCK_SKEW_SECS, DEFAULT_TOKEN_TTL_SECS, TokenClaims, TokenIssuer};
