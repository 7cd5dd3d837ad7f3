//! Token signing capability.

use josekit::{
    jws::{ES256, JwsHeader},
    jwt::{self, JwtPayload},
};
use serde_json::Value;

use super::{ApiKey, TokenClaims};
use crate::error::{ClientError, Result};

/// Signs a claim set into a compact JWT.
///
/// The client owns one signer and calls it once per request. Implement this
/// to keep the private key in an HSM or a remote signing service.
pub trait JwsSigner: Send + Sync + std::fmt::Debug {
    /// Returns the compact `header.payload.signature` token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if the key material is
    /// unusable or signing fails.
    fn sign(&self, claims: &TokenClaims, key: &ApiKey) -> Result<String>;
}

/// ES256 (P-256, SHA-256) signer for `.p8` keys.
///
/// The key is parsed on every call, so a malformed key surfaces on the first
/// request that needs a token rather than at construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Es256Signer;

impl JwsSigner for Es256Signer {
    fn sign(&self, claims: &TokenClaims, key: &ApiKey) -> Result<String> {
        let signer = ES256.signer_from_pem(key.private_key().as_bytes()).map_err(|e| {
            ClientError::ConfigurationError(format!("invalid ES256 private key: {e}"))
        })?;

        let mut header = JwsHeader::new();
        header.set_token_type("JWT");
        header.set_key_id(key.key_id());

        let claims = match serde_json::to_value(claims) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(ClientError::ConfigurationError(
                    "token claims must serialize to an object".to_owned(),
                ));
            }
            Err(e) => {
                return Err(ClientError::ConfigurationError(format!(
                    "token claims encoding failed: {e}"
                )));
            }
        };
        let payload = JwtPayload::from_map(claims)
            .map_err(|e| ClientError::ConfigurationError(format!("invalid token claims: {e}")))?;

        jwt::encode_with_signer(&payload, &header, &signer)
            .map_err(|e| ClientError::ConfigurationError(format!("token signing failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> TokenClaims {
        TokenClaims::at(1_700_000_000, "issuer", "com.example.app", 3600)
    }

    #[test]
    fn test_signed_token_verifies() {
        let pair = ES256.generate_key_pair().unwrap();
        let key = ApiKey::new(
            String::from_utf8(pair.to_pem_private_key()).unwrap(),
            "KEY123",
            "issuer",
        );

        let token = Es256Signer.sign(&claims(), &key).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let verifier = ES256.verifier_from_pem(pair.to_pem_public_key()).unwrap();
        let (payload, header) = jwt::decode_with_verifier(&token, &verifier).unwrap();
        assert_eq!(header.key_id(), Some("KEY123"));
        assert_eq!(header.token_type(), Some("JWT"));
        assert_eq!(header.algorithm(), Some("ES256"));
        assert_eq!(payload.claim("bid"), Some(&Value::from("com.example.app")));
        assert_eq!(payload.claim("aud"), Some(&Value::from("appstoreconnect-v1")));
    }

    #[test]
    fn test_malformed_key_is_configuration_error() {
        let key = ApiKey::new("not a pem", "KEY", "issuer");
        let result = Es256Signer.sign(&claims(), &key);
        assert!(matches!(result, Err(ClientError::ConfigurationError(msg)) if msg.contains("ES256")));
    }
}
