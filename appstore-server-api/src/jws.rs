//! Non-verifying decoder for compact signed strings.
//!
//! The App Store wraps transactions, renewal infos and notifications in
//! compact JWS strings (`header.payload.signature`). This module reads the
//! payload segment back into a model. No signature verification happens here:
//! the strings are trusted only because they were fetched over TLS from the
//! App Store itself. Never treat decoded content received any other way as
//! authenticated.
//!
//! # Payload registry
//!
//! [`SignedPayloadKind`] maps each signed field name onto the model its
//! payload decodes into, so a response can be walked generically with
//! [`decode_signed_fields`]. Typed accessors on the individual models
//! (`decoded_transaction_info`, `decoded_renewal_info`, ...) go through the
//! same functions.
//!
//! # Examples
//!
//! ```
//! use appstore_server_api::jws::decode_signed_string;
//!
//! // "eyJ0cmFuc2FjdGlvbklkIjoiMSJ9" is base64url for {"transactionId":"1"}
//! let payload = decode_signed_string("header.eyJ0cmFuc2FjdGlvbklkIjoiMSJ9.signature");
//! assert_eq!(payload, r#"{"transactionId":"1"}"#);
//!
//! assert_eq!(decode_signed_string("no-dots-here"), "");
//! ```

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{
    model::Model,
    models::{JwsRenewalInfoDecodedPayload, JwsTransactionDecodedPayload, NotificationPayload},
};

/// Returns the payload segment of a compact signed string as UTF-8 text.
///
/// Returns an empty string when the input has no second segment, when that
/// segment is empty, or when it is not valid base64url. Trailing `=` padding
/// is tolerated. Invalid UTF-8 sequences are replaced, never rejected.
#[must_use]
pub fn decode_signed_string(signed: &str) -> String {
    let Some(payload) = signed.split('.').nth(1).filter(|segment| !segment.is_empty()) else {
        return String::new();
    };

    URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// Decodes a signed string into a model.
///
/// Permissive: an empty or undecodable string yields the default model.
#[must_use]
pub fn decode_signed<M>(signed: &str) -> M
where
    M: Model + Default,
{
    M::from_json(&decode_signed_string(signed))
}

/// Decodes an optional signed string, returning `None` when it is absent or empty.
#[must_use]
pub fn decode_optional<M>(signed: Option<&str>) -> Option<M>
where
    M: Model + Default,
{
    signed
        .filter(|value| !value.is_empty())
        .map(decode_signed)
}

/// The model a signed field decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignedPayloadKind {
    /// `signedTransactionInfo` and every entry of `signedTransactions`.
    Transaction,
    /// `signedRenewalInfo`.
    RenewalInfo,
    /// `signedPayload` on a notification envelope.
    Notification,
}

impl SignedPayloadKind {
    /// Looks up the payload kind carried by a wire field name.
    ///
    /// # Examples
    ///
    /// ```
    /// use appstore_server_api::jws::SignedPayloadKind;
    ///
    /// assert_eq!(
    ///     SignedPayloadKind::for_field("signedRenewalInfo"),
    ///     Some(SignedPayloadKind::RenewalInfo)
    /// );
    /// assert_eq!(SignedPayloadKind::for_field("bundleId"), None);
    /// ```
    #[must_use]
    pub fn for_field(name: &str) -> Option<Self> {
        match name {
            "signedTransactionInfo" | "signedTransactions" => Some(Self::Transaction),
            "signedRenewalInfo" => Some(Self::RenewalInfo),
            "signedPayload" => Some(Self::Notification),
            _ => None,
        }
    }

    /// Decodes `signed` into the model registered for this kind.
    #[must_use]
    pub fn decode(self, signed: &str) -> DecodedPayload {
        match self {
            Self::Transaction => DecodedPayload::Transaction(Box::new(decode_signed(signed))),
            Self::RenewalInfo => DecodedPayload::RenewalInfo(Box::new(decode_signed(signed))),
            Self::Notification => DecodedPayload::Notification(Box::new(decode_signed(signed))),
        }
    }
}

/// A decoded signed payload, tagged by its model.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPayload {
    /// A decoded transaction.
    Transaction(Box<JwsTransactionDecodedPayload>),
    /// A decoded subscription renewal info.
    RenewalInfo(Box<JwsRenewalInfoDecodedPayload>),
    /// A decoded notification payload.
    Notification(Box<NotificationPayload>),
}

/// Decodes every signed field declared on `model`.
///
/// Returns `(wire name, payload)` pairs in declaration order. List fields
/// produce one pair per non-empty entry; empty and null fields are skipped.
/// Nested objects are not walked; use the typed accessors for that.
#[must_use]
pub fn decode_signed_fields(model: &dyn Model) -> Vec<(&'static str, DecodedPayload)> {
    let mut decoded = Vec::new();

    for (name, value) in model.fields() {
        let Some(kind) = SignedPayloadKind::for_field(name) else {
            continue;
        };
        match value {
            serde_json::Value::String(signed) if !signed.is_empty() => {
                decoded.push((name, kind.decode(&signed)));
            }
            serde_json::Value::Array(items) => {
                decoded.extend(
                    items
                        .iter()
                        .filter_map(serde_json::Value::as_str)
                        .filter(|signed| !signed.is_empty())
                        .map(|signed| (name, kind.decode(signed))),
                );
            }
            _ => {}
        }
    }

    decoded
}

/// Responses carrying a `signedTransactions` list.
pub trait SignedTransactions {
    /// Returns the raw signed transactions.
    fn signed_transactions(&self) -> &[String];

    /// Decodes every signed transaction, preserving order.
    fn decoded_transactions(&self) -> Vec<JwsTransactionDecodedPayload> {
        self.signed_transactions()
            .iter()
            .map(|signed| decode_signed(signed))
            .collect()
    }
}
