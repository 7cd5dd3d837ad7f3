//! App Store Server Notifications V2 receipt.
//!
//! The App Store POSTs `{"signedPayload": "<compact JWS>"}` to the webhook
//! URL configured in App Store Connect. [`NotificationReceiver`] turns that
//! body into a [`NotificationPayload`]. Serving the endpoint is up to the
//! caller's HTTP stack.
//!
//! # Examples
//!
//! ```
//! use appstore_server_api::{error::ClientError, notifications::NotificationReceiver};
//!
//! let receiver = NotificationReceiver::new();
//! let err = receiver.receive(r#"{"signedPayload":""}"#).unwrap_err();
//! assert!(matches!(err, ClientError::BadRequest(_)));
//! ```

use tracing::{debug, instrument};

use crate::{
    error::{ClientError, Result},
    model::Model,
    models::{NotificationEnvelope, NotificationPayload},
};

/// Decodes inbound notification bodies.
///
/// Signatures are not verified.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationReceiver;

impl NotificationReceiver {
    /// Creates a receiver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parses a raw webhook body and decodes its signed payload.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::BadRequest`] if the body is not a JSON object
    /// with a non-empty `signedPayload`.
    #[instrument(skip_all, fields(bytes = body.len()))]
    pub fn receive(&self, body: &str) -> Result<NotificationPayload> {
        self.receive_envelope(&NotificationEnvelope::from_json(body))
    }

    /// Decodes an already parsed envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::BadRequest`] if `signedPayload` is missing or
    /// empty.
    pub fn receive_envelope(&self, envelope: &NotificationEnvelope) -> Result<NotificationPayload> {
        if envelope.signed_payload.as_deref().is_none_or(str::is_empty) {
            return Err(ClientError::BadRequest("Incorrect notification body".to_owned()));
        }

        let payload = envelope.decoded_payload();
        debug!(
            notification_type = payload.notification_type.as_deref().unwrap_or("<none>"),
            "notification received"
        );
        Ok(payload)
    }
}
