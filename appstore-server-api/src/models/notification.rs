//! App Store Server Notifications V2.
//!
//! A webhook delivers a [`NotificationEnvelope`] whose `signedPayload`
//! decodes into a [`NotificationPayload`]. The payload carries exactly one of
//! `data`, `summary` or `externalPurchaseToken`, selected by its
//! `notificationType` and `subtype`; see [`NotificationPayload::content`].
//!
//! `notificationType` and `subtype` stay strings on the wire so unknown future
//! values survive a round trip. [`NotificationType`] and [`NotificationSubtype`]
//! give typed access to the known vocabulary.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};

use super::{JwsRenewalInfoDecodedPayload, JwsTransactionDecodedPayload, timestamp};
use crate::{jws, model};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident => $wire:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$variant_meta])* $variant, )*
        }

        impl $name {
            /// Every known value, in wire order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Returns the wire representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )*
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $( $wire => Ok(Self::$variant), )*
                    other => Err(UnknownValue(other.to_owned())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// A notification type or subtype outside the known vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue(pub String);

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown notification value: {}", self.0)
    }
}

impl std::error::Error for UnknownValue {}

wire_enum! {
    /// The event that triggered a notification.
    pub enum NotificationType {
        /// The customer asked for a refund of a consumable.
        ConsumptionRequest => "CONSUMPTION_REQUEST",
        /// The customer changed their subscription plan.
        DidChangeRenewalPref => "DID_CHANGE_RENEWAL_PREF",
        /// The customer changed the auto-renew status.
        DidChangeRenewalStatus => "DID_CHANGE_RENEWAL_STATUS",
        /// The subscription failed to renew due to a billing issue.
        DidFailToRenew => "DID_FAIL_TO_RENEW",
        /// The subscription renewed.
        DidRenew => "DID_RENEW",
        /// The subscription expired.
        Expired => "EXPIRED",
        /// An external purchase token was created but not reported.
        ExternalPurchaseToken => "EXTERNAL_PURCHASE_TOKEN",
        /// The billing grace period ended without renewing.
        GracePeriodExpired => "GRACE_PERIOD_EXPIRED",
        /// The customer redeemed an offer.
        OfferRedeemed => "OFFER_REDEEMED",
        /// The system informed the customer of a price increase.
        PriceIncrease => "PRICE_INCREASE",
        /// The App Store refunded a transaction.
        Refund => "REFUND",
        /// The App Store declined a refund request.
        RefundDeclined => "REFUND_DECLINED",
        /// The App Store reversed a previously granted refund.
        RefundReversed => "REFUND_REVERSED",
        /// The renewal date of one subscription was extended.
        RenewalExtended => "RENEWAL_EXTENDED",
        /// A mass renewal-date extension is progressing or finished.
        RenewalExtension => "RENEWAL_EXTENSION",
        /// Family Sharing access to a purchase was revoked.
        Revoke => "REVOKE",
        /// The customer subscribed.
        Subscribed => "SUBSCRIBED",
        /// A test notification requested through the API.
        Test => "TEST",
    }
}

wire_enum! {
    /// Additional detail about a [`NotificationType`].
    pub enum NotificationSubtype {
        /// The customer consented to a price increase.
        Accepted => "ACCEPTED",
        /// The customer turned off auto-renew.
        AutoRenewDisabled => "AUTO_RENEW_DISABLED",
        /// The customer turned on auto-renew.
        AutoRenewEnabled => "AUTO_RENEW_ENABLED",
        /// An expired subscription renewed after a billing retry.
        BillingRecovery => "BILLING_RECOVERY",
        /// The subscription expired after the billing retry period.
        BillingRetry => "BILLING_RETRY",
        /// The customer downgraded.
        Downgrade => "DOWNGRADE",
        /// Extending one subscription's renewal date failed.
        Failure => "FAILURE",
        /// The subscription entered the billing grace period.
        GracePeriod => "GRACE_PERIOD",
        /// The customer subscribed for the first time.
        InitialBuy => "INITIAL_BUY",
        /// The customer has not yet responded to a price increase.
        Pending => "PENDING",
        /// The subscription expired after the customer declined a price increase.
        PriceIncrease => "PRICE_INCREASE",
        /// The product was not for sale at renewal time.
        ProductNotForSale => "PRODUCT_NOT_FOR_SALE",
        /// The customer resubscribed.
        Resubscribe => "RESUBSCRIBE",
        /// A mass renewal-date extension finished.
        Summary => "SUMMARY",
        /// The customer upgraded.
        Upgrade => "UPGRADE",
        /// An external purchase token was not reported.
        Unreported => "UNREPORTED",
        /// The subscription expired after the customer turned off auto-renew.
        Voluntary => "VOLUNTARY",
    }
}

model! {
    /// The webhook request body.
    pub struct NotificationEnvelope {
        /// Compact signed [`NotificationPayload`].
        signed_payload: Option<String> => "signedPayload",
    }
}

impl NotificationEnvelope {
    /// Decodes `signedPayload`.
    ///
    /// Permissive: a missing or malformed payload yields an empty
    /// [`NotificationPayload`].
    #[must_use]
    pub fn decoded_payload(&self) -> NotificationPayload {
        jws::decode_signed(self.signed_payload.as_deref().unwrap_or_default())
    }
}

model! {
    /// App and transaction details attached to most notifications.
    pub struct NotificationData {
        /// Apple ID of the app.
        app_apple_id: Option<i64> => "appAppleId",
        /// Bundle identifier of the app.
        bundle_id: Option<String> => "bundleId",
        /// Build version of the app.
        bundle_version: Option<String> => "bundleVersion",
        /// `Sandbox` or `Production`.
        environment: Option<String> => "environment",
        /// Compact signed [`JwsRenewalInfoDecodedPayload`].
        signed_renewal_info: Option<String> => "signedRenewalInfo",
        /// Compact signed [`JwsTransactionDecodedPayload`].
        signed_transaction_info: Option<String> => "signedTransactionInfo",
        /// Status of the auto-renewable subscription.
        status: Option<i64> => "status",
    }
}

impl NotificationData {
    /// Decodes `signedTransactionInfo`, `None` if absent or empty.
    #[must_use]
    pub fn decoded_transaction_info(&self) -> Option<JwsTransactionDecodedPayload> {
        jws::decode_optional(self.signed_transaction_info.as_deref())
    }

    /// Decodes `signedRenewalInfo`, `None` if absent or empty.
    #[must_use]
    pub fn decoded_renewal_info(&self) -> Option<JwsRenewalInfoDecodedPayload> {
        jws::decode_optional(self.signed_renewal_info.as_deref())
    }
}

model! {
    /// Outcome of a mass renewal-date extension.
    pub struct NotificationSummary {
        /// Identifier you supplied in the mass-extension request.
        request_identifier: Option<String> => "requestIdentifier",
        /// `Sandbox` or `Production`.
        environment: Option<String> => "environment",
        /// Apple ID of the app.
        app_apple_id: Option<i64> => "appAppleId",
        /// Bundle identifier of the app.
        bundle_id: Option<String> => "bundleId",
        /// Product whose subscriptions were extended.
        product_id: Option<String> => "productId",
        /// Storefronts included in the extension.
        storefront_country_codes: Vec<String> => "storefrontCountryCodes",
        /// Subscriptions that failed to extend.
        failed_count: Option<i64> => "failedCount",
        /// Subscriptions that extended successfully.
        succeeded_count: Option<i64> => "succeededCount",
    }
}

model! {
    /// An external purchase token that was not reported.
    pub struct ExternalPurchaseToken {
        /// Unique identifier of the token.
        external_purchase_id: Option<String> => "externalPurchaseId",
        /// Creation time in Unix milliseconds.
        token_creation_date: Option<i64> => "tokenCreationDate",
        /// Apple ID of the app.
        app_apple_id: Option<i64> => "appAppleId",
        /// Bundle identifier of the app.
        bundle_id: Option<String> => "bundleId",
    }
}

model! {
    /// A decoded notification.
    pub struct NotificationPayload {
        /// The event, see [`NotificationType`].
        notification_type: Option<String> => "notificationType",
        /// Detail of the event, see [`NotificationSubtype`].
        subtype: Option<String> => "subtype",
        /// Present for transaction and subscription events.
        data: Option<NotificationData> => "data",
        /// Present for `RENEWAL_EXTENSION` with subtype `SUMMARY`.
        summary: Option<NotificationSummary> => "summary",
        /// Present for `EXTERNAL_PURCHASE_TOKEN`.
        external_purchase_token: Option<ExternalPurchaseToken> => "externalPurchaseToken",
        /// Notification format version.
        version: Option<String> => "version",
        /// Time the App Store signed the payload, Unix milliseconds.
        signed_date: Option<i64> => "signedDate",
        /// Unique identifier of the notification.
        notification_uuid: Option<String> => "notificationUUID",
        /// Legacy version field.
        notification_version: Option<String> => "notificationVersion",
    }
    after_populate = retain_selected_content;
}

/// The single content object a [`NotificationPayload`] carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotificationContent<'a> {
    /// App and transaction details.
    Data(&'a NotificationData),
    /// Mass-extension summary.
    Summary(&'a NotificationSummary),
    /// Unreported external purchase token.
    ExternalPurchaseToken(&'a ExternalPurchaseToken),
    /// No content object for this notification.
    Empty,
}

/// Both signed strings of a notification's `data`, decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedNotificationData {
    /// Decoded `signedTransactionInfo`.
    pub transaction: Option<JwsTransactionDecodedPayload>,
    /// Decoded `signedRenewalInfo`.
    pub renewal_info: Option<JwsRenewalInfoDecodedPayload>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ContentSlot {
    Data,
    Summary,
    ExternalPurchaseToken,
}

impl NotificationPayload {
    /// Parses `notificationType`, `None` if absent or unknown.
    #[must_use]
    pub fn kind(&self) -> Option<NotificationType> {
        self.notification_type.as_deref()?.parse().ok()
    }

    /// Parses `subtype`, `None` if absent or unknown.
    #[must_use]
    pub fn sub_kind(&self) -> Option<NotificationSubtype> {
        self.subtype.as_deref()?.parse().ok()
    }

    /// Returns `signedDate` as a date-time.
    #[must_use]
    pub fn signed_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.signed_date)
    }

    /// Returns the content object selected by the notification type.
    #[must_use]
    pub fn content(&self) -> NotificationContent<'_> {
        match self.slot() {
            ContentSlot::Data => self
                .data
                .as_ref()
                .map_or(NotificationContent::Empty, NotificationContent::Data),
            ContentSlot::Summary => self
                .summary
                .as_ref()
                .map_or(NotificationContent::Empty, NotificationContent::Summary),
            ContentSlot::ExternalPurchaseToken => self
                .external_purchase_token
                .as_ref()
                .map_or(NotificationContent::Empty, NotificationContent::ExternalPurchaseToken),
        }
    }

    /// Decodes the signed strings nested in `data`.
    ///
    /// Returns an empty [`DecodedNotificationData`] for notifications that
    /// carry a summary or an external purchase token instead.
    #[must_use]
    pub fn decoded_data(&self) -> DecodedNotificationData {
        self.data
            .as_ref()
            .map(|data| DecodedNotificationData {
                transaction: data.decoded_transaction_info(),
                renewal_info: data.decoded_renewal_info(),
            })
            .unwrap_or_default()
    }

    fn slot(&self) -> ContentSlot {
        match (self.kind(), self.sub_kind()) {
            (Some(NotificationType::ExternalPurchaseToken), _) => ContentSlot::ExternalPurchaseToken,
            (Some(NotificationType::RenewalExtension), Some(NotificationSubtype::Summary)) => {
                ContentSlot::Summary
            }
            _ => ContentSlot::Data,
        }
    }

    fn retain_selected_content(&mut self) {
        let slot = self.slot();
        if slot != ContentSlot::Data {
            self.data = None;
        }
        if slot != ContentSlot::Summary {
            self.summary = None;
        }
        if slot != ContentSlot::ExternalPurchaseToken {
            self.external_purchase_token = None;
        }
    }
}
