//! Decoded transaction payload.

use chrono::{DateTime, Utc};

use super::timestamp;
use crate::model;

model! {
    /// A transaction decoded from `signedTransactionInfo` or `signedTransactions`.
    ///
    /// Timestamps are Unix milliseconds; `price` is in milliunits of `currency`.
    pub struct JwsTransactionDecodedPayload {
        /// UUID linking the transaction to a user in your system.
        app_account_token: Option<String> => "appAccountToken",
        /// Identifier of the app download transaction.
        app_transaction_id: Option<String> => "appTransactionId",
        /// Bundle identifier of the app.
        bundle_id: Option<String> => "bundleId",
        /// ISO 4217 currency code of `price`.
        currency: Option<String> => "currency",
        /// `Sandbox` or `Production`.
        environment: Option<String> => "environment",
        /// Subscription expiration or renewal time.
        expires_date: Option<i64> => "expiresDate",
        /// `FAMILY_SHARED` or `PURCHASED`.
        in_app_ownership_type: Option<String> => "inAppOwnershipType",
        /// True if the user upgraded to another subscription.
        is_upgraded: Option<bool> => "isUpgraded",
        /// Payment mode of a subscription offer.
        offer_discount_type: Option<String> => "offerDiscountType",
        /// Identifier of the redeemed offer code or promotional offer.
        offer_identifier: Option<String> => "offerIdentifier",
        /// ISO 8601 duration of the offer.
        offer_period: Option<String> => "offerPeriod",
        /// Type of the redeemed subscription offer.
        offer_type: Option<i64> => "offerType",
        /// Purchase time of the original transaction.
        original_purchase_date: Option<i64> => "originalPurchaseDate",
        /// Transaction identifier of the original purchase.
        original_transaction_id: Option<String> => "originalTransactionId",
        /// Price in milliunits.
        price: Option<i64> => "price",
        /// Product identifier of the in-app purchase.
        product_id: Option<String> => "productId",
        /// Time the App Store charged the account.
        purchase_date: Option<i64> => "purchaseDate",
        /// Number of consumables purchased.
        quantity: Option<i64> => "quantity",
        /// Time the App Store refunded or revoked the transaction.
        revocation_date: Option<i64> => "revocationDate",
        /// Reason for the refund or revocation.
        revocation_reason: Option<i64> => "revocationReason",
        /// Time the App Store signed the payload.
        signed_date: Option<i64> => "signedDate",
        /// Three-letter storefront country code.
        storefront: Option<String> => "storefront",
        /// Apple-defined storefront identifier.
        storefront_id: Option<String> => "storefrontId",
        /// Subscription group the subscription belongs to.
        subscription_group_identifier: Option<String> => "subscriptionGroupIdentifier",
        /// Unique identifier of the transaction.
        transaction_id: Option<String> => "transactionId",
        /// `PURCHASE` or `RENEWAL`.
        transaction_reason: Option<String> => "transactionReason",
        /// Product type, e.g. `Auto-Renewable Subscription`.
        product_type: Option<String> => "type",
        /// Identifier of subscription purchase events across devices.
        web_order_line_item_id: Option<String> => "webOrderLineItemId",
    }
}

impl JwsTransactionDecodedPayload {
    /// Returns `purchaseDate` as a date-time.
    #[must_use]
    pub fn purchased_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.purchase_date)
    }

    /// Returns `originalPurchaseDate` as a date-time.
    #[must_use]
    pub fn originally_purchased_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.original_purchase_date)
    }

    /// Returns `expiresDate` as a date-time.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.expires_date)
    }

    /// Returns `revocationDate` as a date-time.
    #[must_use]
    pub fn revoked_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.revocation_date)
    }

    /// Returns `signedDate` as a date-time.
    #[must_use]
    pub fn signed_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.signed_date)
    }

    /// Returns true if the App Store refunded or revoked the transaction.
    #[must_use]
    pub const fn is_revoked(&self) -> bool {
        self.revocation_date.is_some()
    }
}
