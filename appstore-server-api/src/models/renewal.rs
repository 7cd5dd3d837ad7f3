//! Decoded subscription renewal info.

use chrono::{DateTime, Utc};

use super::timestamp;
use crate::model;

model! {
    /// Renewal info decoded from `signedRenewalInfo`.
    pub struct JwsRenewalInfoDecodedPayload {
        /// UUID linking the subscription to a user in your system.
        app_account_token: Option<String> => "appAccountToken",
        /// Identifier of the app download transaction.
        app_transaction_id: Option<String> => "appTransactionId",
        /// Product that renews at the next billing period.
        auto_renew_product_id: Option<String> => "autoRenewProductId",
        /// `1` when auto-renew is on, `0` when off.
        auto_renew_status: Option<i64> => "autoRenewStatus",
        /// ISO 4217 currency code of `renewalPrice`.
        currency: Option<String> => "currency",
        /// Win-back offers the customer is eligible for.
        eligible_win_back_offer_ids: Vec<String> => "eligibleWinBackOfferIds",
        /// `Sandbox` or `Production`.
        environment: Option<String> => "environment",
        /// Reason the subscription expired.
        expiration_intent: Option<i64> => "expirationIntent",
        /// End of the billing grace period.
        grace_period_expires_date: Option<i64> => "gracePeriodExpiresDate",
        /// True while the App Store is retrying billing.
        is_in_billing_retry_period: Option<bool> => "isInBillingRetryPeriod",
        /// Payment mode of the offer.
        offer_discount_type: Option<String> => "offerDiscountType",
        /// Offer code or promotional offer identifier.
        offer_identifier: Option<String> => "offerIdentifier",
        /// ISO 8601 duration of the offer.
        offer_period: Option<String> => "offerPeriod",
        /// Type of the subscription offer.
        offer_type: Option<i64> => "offerType",
        /// Transaction identifier of the original purchase.
        original_transaction_id: Option<String> => "originalTransactionId",
        /// Status of a price increase consent.
        price_increase_status: Option<i64> => "priceIncreaseStatus",
        /// Product identifier of the subscription.
        product_id: Option<String> => "productId",
        /// Start of the most recent series of uninterrupted subscription periods.
        recent_subscription_start_date: Option<i64> => "recentSubscriptionStartDate",
        /// Time the most recent auto-renewable subscription expires.
        renewal_date: Option<i64> => "renewalDate",
        /// Next renewal price in milliunits.
        renewal_price: Option<i64> => "renewalPrice",
        /// Time the App Store signed the payload.
        signed_date: Option<i64> => "signedDate",
    }
}

impl JwsRenewalInfoDecodedPayload {
    /// Returns `renewalDate` as a date-time.
    #[must_use]
    pub fn renews_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.renewal_date)
    }

    /// Returns `gracePeriodExpiresDate` as a date-time.
    #[must_use]
    pub fn grace_period_expires_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.grace_period_expires_date)
    }

    /// Returns `signedDate` as a date-time.
    #[must_use]
    pub fn signed_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.signed_date)
    }

    /// Returns true if the subscription will renew automatically.
    #[must_use]
    pub fn will_auto_renew(&self) -> bool {
        self.auto_renew_status == Some(1)
    }
}
