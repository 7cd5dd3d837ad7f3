//! Endpoint response bodies.

use super::{JwsRenewalInfoDecodedPayload, JwsTransactionDecodedPayload, NotificationPayload};
use crate::{
    jws::{self, SignedTransactions},
    model,
};

macro_rules! signed_transactions {
    ($($name:ident),* $(,)?) => {
        $(
            impl SignedTransactions for $name {
                fn signed_transactions(&self) -> &[String] {
                    &self.signed_transactions
                }
            }
        )*
    };
}

model! {
    /// Response of *Get Transaction History*.
    pub struct HistoryResponse {
        /// Compact signed transactions, see [`SignedTransactions::decoded_transactions`].
        signed_transactions: Vec<String> => "signedTransactions",
        /// Apple ID of the app.
        app_apple_id: Option<i64> => "appAppleId",
        /// Bundle identifier of the app.
        bundle_id: Option<String> => "bundleId",
        /// `Sandbox` or `Production`.
        environment: Option<String> => "environment",
        /// True if another page is available.
        has_more: Option<bool> => "hasMore",
        /// Cursor for the next page.
        revision: Option<String> => "revision",
    }
}

model! {
    /// Response of *Get Refund History*.
    pub struct RefundHistoryResponse {
        /// Compact signed refunded transactions.
        signed_transactions: Vec<String> => "signedTransactions",
        /// True if another page is available.
        has_more: Option<bool> => "hasMore",
        /// Cursor for the next page.
        revision: Option<String> => "revision",
    }
}

model! {
    /// Response of the single-page refund lookup.
    pub struct RefundLookupResponse {
        /// Compact signed refunded transactions.
        signed_transactions: Vec<String> => "signedTransactions",
    }
}

model! {
    /// Response of *Look Up Order ID*.
    pub struct OrderLookupResponse {
        /// Compact signed transactions belonging to the order.
        signed_transactions: Vec<String> => "signedTransactions",
        /// `0` when the order id is valid, `1` when it is not.
        status: Option<i64> => "status",
    }
}

signed_transactions!(HistoryResponse, RefundHistoryResponse, RefundLookupResponse, OrderLookupResponse);

impl OrderLookupResponse {
    /// Returns true if the App Store recognised the order id.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status == Some(0)
    }
}

model! {
    /// Response of *Get Transaction Info*.
    pub struct TransactionInfoResponse {
        /// Compact signed transaction.
        signed_transaction_info: Option<String> => "signedTransactionInfo",
    }
}

impl TransactionInfoResponse {
    /// Decodes `signedTransactionInfo`.
    ///
    /// An empty or missing string yields a transaction with default fields.
    #[must_use]
    pub fn decoded_transaction_info(&self) -> JwsTransactionDecodedPayload {
        jws::decode_signed(self.signed_transaction_info.as_deref().unwrap_or_default())
    }
}

model! {
    /// Latest transaction and renewal info of one subscription.
    pub struct LastTransactionsItem {
        /// Transaction identifier of the original purchase.
        original_transaction_id: Option<String> => "originalTransactionId",
        /// Subscription status: active, expired, billing retry, grace period or revoked.
        status: Option<i64> => "status",
        /// Compact signed renewal info.
        signed_renewal_info: Option<String> => "signedRenewalInfo",
        /// Compact signed transaction.
        signed_transaction_info: Option<String> => "signedTransactionInfo",
    }
}

impl LastTransactionsItem {
    /// Decodes `signedTransactionInfo`; empty yields default fields.
    #[must_use]
    pub fn decoded_transaction_info(&self) -> JwsTransactionDecodedPayload {
        jws::decode_signed(self.signed_transaction_info.as_deref().unwrap_or_default())
    }

    /// Decodes `signedRenewalInfo`; empty yields default fields.
    #[must_use]
    pub fn decoded_renewal_info(&self) -> JwsRenewalInfoDecodedPayload {
        jws::decode_signed(self.signed_renewal_info.as_deref().unwrap_or_default())
    }
}

model! {
    /// Subscriptions of one subscription group.
    pub struct SubscriptionGroupIdentifierItem {
        /// Identifier of the subscription group.
        subscription_group_identifier: Option<String> => "subscriptionGroupIdentifier",
        /// Latest transaction of each subscription in the group.
        last_transactions: Vec<LastTransactionsItem> => "lastTransactions",
    }
}

model! {
    /// Response of *Get All Subscription Statuses*.
    pub struct StatusResponse {
        /// One entry per subscription group.
        data: Vec<SubscriptionGroupIdentifierItem> => "data",
        /// `Sandbox` or `Production`.
        environment: Option<String> => "environment",
        /// Apple ID of the app.
        app_apple_id: Option<i64> => "appAppleId",
        /// Bundle identifier of the app.
        bundle_id: Option<String> => "bundleId",
    }
}

model! {
    /// Response of *Extend a Subscription Renewal Date*.
    pub struct ExtendRenewalDateResponse {
        /// New expiration date, Unix milliseconds.
        effective_date: Option<i64> => "effectiveDate",
        /// Transaction identifier of the original purchase.
        original_transaction_id: Option<String> => "originalTransactionId",
        /// True if the extension succeeded.
        success: Option<bool> => "success",
        /// Identifier of subscription purchase events across devices.
        web_order_line_item_id: Option<String> => "webOrderLineItemId",
    }
}

model! {
    /// Response of the mass renewal-date extension request.
    pub struct MassExtendRenewalDateResponse {
        /// Echo of the request identifier.
        request_identifier: Option<String> => "requestIdentifier",
    }
}

model! {
    /// Progress of a mass renewal-date extension.
    pub struct MassExtendRenewalDateStatusResponse {
        /// Identifier of the mass-extension request.
        request_identifier: Option<String> => "requestIdentifier",
        /// True once every eligible subscription has been processed.
        complete: Option<bool> => "complete",
        /// Completion time, Unix milliseconds.
        complete_date: Option<i64> => "completeDate",
        /// Subscriptions that failed to extend.
        failed_count: Option<i64> => "failedCount",
        /// Subscriptions that extended successfully.
        succeeded_count: Option<i64> => "succeededCount",
    }
}

model! {
    /// Response of *Request a Test Notification*.
    pub struct SendTestNotificationResponse {
        /// Token for *Get Test Notification Status*.
        test_notification_token: Option<String> => "testNotificationToken",
    }
}

model! {
    /// One delivery attempt of a notification.
    pub struct SendAttemptItem {
        /// Attempt time, Unix milliseconds.
        attempt_date: Option<i64> => "attemptDate",
        /// `SUCCESS` or the failure reason.
        send_attempt_result: Option<String> => "sendAttemptResult",
    }
}

model! {
    /// Response of *Get Test Notification Status*.
    pub struct CheckTestNotificationResponse {
        /// Delivery attempts so far.
        send_attempts: Vec<SendAttemptItem> => "sendAttempts",
        /// Compact signed notification payload.
        signed_payload: Option<String> => "signedPayload",
    }
}

impl CheckTestNotificationResponse {
    /// Decodes `signedPayload`, `None` if absent or empty.
    #[must_use]
    pub fn decoded_payload(&self) -> Option<NotificationPayload> {
        jws::decode_optional(self.signed_payload.as_deref())
    }
}

model! {
    /// One entry of the notification history.
    pub struct NotificationHistoryResponseItem {
        /// Delivery attempts of this notification.
        send_attempts: Vec<SendAttemptItem> => "sendAttempts",
        /// Compact signed notification payload.
        signed_payload: Option<String> => "signedPayload",
    }
}

impl NotificationHistoryResponseItem {
    /// Decodes `signedPayload`, `None` if absent or empty.
    #[must_use]
    pub fn decoded_payload(&self) -> Option<NotificationPayload> {
        jws::decode_optional(self.signed_payload.as_deref())
    }
}

model! {
    /// Response of *Get Notification History*.
    pub struct NotificationHistoryResponse {
        /// Notifications on this page.
        notification_history: Vec<NotificationHistoryResponseItem> => "notificationHistory",
        /// True if another page is available.
        has_more: Option<bool> => "hasMore",
        /// Cursor for the next page.
        pagination_token: Option<String> => "paginationToken",
    }
}
