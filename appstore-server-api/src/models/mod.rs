//! App Store wire objects.
//!
//! Every type here is declared with [`model!`](crate::model!) and therefore
//! implements [`Model`](crate::model::Model). Field names on the wire are the
//! App Store's own camelCase names; Rust fields use snake case.
//!
//! - [`transaction`], [`renewal`]: payloads decoded from signed strings
//! - [`notification`]: App Store Server Notifications V2
//! - [`responses`]: endpoint response bodies
//! - [`requests`]: JSON request bodies
//! - [`params`]: query-string parameter sets

pub mod notification;
pub mod params;
pub mod renewal;
pub mod requests;
pub mod responses;
pub mod transaction;

use chrono::{DateTime, Utc};
pub use notification::{
    DecodedNotificationData, ExternalPurchaseToken, NotificationContent, NotificationData,
    NotificationEnvelope, NotificationPayload, NotificationSubtype, NotificationSummary,
    NotificationType, UnknownValue,
};
pub use params::{
    GetRefundHistoryParams, GetTransactionHistoryParams, InAppOwnershipType, PaginationParams,
    ProductType, SortOrder,
};
pub use renewal::JwsRenewalInfoDecodedPayload;
pub use requests::{
    ConsumptionRequest, ExtendRenewalDateRequest, MassExtendRenewalDateRequest,
    NotificationHistoryRequest,
};
pub use responses::{
    CheckTestNotificationResponse, ExtendRenewalDateResponse, HistoryResponse,
    LastTransactionsItem, MassExtendRenewalDateResponse, MassExtendRenewalDateStatusResponse,
    NotificationHistoryResponse, NotificationHistoryResponseItem, OrderLookupResponse,
    RefundHistoryResponse, RefundLookupResponse, SendAttemptItem, SendTestNotificationResponse,
    StatusResponse, SubscriptionGroupIdentifierItem, TransactionInfoResponse,
};
pub use transaction::JwsTransactionDecodedPayload;

/// Converts an App Store millisecond timestamp into a UTC date-time.
pub(crate) fn timestamp(millis: Option<i64>) -> Option<DateTime<Utc>> {
    millis.and_then(DateTime::from_timestamp_millis)
}
