//! JSON request bodies.
//!
//! Sent through [`Model::to_json`](crate::model::Model::to_json), so unset
//! fields go out as explicit `null`s.

use crate::model;

model! {
    /// Body of *Extend a Subscription Renewal Date*.
    pub struct ExtendRenewalDateRequest {
        /// Days to extend, at most 90.
        extend_by_days: Option<i64> => "extendByDays",
        /// `0` undeclared, `1` customer satisfaction, `2` other, `3` service issue.
        extend_reason_code: Option<i64> => "extendReasonCode",
        /// Your unique identifier for this request.
        request_identifier: Option<String> => "requestIdentifier",
    }
}

model! {
    /// Body of the mass renewal-date extension request.
    pub struct MassExtendRenewalDateRequest {
        /// Your UUID for this request.
        request_identifier: Option<String> => "requestIdentifier",
        /// Days to extend, at most 90.
        extend_by_days: Option<i64> => "extendByDays",
        /// Reason code, same values as [`ExtendRenewalDateRequest::extend_reason_code`].
        extend_reason_code: Option<i64> => "extendReasonCode",
        /// Subscription product to extend.
        product_id: Option<String> => "productId",
        /// Storefronts to include; all storefronts when unset.
        storefront_country_codes: Option<Vec<String>> => "storefrontCountryCodes",
    }
}

model! {
    /// Body of *Send Consumption Information*.
    pub struct ConsumptionRequest {
        /// Age of the customer's account.
        account_tenure: Option<i64> => "accountTenure",
        /// UUID linking the purchase to a user in your system.
        app_account_token: Option<String> => "appAccountToken",
        /// How much of the consumable was used.
        consumption_status: Option<i64> => "consumptionStatus",
        /// Whether the customer consented to sharing consumption data.
        customer_consented: Option<bool> => "customerConsented",
        /// Whether the purchase was delivered and works.
        delivery_status: Option<i64> => "deliveryStatus",
        /// Lifetime purchase amount bucket.
        lifetime_dollars_purchased: Option<i64> => "lifetimeDollarsPurchased",
        /// Lifetime refund amount bucket.
        lifetime_dollars_refunded: Option<i64> => "lifetimeDollarsRefunded",
        /// Platform the customer consumed on.
        platform: Option<i64> => "platform",
        /// Time spent using the app bucket.
        play_time: Option<i64> => "playTime",
        /// Whether a free sample or trial was provided.
        sample_content_provided: Option<bool> => "sampleContentProvided",
        /// Status of the customer's account.
        user_status: Option<i64> => "userStatus",
    }
}

model! {
    /// Body of *Get Notification History*.
    pub struct NotificationHistoryRequest {
        /// Earliest notification time, Unix milliseconds.
        start_date: Option<i64> => "startDate",
        /// Latest notification time, Unix milliseconds.
        end_date: Option<i64> => "endDate",
        /// Only notifications of this type.
        notification_type: Option<String> => "notificationType",
        /// Only notifications of this subtype.
        notification_subtype: Option<String> => "notificationSubtype",
        /// Only notifications that failed to reach your server.
        only_failures: Option<bool> => "onlyFailures",
        /// Only notifications about this transaction.
        transaction_id: Option<String> => "transactionId",
    }
}

impl NotificationHistoryRequest {
    /// A request covering `[start_date, end_date]` in Unix milliseconds.
    #[must_use]
    pub fn between(start_date: i64, end_date: i64) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Model, models::NotificationType};

    #[test]
    fn test_extend_request_body() {
        let request = ExtendRenewalDateRequest {
            extend_by_days: Some(7),
            extend_reason_code: Some(3),
            request_identifier: Some("req-1".to_owned()),
        };
        assert_eq!(
            request.to_json(),
            r#"{"extendByDays":7,"extendReasonCode":3,"requestIdentifier":"req-1"}"#
        );
    }

    #[test]
    fn test_mass_extend_storefronts_optional() {
        let request = MassExtendRenewalDateRequest {
            product_id: Some("monthly".to_owned()),
            ..MassExtendRenewalDateRequest::default()
        };
        assert!(request.to_json().ends_with(r#""productId":"monthly","storefrontCountryCodes":null}"#));

        let request = MassExtendRenewalDateRequest {
            storefront_country_codes: Some(vec!["USA".to_owned(), "CAN".to_owned()]),
            ..request
        };
        assert!(request.to_json().contains(r#""storefrontCountryCodes":["USA","CAN"]"#));
    }

    #[test]
    fn test_notification_history_body_keeps_nulls() {
        let request = NotificationHistoryRequest {
            notification_type: Some(NotificationType::Refund.as_str().to_owned()),
            ..NotificationHistoryRequest::between(1, 2)
        };
        assert_eq!(
            request.to_json(),
            r#"{"startDate":1,"endDate":2,"notificationType":"REFUND","notificationSubtype":null,"onlyFailures":null,"transactionId":null}"#
        );
    }

    #[test]
    fn test_consumption_request_from_map() {
        let request = ConsumptionRequest::from_json(r#"{"customerConsented":true,"platform":1}"#);
        assert_eq!(request.customer_consented, Some(true));
        assert_eq!(request.platform, Some(1));
        assert_eq!(request.user_status, None);
    }
}
