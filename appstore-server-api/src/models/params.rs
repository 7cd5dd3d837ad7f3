//! Query-string parameter sets.
//!
//! These models are only ever sent through
//! [`Model::to_query_string`](crate::model::Model::to_query_string): unset
//! fields are omitted and list fields repeat their key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{model, model::ListItem};

macro_rules! query_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident => $wire:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$variant_meta])* #[serde(rename = $wire)] $variant, )*
        }

        impl $name {
            /// Returns the wire representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )*
                }
            }
        }

        impl ListItem for $name {
            const NESTED: bool = false;

            fn from_item(value: &Value) -> Option<Self> {
                Self::deserialize(value).ok()
            }

            fn to_item(&self) -> Value {
                Value::String(self.as_str().to_owned())
            }
        }
    };
}

query_enum! {
    /// Sort order of transaction history.
    pub enum SortOrder {
        /// Oldest first.
        Ascending => "ASCENDING",
        /// Newest first.
        Descending => "DESCENDING",
    }
}

query_enum! {
    /// In-app purchase product type filter.
    pub enum ProductType {
        /// Auto-renewable subscriptions.
        AutoRenewable => "AUTO_RENEWABLE",
        /// Non-renewing subscriptions.
        NonRenewable => "NON_RENEWABLE",
        /// Consumables.
        Consumable => "CONSUMABLE",
        /// Non-consumables.
        NonConsumable => "NON_CONSUMABLE",
    }
}

query_enum! {
    /// Ownership filter.
    pub enum InAppOwnershipType {
        /// Purchases shared through Family Sharing.
        FamilyShared => "FAMILY_SHARED",
        /// Purchases made by the account itself.
        Purchased => "PURCHASED",
    }
}

model! {
    /// Filters for *Get Transaction History*.
    ///
    /// # Examples
    ///
    /// ```
    /// use appstore_server_api::model::Model;
    /// use appstore_server_api::models::{GetTransactionHistoryParams, ProductType, SortOrder};
    ///
    /// let params = GetTransactionHistoryParams {
    ///     product_type: vec![ProductType::AutoRenewable, ProductType::Consumable],
    ///     sort: Some(SortOrder::Descending),
    ///     revoked: Some(false),
    ///     ..GetTransactionHistoryParams::default()
    /// };
    /// assert_eq!(
    ///     params.to_query_string(),
    ///     "productType=AUTO_RENEWABLE&productType=CONSUMABLE&sort=DESCENDING&revoked=false"
    /// );
    /// ```
    pub struct GetTransactionHistoryParams {
        /// Cursor returned by the previous page.
        revision: Option<String> => "revision",
        /// Earliest purchase time, Unix milliseconds.
        start_date: Option<i64> => "startDate",
        /// Latest purchase time, Unix milliseconds.
        end_date: Option<i64> => "endDate",
        /// Product identifiers to include.
        product_id: Vec<String> => "productId",
        /// Product types to include.
        product_type: Vec<ProductType> => "productType",
        /// Sort order by modification date.
        sort: Option<SortOrder> => "sort",
        /// Subscription groups to include.
        subscription_group_identifier: Vec<String> => "subscriptionGroupIdentifier",
        /// Ownership to include.
        in_app_ownership_type: Option<InAppOwnershipType> => "inAppOwnershipType",
        /// Only revoked (`true`) or only active (`false`) transactions.
        revoked: Option<bool> => "revoked",
    }
}

impl GetTransactionHistoryParams {
    /// Parameters that only select a page.
    #[must_use]
    pub fn with_revision(revision: impl Into<String>) -> Self {
        Self {
            revision: Some(revision.into()),
            ..Self::default()
        }
    }
}

model! {
    /// Paging for *Get Refund History*.
    pub struct GetRefundHistoryParams {
        /// Cursor returned by the previous page.
        revision: Option<String> => "revision",
    }
}

impl GetRefundHistoryParams {
    /// Parameters that select a page.
    #[must_use]
    pub fn with_revision(revision: impl Into<String>) -> Self {
        Self {
            revision: Some(revision.into()),
        }
    }
}

model! {
    /// Paging for *Get Notification History*.
    pub struct PaginationParams {
        /// Cursor returned by the previous page.
        pagination_token: Option<String> => "paginationToken",
    }
}
