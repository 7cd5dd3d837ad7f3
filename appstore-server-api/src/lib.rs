//! App Store Server API: a typed client for Apple's in-app purchase backend
//!
//! A Rust library for server-side StoreKit work: querying transaction and
//! refund history, managing subscriptions, and receiving App Store Server
//! Notifications V2.
//!
//! # What is in the crate?
//!
//! - **Request authentication**: a fresh ES256 bearer token per request,
//!   signed with the `.p8` key from App Store Connect ([`auth`])
//! - **Typed endpoints**: one method per App Store Server API operation, plus
//!   a validated raw call for anything else ([`client`])
//! - **Signed payload decoding**: transactions, renewal infos and
//!   notifications arrive as compact JWS strings and are decoded into typed
//!   models, nested strings included ([`jws`], [`models`])
//! - **Webhook receipt**: notification bodies turned into payloads
//!   ([`notifications`])
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │  AppStoreServerApiClient │  typed endpoints, pagination loops
//! └────────────┬─────────────┘
//!              │ call_api(method, path, query, body)
//! ┌────────────▼─────────────┐
//! │        dispatcher        │  validate → token → send → classify
//! └──────┬────────────┬──────┘
//!        │            │
//! ┌──────▼─────┐ ┌────▼──────────┐
//! │ TokenIssuer│ │  Transport    │  HttpTransport (reqwest) or your own
//! │  (ES256)   │ └────┬──────────┘
//! └────────────┘      │ HTTPS
//!              ┌──────▼──────────┐
//!              │ App Store Server│
//!              └─────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Query a customer's transactions
//!
//! ```rust,no_run
//! use appstore_server_api::{
//!     AppStoreServerApiClient, ClientConfig, jws::SignedTransactions,
//!     models::GetTransactionHistoryParams,
//! };
//!
//! # async fn example() -> appstore_server_api::Result<()> {
//! let config = ClientConfig::from_file("appstore.toml")?;
//! let client = AppStoreServerApiClient::from_config(&config)?;
//!
//! let page = client
//!     .get_transaction_history("2000000000000001", &GetTransactionHistoryParams::default())
//!     .await?;
//! for transaction in page.decoded_transactions() {
//!     println!("{:?} expires {:?}", transaction.product_id, transaction.expires_at());
//! }
//!
//! // Or every page at once
//! let all = client.get_all_transaction_history("2000000000000001").await?;
//! println!("{} transactions", all.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Receive a notification
//!
//! ```rust
//! use appstore_server_api::{models::NotificationContent, notifications::NotificationReceiver};
//!
//! # fn handle(body: &str) -> appstore_server_api::Result<()> {
//! let payload = NotificationReceiver::new().receive(body)?;
//!
//! if let NotificationContent::Data(data) = payload.content() {
//!     println!("{:?} for {:?}", payload.notification_type, data.bundle_id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T, ClientError>`](error::Result). Non-2xx
//! responses become [`ClientError::ApiError`] with Apple's numeric error code:
//!
//! ```rust
//! use appstore_server_api::{AppStoreServerApiClient, ClientError};
//!
//! # async fn example(client: AppStoreServerApiClient) {
//! match client.get_transaction_info("2000000000000001").await {
//!     Ok(info) => println!("{:?}", info.decoded_transaction_info().product_id),
//!     Err(ClientError::ApiError { code: 4_040_010, .. }) => {
//!         eprintln!("transaction id not found");
//!     }
//!     Err(ClientError::TransportError(msg)) => {
//!         eprintln!("network error: {msg}");
//!         // The client never retries; back off and try again if appropriate
//!     }
//!     Err(e) => eprintln!("other error: {e}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod auth;
pub mod client;
pub mod environment;
pub mod error;
pub mod jws;
pub mod model;
pub mod models;
pub mod notifications;
pub mod transport;

pub use client::{AppStoreServerApiClient, ClientConfig};
pub use environment::Environment;
pub use error::{ClientError, Result};
pub use model::Model;
