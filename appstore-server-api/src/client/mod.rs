//! App Store Server API client.
//!
//! [`AppStoreServerApiClient`] owns the credentials, the active bundle and a
//! [`Transport`]. Every typed operation goes through
//! [`call_api`](AppStoreServerApiClient::call_api), which validates the
//! method and path, mints a fresh bearer token, sends exactly one request and
//! classifies the response.
//!
//! # Examples
//!
//! ```rust,no_run
//! use appstore_server_api::{
//!     auth::{ApiKey, Bundle},
//!     client::AppStoreServerApiClient,
//!     environment::Environment,
//!     jws::SignedTransactions,
//!     models::GetTransactionHistoryParams,
//! };
//!
//! # async fn example() -> appstore_server_api::error::Result<()> {
//! let key = ApiKey::from_file("AuthKey_2X9R4HXF34.p8", "2X9R4HXF34", "57246542-96fe-1a63")?;
//! let client = AppStoreServerApiClient::new(key, Bundle::new("com.example.app"), Environment::Sandbox)?;
//!
//! let history = client
//!     .get_transaction_history("2000000000000001", &GetTransactionHistoryParams::default())
//!     .await?;
//! for transaction in history.decoded_transactions() {
//!     println!("{:?} {:?}", transaction.product_id, transaction.purchased_at());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;

use std::{sync::Arc, time::Duration};

pub use config::{ApiKeyConfig, ClientConfig, DEFAULT_TIMEOUT_SECS};
use tracing::{debug, instrument, warn};
use url::{Url, form_urlencoded};

use crate::{
    auth::{ApiKey, Bundle, JwsSigner, TokenIssuer},
    environment::Environment,
    error::{ClientError, Result},
    jws::SignedTransactions,
    model::Model,
    models::{
        CheckTestNotificationResponse, ConsumptionRequest, ExtendRenewalDateRequest,
        ExtendRenewalDateResponse, GetRefundHistoryParams, GetTransactionHistoryParams,
        HistoryResponse, JwsTransactionDecodedPayload, MassExtendRenewalDateRequest,
        MassExtendRenewalDateResponse, MassExtendRenewalDateStatusResponse,
        NotificationHistoryRequest, NotificationHistoryResponse, NotificationHistoryResponseItem,
        OrderLookupResponse, PaginationParams, RefundHistoryResponse, RefundLookupResponse,
        SendTestNotificationResponse, StatusResponse, TransactionInfoResponse,
    },
    transport::{HttpTransport, Transport, TransportRequest, TransportResponse},
};

/// Typed client for the App Store Server API.
///
/// Holds configuration only. Reassigning the bundle, TTL or timeout takes
/// `&mut self`, so concurrent use of one instance needs external
/// synchronization.
#[derive(Debug)]
pub struct AppStoreServerApiClient<T: Transport = HttpTransport> {
    transport: T,
    issuer: TokenIssuer,
    bundles: Vec<Bundle>,
    bundle: Bundle,
    environment: Environment,
    base_url: Url,
    timeout: Duration,
}

impl AppStoreServerApiClient<HttpTransport> {
    /// Creates a client over a default [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TransportError`] if the HTTP client cannot be
    /// built.
    pub fn new(key: ApiKey, bundle: Bundle, environment: Environment) -> Result<Self> {
        Self::with_transport(HttpTransport::new()?, key, bundle, environment)
    }

    /// Creates a client from a validated [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if the configuration is
    /// invalid or the key file cannot be read.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::with_config(&config.http)?;
        Self::from_config_with_transport(config, transport)
    }
}

impl<T: Transport> AppStoreServerApiClient<T> {
    /// Creates a client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if the environment's base
    /// URL cannot be parsed.
    pub fn with_transport(
        transport: T,
        key: ApiKey,
        bundle: Bundle,
        environment: Environment,
    ) -> Result<Self> {
        Ok(Self {
            transport,
            issuer: TokenIssuer::new(key),
            bundles: vec![bundle.clone()],
            bundle,
            environment,
            base_url: environment.url()?,
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Creates a client from a [`ClientConfig`] over a caller-supplied
    /// transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if the configuration is
    /// invalid or the key file cannot be read.
    pub fn from_config_with_transport(config: &ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;

        let mut client = Self::with_transport(
            transport,
            config.api_key()?,
            config.active_bundle()?.clone(),
            config.environment,
        )?;
        client.bundles.clone_from(&config.bundles);
        client.set_token_ttl(config.token_ttl_secs);
        client.set_request_timeout(config.timeout()?);
        Ok(client)
    }

    /// Replaces the token signing capability.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn JwsSigner>) -> Self {
        let ttl_secs = self.issuer.ttl_secs();
        self.issuer = TokenIssuer::with_signer(self.issuer.key().clone(), signer);
        self.issuer.set_ttl_secs(ttl_secs);
        self
    }

    /// Sends requests to `base_url` instead of the environment's host.
    ///
    /// Paths are joined onto it, so it should end with `/`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// The transport requests go through.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The bundle tokens are minted for.
    #[must_use]
    pub const fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    /// Every bundle known to this client.
    #[must_use]
    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    /// The target environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// The URL request paths are joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Token lifetime in seconds.
    #[must_use]
    pub const fn token_ttl(&self) -> u64 {
        self.issuer.ttl_secs()
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.timeout
    }

    /// Makes `bundle` the active bundle, adding it to the known bundles.
    pub fn set_bundle(&mut self, bundle: Bundle) {
        if !self.bundles.contains(&bundle) {
            self.bundles.push(bundle.clone());
        }
        self.bundle = bundle;
    }

    /// Makes a known bundle the active one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if no known bundle has
    /// this id.
    pub fn select_bundle(&mut self, bundle_id: &str) -> Result<()> {
        let bundle = self
            .bundles
            .iter()
            .find(|bundle| bundle.bundle_id == bundle_id)
            .cloned()
            .ok_or_else(|| ClientError::ConfigurationError(format!("unknown bundle: {bundle_id}")))?;
        self.bundle = bundle;
        Ok(())
    }

    /// Changes the lifetime of tokens minted from now on.
    pub fn set_token_ttl(&mut self, ttl_secs: u64) {
        self.issuer.set_ttl_secs(ttl_secs);
    }

    /// Changes the per-request timeout.
    pub fn set_request_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Sends one authenticated request and classifies the response.
    ///
    /// `path` is relative to the environment's base URL and must live under
    /// `inApps/`. `query` is flattened with
    /// [`Model::to_query_string`] and `body` is sent as
    /// [`Model::to_json`].
    ///
    /// # Errors
    ///
    /// - [`ClientError::BadMethod`] or [`ClientError::BadPath`] before anything
    ///   is sent
    /// - [`ClientError::ConfigurationError`] if the token cannot be signed
    /// - [`ClientError::TransportError`] if no response arrived
    /// - [`ClientError::ApiError`] for any non-2xx status
    #[instrument(skip(self, query, body), fields(status))]
    pub async fn call_api(
        &self,
        method: &str,
        path: &str,
        query: Option<&dyn Model>,
        body: Option<&dyn Model>,
    ) -> Result<TransportResponse> {
        let method = dispatch::validate_method(method)?;
        let relative = dispatch::validate_path(path)?;

        let mut url = self
            .base_url
            .join(relative)
            .map_err(|e| ClientError::BadPath(format!("{path}: {e}")))?;
        dispatch::ensure_in_namespace(&self.base_url, &url, path)?;

        if let Some(query) = query {
            let encoded = query.to_query_string();
            if !encoded.is_empty() {
                let merged = match url.query() {
                    Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
                    _ => encoded,
                };
                url.set_query(Some(&merged));
            }
        }

        let token = self.issuer.issue(&self.bundle)?;
        let request = TransportRequest {
            method: method.to_owned(),
            url,
            headers: vec![
                ("Authorization".to_owned(), format!("Bearer {token}")),
                ("Accept".to_owned(), "application/json".to_owned()),
            ],
            body: body.map(|body| body.to_json()),
            timeout: self.timeout,
        };

        let response = self.transport.send(request).await?;
        tracing::Span::current().record("status", response.status);

        if response.is_success() {
            debug!(bytes = response.body.len(), "request succeeded");
        } else {
            warn!(status = response.status, "App Store returned an error status");
        }

        dispatch::classify(response)
    }

    async fn fetch<M: Model + Default>(
        &self,
        method: &str,
        path: &str,
        query: Option<&dyn Model>,
        body: Option<&dyn Model>,
    ) -> Result<M> {
        let response = self.call_api(method, path, query, body).await?;
        Ok(M::from_json(&response.text()))
    }

    /// *Get Transaction History*: one page of a customer's transactions.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip(self, params))]
    pub async fn get_transaction_history(
        &self,
        transaction_id: &str,
        params: &GetTransactionHistoryParams,
    ) -> Result<HistoryResponse> {
        let path = format!("inApps/v1/history/{}", segment(transaction_id));
        self.fetch("GET", &path, Some(params), None).await
    }

    /// Follows `revision` across every history page and returns all decoded
    /// transactions in page order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing page; see [`call_api`](Self::call_api).
    #[instrument(skip(self))]
    pub async fn get_all_transaction_history(
        &self,
        transaction_id: &str,
    ) -> Result<Vec<JwsTransactionDecodedPayload>> {
        let mut params = GetTransactionHistoryParams::default();
        let mut transactions = Vec::new();
        let mut pages = 0_usize;

        loop {
            let page = self.get_transaction_history(transaction_id, &params).await?;
            pages += 1;
            transactions.extend(page.decoded_transactions());

            match next_cursor(page.has_more, page.revision) {
                Some(revision) => {
                    debug!(pages, collected = transactions.len(), "fetching next history page");
                    params = GetTransactionHistoryParams::with_revision(revision);
                }
                None => break,
            }
        }

        debug!(pages, collected = transactions.len(), "transaction history complete");
        Ok(transactions)
    }

    /// *Get Transaction Info*.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip(self))]
    pub async fn get_transaction_info(&self, transaction_id: &str) -> Result<TransactionInfoResponse> {
        let path = format!("inApps/v1/transactions/{}", segment(transaction_id));
        self.fetch("GET", &path, None, None).await
    }

    /// *Get All Subscription Statuses*.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip(self))]
    pub async fn get_all_subscription_statuses(&self, transaction_id: &str) -> Result<StatusResponse> {
        let path = format!("inApps/v1/subscriptions/{}", segment(transaction_id));
        self.fetch("GET", &path, None, None).await
    }

    /// *Send Consumption Information* in answer to a `CONSUMPTION_REQUEST`
    /// notification.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip(self, request))]
    pub async fn send_consumption_information(
        &self,
        transaction_id: &str,
        request: &ConsumptionRequest,
    ) -> Result<()> {
        let path = format!("inApps/v1/transactions/consumption/{}", segment(transaction_id));
        self.call_api("PUT", &path, None, Some(request)).await?;
        Ok(())
    }

    /// *Look Up Order ID*.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip(self))]
    pub async fn look_up_order_id(&self, order_id: &str) -> Result<OrderLookupResponse> {
        let path = format!("inApps/v1/lookup/{}", segment(order_id));
        self.fetch("GET", &path, None, None).await
    }

    /// *Get Refund History*: one page of refunded transactions.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip(self, params))]
    pub async fn get_refund_history(
        &self,
        transaction_id: &str,
        params: &GetRefundHistoryParams,
    ) -> Result<RefundHistoryResponse> {
        let path = refund_path(transaction_id);
        self.fetch("GET", &path, Some(params), None).await
    }

    /// *Look Up Refunds*, the first page of refunds without paging fields.
    ///
    /// The v1 endpoint is retired; this is served by the v2 path.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip(self))]
    pub async fn look_up_refunds(&self, transaction_id: &str) -> Result<RefundLookupResponse> {
        let path = refund_path(transaction_id);
        self.fetch("GET", &path, None, None).await
    }

    /// Follows `revision` across every refund page and returns all decoded
    /// transactions in page order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing page; see [`call_api`](Self::call_api).
    #[instrument(skip(self))]
    pub async fn get_all_refund_history(
        &self,
        transaction_id: &str,
    ) -> Result<Vec<JwsTransactionDecodedPayload>> {
        let mut params = GetRefundHistoryParams::default();
        let mut transactions = Vec::new();

        loop {
            let page = self.get_refund_history(transaction_id, &params).await?;
            transactions.extend(page.decoded_transactions());

            match next_cursor(page.has_more, page.revision) {
                Some(revision) => {
                    debug!(collected = transactions.len(), "fetching next refund page");
                    params = GetRefundHistoryParams::with_revision(revision);
                }
                None => break,
            }
        }

        Ok(transactions)
    }

    /// *Extend a Subscription Renewal Date*.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip(self, request))]
    pub async fn extend_subscription_renewal_date(
        &self,
        original_transaction_id: &str,
        request: &ExtendRenewalDateRequest,
    ) -> Result<ExtendRenewalDateResponse> {
        let path = format!("inApps/v1/subscriptions/extend/{}", segment(original_transaction_id));
        self.fetch("PUT", &path, None, Some(request)).await
    }

    /// *Extend Subscription Renewal Dates for All Active Subscribers*.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip_all)]
    pub async fn extend_subscription_renewal_dates_for_all_active_subscribers(
        &self,
        request: &MassExtendRenewalDateRequest,
    ) -> Result<MassExtendRenewalDateResponse> {
        self.fetch("POST", "inApps/v1/subscriptions/extend/mass/", None, Some(request)).await
    }

    /// *Get Status of Subscription Renewal Date Extensions*.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip(self))]
    pub async fn get_status_of_subscription_renewal_date_extensions(
        &self,
        product_id: &str,
        request_identifier: &str,
    ) -> Result<MassExtendRenewalDateStatusResponse> {
        let path = format!(
            "inApps/v1/subscriptions/extend/mass/{}/{}",
            segment(product_id),
            segment(request_identifier)
        );
        self.fetch("GET", &path, None, None).await
    }

    /// *Request a Test Notification*.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip(self))]
    pub async fn request_test_notification(&self) -> Result<SendTestNotificationResponse> {
        self.fetch("POST", "inApps/v1/notifications/test", None, None).await
    }

    /// *Get Test Notification Status*.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip(self))]
    pub async fn get_test_notification_status(
        &self,
        test_notification_token: &str,
    ) -> Result<CheckTestNotificationResponse> {
        let path = format!("inApps/v1/notifications/test/{}", segment(test_notification_token));
        self.fetch("GET", &path, None, None).await
    }

    /// *Get Notification History*: one page of sent notifications.
    ///
    /// An empty `pagination_token` is treated as none.
    ///
    /// # Errors
    ///
    /// See [`call_api`](Self::call_api).
    #[instrument(skip(self, request))]
    pub async fn get_notification_history(
        &self,
        request: &NotificationHistoryRequest,
        pagination_token: Option<&str>,
    ) -> Result<NotificationHistoryResponse> {
        let paging = pagination_token.filter(|token| !token.is_empty()).map(|token| {
            PaginationParams {
                pagination_token: Some(token.to_owned()),
            }
        });
        let query = paging.as_ref().map(|params| params as &dyn Model);

        self.fetch("POST", "inApps/v1/notifications/history", query, Some(request)).await
    }

    /// Follows `paginationToken` across every notification history page.
    ///
    /// # Errors
    ///
    /// Stops at the first failing page; see [`call_api`](Self::call_api).
    #[instrument(skip_all)]
    pub async fn get_all_notification_history(
        &self,
        request: &NotificationHistoryRequest,
    ) -> Result<Vec<NotificationHistoryResponseItem>> {
        let mut token: Option<String> = None;
        let mut items = Vec::new();

        loop {
            let page = self.get_notification_history(request, token.as_deref()).await?;
            items.extend(page.notification_history);

            token = next_cursor(page.has_more, page.pagination_token);
            if token.is_none() {
                break;
            }
            debug!(collected = items.len(), "fetching next notification history page");
        }

        Ok(items)
    }
}

/// Percent-encodes one path segment.
fn segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn refund_path(transaction_id: &str) -> String {
    format!("inApps/v2/refund/lookup/{}", segment(transaction_id))
}

/// Returns the cursor for the next page, if the service reported one.
fn next_cursor(has_more: Option<bool>, cursor: Option<String>) -> Option<String> {
    match (has_more, cursor) {
        (Some(true), Some(cursor)) if !cursor.is_empty() => Some(cursor),
        _ => None,
    }
}
