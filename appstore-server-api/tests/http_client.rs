//! Client over the real reqwest transport against a local mock server.

mod common;

use std::time::Duration;

use appstore_server_api::{
    AppStoreServerApiClient, ClientError, Environment,
    auth::Bundle,
    jws::SignedTransactions,
    models::{ConsumptionRequest, GetTransactionHistoryParams, NotificationHistoryRequest},
};
use common::{BUNDLE_ID, key_pair, signed};
use serde_json::json;
use url::Url;
use wiremock::{
    Mock, MockServer, Request, ResponseTemplate,
    matchers::{body_json, header_exists, method, path, query_param},
};

fn client_for(server: &MockServer) -> AppStoreServerApiClient {
    let (key, _) = key_pair();
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    AppStoreServerApiClient::new(key, Bundle::new(BUNDLE_ID), Environment::Sandbox)
        .unwrap()
        .with_base_url(base_url)
}

#[tokio::test]
async fn test_history_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inApps/v1/history/1000"))
        .and(query_param("sort", "ASCENDING"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "revision": "abc",
            "hasMore": false,
            "signedTransactions": [signed(&json!({ "transactionId": "1" }))],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let params = GetTransactionHistoryParams {
        sort: Some(appstore_server_api::models::SortOrder::Ascending),
        ..GetTransactionHistoryParams::default()
    };

    let history = client.get_transaction_history("1000", &params).await.unwrap();

    assert_eq!(history.revision.as_deref(), Some("abc"));
    assert_eq!(history.decoded_transactions()[0].transaction_id.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_error_body_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inApps/v1/transactions/404"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(r#"{"errorCode":4040010,"errorMessage":"Transaction id not found."}"#),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_transaction_info("404").await.unwrap_err();

    assert_eq!(err.api_code(), Some(4_040_010));
    assert_eq!(err.http_status(), Some(404));
}

#[tokio::test]
async fn test_error_without_body_uses_reason_phrase() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(401)).mount(&server).await;

    let client = client_for(&server);
    let err = client.get_all_subscription_statuses("1").await.unwrap_err();

    match err {
        ClientError::ApiError { code, message, http_status } => {
            assert_eq!(code, 0);
            assert_eq!(message, "Unauthorized");
            assert_eq!(http_status, 401);
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_json_body_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/inApps/v1/transactions/consumption/55"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ConsumptionRequest { platform: Some(1), ..ConsumptionRequest::default() };
    client.send_consumption_information("55", &request).await.unwrap();

    let received: Vec<Request> = server.received_requests().await.unwrap();
    let body: serde_json::Value = received[0].body_json().unwrap();
    assert_eq!(body["platform"], 1);
    assert_eq!(received[0].headers.get("content-type").unwrap(), "application/json");
}

#[tokio::test]
async fn test_notification_history_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inApps/v1/notifications/history"))
        .and(query_param("paginationToken", "next"))
        .and(body_json(json!({
            "startDate": 1, "endDate": 2, "notificationType": null, "notificationSubtype": null,
            "onlyFailures": null, "transactionId": null,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notificationHistory": [], "hasMore": false,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client
        .get_notification_history(&NotificationHistoryRequest::between(1, 2), Some("next"))
        .await
        .unwrap();

    assert_eq!(page.has_more, Some(false));
    assert!(page.notification_history.is_empty());
}

#[tokio::test]
async fn test_request_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_request_timeout(Duration::from_millis(50));

    let err = client.get_transaction_info("1").await.unwrap_err();
    assert!(matches!(err, ClientError::TransportError(_)));
}
