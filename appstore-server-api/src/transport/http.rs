//! reqwest-backed transport.

use reqwest::{Client, Method};
use tracing::{debug, instrument};

use super::{
    Transport, TransportRequest, TransportResponse,
    config::{HttpConfig, HttpVersion},
};
use crate::error::{ClientError, Result};

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> Result<()> {
    if name.contains(['\r', '\n', '\0']) {
        return Err(ClientError::TransportError(
            "Invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if value.contains(['\r', '\n', '\0']) {
        return Err(ClientError::TransportError(
            "Invalid header value: control characters not allowed".to_owned(),
        ));
    }
    Ok(())
}

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Connections are pooled across requests sent through the same instance.
///
/// # Examples
///
/// ```
/// use appstore_server_api::transport::{HttpConfig, HttpTransport, HttpVersion};
///
/// let config = HttpConfig {
///     pool_max_idle_per_host: 4,
///     connect_timeout_secs: 5,
///     http_version: HttpVersion::Http1,
/// };
/// let transport = HttpTransport::with_config(&config).unwrap();
/// assert_eq!(transport.http_version(), HttpVersion::Http1);
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl HttpTransport {
    /// Creates a transport with the default [`HttpConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TransportError`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates a transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] for invalid values and
    /// [`ClientError::TransportError`] if the HTTP client cannot be built.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(config.connect_timeout());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder.build()?;

        Ok(Self { client, http_version: config.http_version })
    }

    /// The configured HTTP version preference.
    #[must_use]
    pub const fn http_version(&self) -> HttpVersion {
        self.http_version
    }

    #[instrument(
        skip(self, request),
        fields(method = %request.method, url = %request.url.path(), status)
    )]
    async fn execute_request(&self, request: TransportRequest) -> Result<TransportResponse> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| ClientError::BadMethod(format!("{}: {e}", request.method)))?;

        for (key, value) in &request.headers {
            validate_header(key, value)?;
        }

        let mut builder = self.client.request(method, request.url).timeout(request.timeout);

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.header("Content-Type", "application/json").body(body);
        }

        let response = builder.send().await?;

        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect();

        let body = response.bytes().await?.to_vec();
        debug!(bytes = body.len(), "response received");

        Ok(TransportResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
            body,
            headers,
        })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.execute_request(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use url::Url;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string, header, method, path, query_param},
    };

    use super::*;

    fn request(server: &MockServer, method: &str, path_and_query: &str) -> TransportRequest {
        TransportRequest {
            method: method.to_owned(),
            url: Url::parse(&format!("{}{path_and_query}", server.uri())).unwrap(),
            headers: vec![("Authorization".to_owned(), "Bearer test-token".to_owned())],
            body: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_http_transport_new() {
        let transport = HttpTransport::new().unwrap();
        assert_eq!(transport.http_version(), HttpVersion::Auto);
    }

    #[test]
    fn test_http_transport_rejects_invalid_config() {
        let config = HttpConfig { connect_timeout_secs: 0, ..HttpConfig::default() };
        let result = HttpTransport::with_config(&config);
        assert!(matches!(result, Err(ClientError::ConfigurationError(_))));
    }

    #[test]
    fn test_validate_header_valid() {
        assert!(validate_header("Authorization", "Bearer abc").is_ok());
    }

    #[test]
    fn test_validate_header_crlf_injection_blocked() {
        assert!(validate_header("X-Evil\r\n", "value").is_err());
        assert!(validate_header("X-Header", "value\r\nInjected: yes").is_err());
        assert!(validate_header("X-Header", "nul\0").is_err());
    }

    #[tokio::test]
    async fn test_get_with_query_and_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/inApps/v1/history/1000"))
            .and(query_param("revision", "abc"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"hasMore\":false}"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let response =
            transport.send(request(&server, "GET", "/inApps/v1/history/1000?revision=abc")).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.reason, "OK");
        assert_eq!(response.text(), "{\"hasMore\":false}");
    }

    #[tokio::test]
    async fn test_put_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/inApps/v1/transactions/consumption/1"))
            .and(header("Content-Type", "application/json"))
            .and(body_string("{\"platform\":1}"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let mut request = request(&server, "PUT", "/inApps/v1/transactions/consumption/1");
        request.body = Some("{\"platform\":1}".to_owned());

        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status, 202);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string("{\"errorCode\":4040010,\"errorMessage\":\"Transaction id not found.\"}"),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let response = transport.send(request(&server, "GET", "/inApps/v1/transactions/x")).await.unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.reason, "Not Found");
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let mut request = request(&server, "GET", "/inApps/v1/history/1");
        request.timeout = Duration::from_millis(50);

        let result = transport.send(request).await;
        assert!(matches!(result, Err(ClientError::TransportError(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let transport = HttpTransport::new().unwrap();
        let request = TransportRequest {
            method: "GET".to_owned(),
            url: Url::parse("http://127.0.0.1:9/inApps/v1/history/1").unwrap(),
            headers: vec![],
            body: None,
            timeout: Duration::from_secs(2),
        };

        let result = transport.send(request).await;
        assert!(matches!(result, Err(ClientError::TransportError(_))));
    }

    #[tokio::test]
    async fn test_crlf_header_rejected_before_send() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let transport = HttpTransport::new().unwrap();
        let mut request = request(&server, "GET", "/inApps/v1/history/1");
        request.headers.push(("X-Evil".to_owned(), "a\r\nb".to_owned()));

        assert!(transport.send(request).await.is_err());
    }
}
