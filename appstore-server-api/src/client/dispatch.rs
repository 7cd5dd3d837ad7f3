//! Request validation and response classification.
//!
//! Each call runs the same stateless pipeline: validate, build, send,
//! classify. No retries.

use serde_json::Value;
use url::Url;

use crate::{
    error::{ClientError, Result},
    transport::TransportResponse,
};

/// Every request path must live under this namespace.
pub const API_PATH_PREFIX: &str = "inApps/";

const ALLOWED_METHODS: [&str; 6] = ["GET", "HEAD", "POST", "PUT", "DELETE", "PATCH"];

/// Normalizes an HTTP method to upper case.
///
/// # Errors
///
/// Returns [`ClientError::BadMethod`] for anything but `GET`, `HEAD`,
/// `POST`, `PUT`, `DELETE` and `PATCH`, in any letter case.
pub fn validate_method(method: &str) -> Result<&'static str> {
    ALLOWED_METHODS
        .into_iter()
        .find(|allowed| allowed.eq_ignore_ascii_case(method.trim()))
        .ok_or_else(|| ClientError::BadMethod(method.to_owned()))
}

/// Normalizes a request path to the form joined onto the base URL.
///
/// Surrounding whitespace and one leading `/` are removed. The part before
/// any `?` must start with `inApps/`; the query part is kept as given.
///
/// # Errors
///
/// Returns [`ClientError::BadPath`] for paths outside `inApps/`.
pub fn validate_path(path: &str) -> Result<&str> {
    let trimmed = path.trim();
    let relative = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let path_only = relative.split_once('?').map_or(relative, |(path, _)| path);

    if !path_only.starts_with(API_PATH_PREFIX) || path_only.contains("..") {
        return Err(ClientError::BadPath(path.to_owned()));
    }
    Ok(relative)
}

/// Checks that a joined URL still lives under `inApps/` of `base`.
///
/// Percent-encoded dot segments pass [`validate_path`] but are resolved by
/// the URL parser, so the namespace is checked again on the final path.
///
/// # Errors
///
/// Returns [`ClientError::BadPath`] if `url` escaped the namespace.
pub fn ensure_in_namespace(base: &Url, url: &Url, path: &str) -> Result<()> {
    let inside = url.origin() == base.origin()
        && url
            .path()
            .strip_prefix(base.path())
            .is_some_and(|rest| rest.starts_with(API_PATH_PREFIX));

    if inside { Ok(()) } else { Err(ClientError::BadPath(path.to_owned())) }
}

/// Passes 2xx responses through and turns everything else into an
/// [`ClientError::ApiError`].
///
/// The error code and message come from the JSON body's `errorCode` and
/// `errorMessage`, each read on its own. A missing or non-integer code is `0`;
/// a missing or empty message falls back to the HTTP reason phrase.
///
/// # Errors
///
/// Returns [`ClientError::ApiError`] for any non-2xx status.
pub fn classify(response: TransportResponse) -> Result<TransportResponse> {
    if response.is_success() {
        return Ok(response);
    }

    let body: Value = serde_json::from_slice(&response.body).unwrap_or_default();
    let code = body.get("errorCode").and_then(Value::as_i64).unwrap_or(0);
    let message = match body.get("errorMessage").and_then(Value::as_str) {
        Some(message) if !message.is_empty() => message.to_owned(),
        _ if response.reason.is_empty() => format!("HTTP {}", response.status),
        _ => response.reason.clone(),
    };

    Err(ClientError::ApiError {
        code,
        message,
        http_status: response.status,
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn response(status: u16, reason: &str, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            reason: reason.to_owned(),
            body: body.as_bytes().to_vec(),
            headers: vec![],
        }
    }

    #[test]
    fn test_allowed_methods_any_case() {
        assert_eq!(validate_method("get").unwrap(), "GET");
        assert_eq!(validate_method("Patch").unwrap(), "PATCH");
        assert_eq!(validate_method("HEAD").unwrap(), "HEAD");
        assert_eq!(validate_method("delete").unwrap(), "DELETE");
    }

    #[test]
    fn test_rejected_methods() {
        for method in ["TRACE", "OPTIONS", "CONNECT", "", "G ET", "GETS"] {
            assert!(
                matches!(validate_method(method), Err(ClientError::BadMethod(_))),
                "{method} should be rejected"
            );
        }
    }

    #[test]
    fn test_paths_inside_namespace() {
        assert_eq!(validate_path("inApps/v1/history/1").unwrap(), "inApps/v1/history/1");
        assert_eq!(validate_path("/inApps/v2/refund/lookup/1").unwrap(), "inApps/v2/refund/lookup/1");
        assert_eq!(
            validate_path(" inApps/v1/notifications/history?paginationToken=x ").unwrap(),
            "inApps/v1/notifications/history?paginationToken=x"
        );
    }

    #[test]
    fn test_paths_outside_namespace() {
        for path in ["/google", "google", "", "/", "v1/history/1", "inapps/v1/history", "//inApps/v1"] {
            assert!(
                matches!(validate_path(path), Err(ClientError::BadPath(_))),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_query_does_not_satisfy_prefix() {
        assert!(validate_path("/other?next=inApps/v1").is_err());
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(validate_path("inApps/../admin").is_err());
    }

    #[test]
    fn test_success_passes_through() {
        let classified = classify(response(200, "OK", "{}")).unwrap();
        assert_eq!(classified.status, 200);
        assert!(classify(response(204, "No Content", "")).is_ok());
    }

    #[test]
    fn test_error_body_is_parsed() {
        let err = classify(response(
            400,
            "Bad Request",
            r#"{"errorCode":4040010,"errorMessage":"Transaction id not found."}"#,
        ))
        .unwrap_err();

        match err {
            ClientError::ApiError { code, message, http_status } => {
                assert_eq!(code, 4_040_010);
                assert_eq!(message, "Transaction id not found.");
                assert_eq!(http_status, 400);
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body_falls_back_to_reason() {
        let err = classify(response(503, "Service Unavailable", "<html>down</html>")).unwrap_err();
        assert_eq!(err.api_code(), Some(0));
        assert_eq!(err.http_status(), Some(503));
        assert!(err.to_string().contains("Service Unavailable"));
    }

    #[test]
    fn test_partial_error_body() {
        let err = classify(response(429, "Too Many Requests", r#"{"errorCode":4290000}"#)).unwrap_err();
        assert_eq!(err.api_code(), Some(4_290_000));
        assert!(err.to_string().ends_with("Too Many Requests"));
    }

    #[test]
    fn test_empty_error_message_falls_back_to_reason() {
        let err = classify(response(400, "Bad Request", r#"{"errorCode":4040010,"errorMessage":""}"#))
            .unwrap_err();
        assert_eq!(err.api_code(), Some(4_040_010));
        assert!(err.to_string().ends_with("Bad Request"));
    }

    #[test]
    fn test_non_integer_code_keeps_message() {
        let err = classify(response(
            400,
            "Bad Request",
            r#"{"errorCode":"4040010","errorMessage":"Transaction id not found."}"#,
        ))
        .unwrap_err();
        assert_eq!(err.api_code(), Some(0));
        assert!(err.to_string().ends_with("Transaction id not found."));
    }

    #[test]
    fn test_encoded_dot_segments_leave_namespace() {
        let base = Url::parse("https://api.storekit.itunes.apple.com/").unwrap();
        for path in ["inApps/%2e%2e/admin", "inApps/%2E%2E/x", "inApps/.%2e/x"] {
            let relative = validate_path(path).unwrap();
            let url = base.join(relative).unwrap();
            assert!(
                matches!(ensure_in_namespace(&base, &url, path), Err(ClientError::BadPath(_))),
                "{path} resolved to {url}"
            );
        }
    }

    #[test]
    fn test_namespace_under_base_path() {
        let base = Url::parse("http://127.0.0.1:8080/mock/").unwrap();
        let url = base.join("inApps/v1/history/1").unwrap();
        assert!(ensure_in_namespace(&base, &url, "inApps/v1/history/1").is_ok());

        let outside = Url::parse("http://127.0.0.1:8080/inApps/v1/history/1").unwrap();
        assert!(ensure_in_namespace(&base, &outside, "x").is_err());
    }

    #[test]
    fn test_missing_reason_uses_status() {
        let err = classify(response(599, "", "")).unwrap_err();
        assert!(err.to_string().ends_with("HTTP 599"));
    }

    proptest! {
        #[test]
        fn prop_unknown_methods_rejected(method in "[A-Za-z]{1,10}") {
            let known = ALLOWED_METHODS.iter().any(|m| m.eq_ignore_ascii_case(&method));
            prop_assert_eq!(validate_method(&method).is_ok(), known);
        }

        #[test]
        fn prop_non_2xx_is_api_error(status in 100_u16..600) {
            let result = classify(response(status, "", ""));
            prop_assert_eq!(result.is_ok(), (200..300).contains(&status));
        }
    }
}
