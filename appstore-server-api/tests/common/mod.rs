//! Shared fixtures for integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use appstore_server_api::{
    AppStoreServerApiClient, Environment,
    auth::{ApiKey, Bundle},
    error::{ClientError, Result},
    transport::{Transport, TransportRequest, TransportResponse},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use josekit::jws::{ES256, alg::ecdsa::EcdsaJwsVerifier};
use serde_json::Value;

pub const BUNDLE_ID: &str = "com.example.app";

/// In-process transport that records every request and replays canned
/// responses in order.
#[derive(Debug, Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<Result<TransportResponse>>>,
    requests: Mutex<Vec<TransportRequest>>,
    calls: AtomicUsize,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response(status, body)));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ClientError::TransportError(message.to_owned())));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> TransportRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request recorded")
    }
}

impl Transport for StubTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(response(200, "{}")))
    }
}

pub fn response(status: u16, body: &str) -> TransportResponse {
    let reason = match status {
        200 => "OK",
        202 => "Accepted",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    };
    TransportResponse {
        status,
        reason: reason.to_owned(),
        body: body.as_bytes().to_vec(),
        headers: vec![],
    }
}

/// A fresh P-256 key and a verifier for tokens signed with it.
pub fn key_pair() -> (ApiKey, EcdsaJwsVerifier) {
    let pair = ES256.generate_key_pair().unwrap();
    let key = ApiKey::new(
        String::from_utf8(pair.to_pem_private_key()).unwrap(),
        "2X9R4HXF34",
        "57246542-96fe-1a63-e053-0824d011072a",
    );
    let verifier = ES256.verifier_from_pem(pair.to_pem_public_key()).unwrap();
    (key, verifier)
}

pub fn client(transport: StubTransport) -> AppStoreServerApiClient<StubTransport> {
    let (key, _) = key_pair();
    AppStoreServerApiClient::with_transport(transport, key, Bundle::new(BUNDLE_ID), Environment::Sandbox)
        .unwrap()
}

/// Wraps a JSON payload in an unsigned compact token.
pub fn signed(payload: &Value) -> String {
    format!("eyJhbGciOiJFUzI1NiJ9.{}.c2ln", URL_SAFE_NO_PAD.encode(payload.to_string()))
}
