//! Transport and client tests against a local mock server.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use beacon_application::ports::{HttpTransport, TransportError};
use beacon_application::{ApiClient, ApiError, ClientConfig, MemoryCredentialStorage, TokenStore};
use beacon_domain::{ApiRequest, HttpMethod, HttpRequest};
use beacon_infrastructure::{ReqwestHttpClient, SystemClock};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn request(method: HttpMethod, url: String) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers: Vec::new(),
        body: None,
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn error_statuses_are_responses_not_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/shows/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": {"message": "not found"}})),
        )
        .mount(&server)
        .await;

    let transport = ReqwestHttpClient::new().unwrap();
    let response = transport
        .send(request(
            HttpMethod::Get,
            format!("{}/api/v1/shows/missing", server.uri()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status.as_u16(), 404);
    assert_eq!(response.error_envelope().message(), "not found");
}

#[tokio::test]
async fn headers_and_body_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/tracking/7"))
        .and(header("Authorization", "Bearer abc"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"is_favorite": true})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestHttpClient::new().unwrap();
    let mut patch = request(HttpMethod::Patch, format!("{}/tracking/7", server.uri()));
    patch.headers = vec![
        ("Authorization".to_string(), "Bearer abc".to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ];
    patch.body = Some(br#"{"is_favorite":true}"#.to_vec());

    let response = transport.send(patch).await.unwrap();
    assert_eq!(response.status.as_u16(), 204);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let transport = ReqwestHttpClient::new().unwrap();
    let mut slow = request(HttpMethod::Get, format!("{}/timeline", server.uri()));
    slow.timeout = Duration::from_millis(100);

    let error = transport.send(slow).await.unwrap_err();
    assert!(matches!(error, TransportError::Timeout { timeout_ms: 100 }));
}

#[tokio::test]
async fn closed_port_is_a_transport_error() {
    let server = MockServer::start().await;
    let url = format!("{}/me", server.uri());
    drop(server);

    let transport = ReqwestHttpClient::new().unwrap();
    let error = transport
        .send(request(HttpMethod::Get, url))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        TransportError::ConnectionRefused { .. }
            | TransportError::ConnectionFailed(_)
            | TransportError::Other(_)
    ));
}

/// Answers 401 unless the bearer is the refreshed one.
struct RequireFreshBearer;

impl Respond for RequireFreshBearer {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let bearer = request
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok());
        if bearer == Some("Bearer fresh-access") {
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "e1"}]}))
        } else {
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "expired"}}))
        }
    }
}

fn client_for(server: &MockServer, storage: Arc<MemoryCredentialStorage>) -> ApiClient {
    let config = ClientConfig::parse(&format!("{}/api/v1", server.uri()))
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    let tokens = TokenStore::new(storage, Arc::new(SystemClock::new()));
    ApiClient::new(config, Arc::new(ReqwestHttpClient::new().unwrap()), tokens)
}

#[tokio::test]
async fn expired_bearer_is_refreshed_and_replayed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(body_json(json!({"refresh_token": "stale-refresh"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "access_token": "fresh-access",
                "refresh_token": "fresh-refresh",
                "expires_in": 900
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/timeline"))
        .and(query_param("window", "week"))
        .and(header_exists("authorization"))
        .respond_with(RequireFreshBearer)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryCredentialStorage::new());
    let client = client_for(&server, Arc::clone(&storage));
    client.tokens().set("stale-access", "stale-refresh").await.unwrap();

    let request = ApiRequest::get("/timeline").with_query("window", "week");
    let events = client.execute::<Value>(request).await.unwrap().into_data();

    assert_eq!(events, json!([{"id": "e1"}]));
    assert_eq!(
        client.tokens().get_refresh().await.unwrap().as_deref(),
        Some("fresh-refresh")
    );
}

#[tokio::test]
async fn rejected_refresh_clears_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": {"message": "refresh token revoked"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .respond_with(RequireFreshBearer)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryCredentialStorage::new());
    let client = client_for(&server, Arc::clone(&storage));
    client.tokens().set("stale-access", "revoked").await.unwrap();

    let error = client.get::<Value>("/me").await.unwrap_err();

    assert!(matches!(error, ApiError::Unauthorized(_)));
    assert_eq!(error.message(), "refresh token revoked");
    assert!(storage.is_empty().await);
}
