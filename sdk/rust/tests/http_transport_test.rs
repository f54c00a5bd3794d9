//! HTTP transport and client against a mock server.

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sphere_sdk::{
    selector, ClientConfig, ErrorCode, GraphqlPayload, Headers, HttpTransport, RetryOnStatus,
    SphereClient, Transport, TransportRequest,
};

fn request(server: &MockServer, query: &str) -> TransportRequest {
    let mut headers = Headers::new();
    headers.insert("apiKey".to_string(), "secret".to_string());
    TransportRequest {
        url: format!("{}/graphql", server.uri()),
        query: query.to_string(),
        headers,
    }
}

#[tokio::test]
async fn test_posts_query_with_headers() {
    let server = MockServer::start().await;
    let query = "{selectOne { data { partner { id } } errors { message } }}";

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("apiKey", "secret"))
        .and(body_json(json!({ "query": query })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "selectOne": { "data": { "partner": { "id": 1 } } } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let payload = transport.send(&request(&server, query)).await.unwrap();

    assert_eq!(
        payload,
        GraphqlPayload::data(json!({ "selectOne": { "data": { "partner": { "id": 1 } } } }))
    );
}

#[tokio::test]
async fn test_error_status_carries_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": [{ "message": "invalid api key" }]
        })))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let err = transport.send(&request(&server, "{}")).await.unwrap_err();

    assert_eq!(err.status, Some(403));
    assert_eq!(err.code, ErrorCode::Forbidden);
    assert_eq!(err.message, "invalid api key");
}

#[tokio::test]
async fn test_null_body_is_empty_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let payload = transport.send(&request(&server, "{}")).await.unwrap();

    assert_eq!(payload, GraphqlPayload::empty());
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let err = transport.send(&request(&server, "{}")).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidResponse);
    assert_eq!(err.status, None);
    assert!(err.message.contains("maintenance"));
}

#[tokio::test]
async fn test_client_retries_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "selectOne": {
                    "data": { "partner": { "id": 1, "name": "The Partner Company" } }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(format!("{}/graphql", server.uri()))
        .timeout(Duration::from_secs(5))
        .api_key("secret");
    let client = SphereClient::with_config(config)
        .unwrap()
        .with_exception_handler(RetryOnStatus::new([503]));

    let partner = client
        .find_partner_by_id(1, selector! { id, name }, None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(partner.name.as_deref(), Some("The Partner Company"));
}
