//! Integration tests for the shared HTTP gateway.

use photo_archiver_core::{ApiError, ApiRequest, HttpGateway};
use serde::Deserialize;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

#[derive(Debug, Deserialize)]
struct Pong {
    ok: bool,
}

#[tokio::test]
async fn test_gateway_send_json_decodes_body() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .and(query_param("x", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = HttpGateway::new(format!("{}/api", mock_server.uri())).unwrap();
    let pong: Pong = gateway
        .send_json(ApiRequest::get("ping").query("x", 1))
        .await
        .unwrap();

    assert!(pong.ok);
}

#[tokio::test]
async fn test_gateway_404_is_http_status_with_body() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such method"))
        .mount(&mock_server)
        .await;

    let gateway = HttpGateway::new(mock_server.uri()).unwrap();
    let err = gateway.send(ApiRequest::get("missing")).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    match &err {
        ApiError::HttpStatus { body, .. } => assert_eq!(body, "no such method"),
        other => panic!("expected HttpStatus, got {other:?}"),
    }
    assert!(err.to_string().contains("no such method"), "got: {err}");
}

#[tokio::test]
async fn test_gateway_500_is_http_status() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("POST"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    let gateway = HttpGateway::new(mock_server.uri()).unwrap();
    let err = gateway.send(ApiRequest::post("boom")).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_gateway_error_url_drops_query_secrets() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/secret"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let gateway = HttpGateway::new(mock_server.uri()).unwrap();
    let err = gateway
        .send(ApiRequest::get("secret").query("access_token", "vk1.a.hidden"))
        .await
        .unwrap_err();

    assert!(!err.to_string().contains("vk1.a.hidden"), "got: {err}");
    assert!(err.to_string().contains("/secret"), "got: {err}");
}

#[tokio::test]
async fn test_gateway_conflict_fails_unless_tolerated() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("PUT"))
        .and(path("/resources"))
        .respond_with(ResponseTemplate::new(409).set_body_string("exists"))
        .mount(&mock_server)
        .await;

    let gateway = HttpGateway::new(mock_server.uri()).unwrap();

    let err = gateway.send(ApiRequest::put("resources")).await.unwrap_err();
    assert_eq!(err.status(), Some(409));

    let response = gateway
        .send(ApiRequest::put("resources").tolerate_conflict())
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn test_gateway_tolerated_request_still_fails_on_other_errors() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("PUT"))
        .and(path("/resources"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let gateway = HttpGateway::new(mock_server.uri()).unwrap();
    let err = gateway
        .send(ApiRequest::put("resources").tolerate_conflict())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_gateway_malformed_json_is_decode_error() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let gateway = HttpGateway::new(mock_server.uri()).unwrap();
    let err = gateway
        .send_json::<Pong>(ApiRequest::get("ping"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode { .. }), "got: {err:?}");
}

fn closed_port_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/method")
}

#[tokio::test]
async fn test_gateway_network_error_chain_hides_query_token() {
    if support::socket_guard::should_skip_socket_bound_test() {
        return;
    }
    let gateway = HttpGateway::new(closed_port_base_url()).unwrap();

    let err = gateway
        .send(ApiRequest::get("photos.get").query("access_token", "vk1.a.SECRET"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network { .. }), "got: {err:?}");
    let chain = format!("{:#}", anyhow::Error::from(err));
    assert!(chain.contains("/method/photos.get"), "got: {chain}");
    assert!(!chain.contains("vk1.a.SECRET"), "token in error chain: {chain}");
}

#[tokio::test]
async fn test_vk_client_network_error_chain_hides_query_token() {
    if support::socket_guard::should_skip_socket_bound_test() {
        return;
    }
    let client = photo_archiver_core::VkClient::with_base_url(
        "vk1.a.SECRET2",
        1,
        closed_port_base_url(),
    )
    .unwrap()
    .with_throttle(photo_archiver_core::Throttle::disabled());

    let err = client.list_profile_photos(5).await.unwrap_err();

    let chain = format!("{:#}", anyhow::Error::from(err));
    assert!(!chain.contains("vk1.a.SECRET2"), "token in error chain: {chain}");
    assert!(!chain.contains("access_token"), "query in error chain: {chain}");
}
