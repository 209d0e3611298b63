//! HttpTransport behind the interceptor, against a mock HTTP server.

use mockito::{Matcher, Server};
use prompt_rewriter::interceptors::RewriteInterceptorBuilder;
use prompt_rewriter::transport::{HttpTransport, OutboundRequest, Transport};
use prompt_rewriter::{Error, MacroDictionary, MemoryStore};
use serde_json::json;
use std::sync::Arc;

fn interceptor() -> prompt_rewriter::RewriteInterceptor<HttpTransport> {
    let store = Arc::new(MemoryStore::with_dictionary(
        MacroDictionary::new().with("ex", "Explain {{*}} step by step."),
    ));
    RewriteInterceptorBuilder::new()
        .store(store)
        .build(HttpTransport::new().expect("Failed to build transport"))
}

#[tokio::test]
async fn test_rewritten_body_reaches_server() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/backend-api/conversation")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "model": "auto",
            "messages": [{"content": {"parts": ["Explain traits step by step."]}}]
        })))
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let req = OutboundRequest::post(format!("{}/backend-api/conversation", server.url()))
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "model": "auto",
                "messages": [{"content": {"parts": ["ex traits"]}}]
            })
            .to_string(),
        );

    let resp = interceptor().send(req).await.expect("request failed");
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rewrite_with_content_length_header_is_not_truncated() {
    let mut server = Server::new_async().await;
    let expected = json!({"messages": [{"content": {"parts": ["Explain traits step by step."]}}]});
    let mock = server
        .mock("POST", "/backend-api/conversation")
        .match_header(
            "content-length",
            expected.to_string().len().to_string().as_str(),
        )
        .match_body(Matcher::Json(expected))
        .with_status(200)
        .create_async()
        .await;

    let body = r#"{"messages":[{"content":{"parts":["ex traits"]}}]}"#;
    let req = OutboundRequest::post(format!("{}/backend-api/conversation", server.url()))
        .with_header("content-length", body.len().to_string())
        .with_body(body);

    let resp = interceptor().send(req).await.expect("request failed");
    assert_eq!(resp.status().as_u16(), 200);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_other_traffic_is_forwarded_verbatim() {
    let mut server = Server::new_async().await;
    let raw = "{\"event\": \"ex traits\",   \"n\": 1}";
    let mock = server
        .mock("PUT", "/telemetry")
        .match_body(Matcher::Exact(raw.to_string()))
        .with_status(204)
        .create_async()
        .await;

    let req = OutboundRequest::new("put", format!("{}/telemetry", server.url())).with_body(raw);
    let resp = interceptor().send(req).await.expect("request failed");
    assert_eq!(resp.status().as_u16(), 204);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_errors_are_returned_as_responses() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/backend-api/conversation")
        .with_status(500)
        .create_async()
        .await;

    let req = OutboundRequest::post(format!("{}/backend-api/conversation", server.url()))
        .with_body("not json at all");
    let resp = interceptor().send(req).await.expect("request failed");
    assert_eq!(resp.status().as_u16(), 500);
}

#[tokio::test]
async fn test_invalid_url_is_a_transport_error() {
    let err = interceptor()
        .send(OutboundRequest::get("not a url"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
