//! End-to-end behavior of the rewriting interceptor with a recording transport.

use async_trait::async_trait;
use bytes::Bytes;
use prompt_rewriter::interceptors::{InMemoryRewriteSink, RewriteInterceptorBuilder, RewriteRules};
use prompt_rewriter::transport::{OutboundRequest, Transport};
use prompt_rewriter::{DictionaryStore, FileStore, MacroDictionary, MemoryStore, Result};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Records every request it is asked to send and answers with a sequence number.
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<OutboundRequest>>,
}

impl RecordingTransport {
    fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    type Response = usize;

    async fn send(&self, request: OutboundRequest) -> Result<usize> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(request);
        Ok(sent.len())
    }
}

fn submission(prompt: &str) -> OutboundRequest {
    OutboundRequest::post("https://chatgpt.com/backend-api/conversation").with_body(
        json!({
            "action": "next",
            "messages": [{"id": "a", "content": {"content_type": "text", "parts": [prompt]}}],
            "parent_message_id": "p"
        })
        .to_string(),
    )
}

fn first_part(req: &OutboundRequest) -> String {
    let v: Value = serde_json::from_str(req.text_body().unwrap()).unwrap();
    v["messages"][0]["content"]["parts"][0].as_str().unwrap().to_string()
}

#[tokio::test]
async fn non_candidate_requests_pass_through_identically() {
    let next = Arc::new(RecordingTransport::default());
    let store = Arc::new(MemoryStore::with_dictionary(MacroDictionary::example()));
    let interceptor = RewriteInterceptorBuilder::new().store(store).build(next.clone());

    let requests = vec![
        OutboundRequest::get("https://chatgpt.com/backend-api/models"),
        OutboundRequest::post("https://chatgpt.com/ces/v1/t").with_body("{\"event\":\"ex a\"}"),
        OutboundRequest::post("https://chatgpt.com/upload")
            .with_body(Bytes::from_static(b"\x00\x01\"messages\"")),
    ];
    for req in &requests {
        interceptor.send(req.clone()).await.unwrap();
    }
    assert_eq!(next.sent(), requests);
}

#[tokio::test]
async fn malformed_candidates_pass_through_identically() {
    let next = Arc::new(RecordingTransport::default());
    let store = Arc::new(MemoryStore::with_dictionary(MacroDictionary::example()));
    let interceptor = RewriteInterceptorBuilder::new().store(store).build(next.clone());

    let requests = vec![
        OutboundRequest::post("https://chatgpt.com/backend-api/conversation").with_body("not json"),
        OutboundRequest::post("https://x/api").with_body("{\"messages\": 7}"),
        OutboundRequest::post("https://x/backend-api/conversation")
            .with_body(json!({"messages": [{"content": {"parts": [42]}}]}).to_string()),
    ];
    for req in &requests {
        interceptor.send(req.clone()).await.unwrap();
    }
    assert_eq!(next.sent(), requests);
}

#[tokio::test]
async fn response_of_next_is_returned() {
    let next = Arc::new(RecordingTransport::default());
    let interceptor = RewriteInterceptorBuilder::new().build(next.clone());
    assert_eq!(interceptor.send(submission("hi")).await.unwrap(), 1);
    assert_eq!(interceptor.send(submission("hi")).await.unwrap(), 2);
}

#[tokio::test]
async fn example_macros_expand_on_submission() {
    let next = Arc::new(RecordingTransport::default());
    let sink = Arc::new(InMemoryRewriteSink::default());
    let store = Arc::new(MemoryStore::with_dictionary(MacroDictionary::example()));
    let interceptor = RewriteInterceptorBuilder::new()
        .store(store)
        .sink(sink.clone())
        .build(next.clone());

    interceptor.send(submission("aiu parser.rs src/")).await.unwrap();
    interceptor.send(submission("ex borrow checker")).await.unwrap();
    interceptor.send(submission("thanks!")).await.unwrap();

    let sent = next.sent();
    assert_eq!(first_part(&sent[0]), "Update parser.rs in src/ and emit the full file.");
    assert_eq!(
        first_part(&sent[1]),
        "Explain borrow checker step by step, including reasoning."
    );
    assert_eq!(first_part(&sent[2]), "thanks!");
    assert_eq!(sink.len(), 2);

    let body: Value = serde_json::from_str(sent[0].text_body().unwrap()).unwrap();
    assert_eq!(body["action"], "next");
    assert_eq!(body["parent_message_id"], "p");
    assert_eq!(body["messages"][0]["content"]["content_type"], "text");
}

#[tokio::test]
async fn body_marker_alone_makes_a_candidate() {
    let next = Arc::new(RecordingTransport::default());
    let store = Arc::new(MemoryStore::with_dictionary(
        MacroDictionary::new().with("gr", "Hello {{1}}"),
    ));
    let interceptor = RewriteInterceptorBuilder::new()
        .store(store)
        .rules(RewriteRules::default())
        .build(next.clone());

    let req = OutboundRequest::post("https://elsewhere.example/send")
        .with_body(json!({"messages": [{"content": {"parts": ["gr World"]}}]}).to_string());
    interceptor.send(req).await.unwrap();
    assert_eq!(first_part(&next.sent()[0]), "Hello World");
}

#[tokio::test]
async fn file_store_edits_apply_to_next_request() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("macros.json");
    let next = Arc::new(RecordingTransport::default());
    let interceptor = RewriteInterceptorBuilder::new()
        .store(Arc::new(FileStore::new(&path)))
        .build(next.clone());

    interceptor.send(submission("ex a b")).await.unwrap();

    FileStore::new(&path)
        .save_raw(r#"{"ex": "{{2}} then {{1}}"}"#)
        .unwrap();
    interceptor.send(submission("ex a b")).await.unwrap();

    std::fs::write(&path, "{ broken").unwrap();
    interceptor.send(submission("ex a b")).await.unwrap();

    let sent = next.sent();
    assert_eq!(first_part(&sent[0]), "ex a b");
    assert_eq!(first_part(&sent[1]), "b then a");
    assert_eq!(first_part(&sent[2]), "ex a b");
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let next = Arc::new(RecordingTransport::default());
    let store = Arc::new(MemoryStore::with_dictionary(
        MacroDictionary::new().with("n", "number {{1}}").with("ex", "{{*}}!"),
    ));
    let interceptor = Arc::new(RewriteInterceptorBuilder::new().store(store).build(next.clone()));

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let interceptor = interceptor.clone();
            tokio::spawn(async move {
                let prompt = if i % 2 == 0 {
                    format!("n {i}")
                } else {
                    format!("plain {i}")
                };
                interceptor.send(submission(&prompt)).await.unwrap();
            })
        })
        .collect();
    for h in handles {
        h.await.unwrap();
    }

    let mut prompts: Vec<String> = next.sent().iter().map(first_part).collect();
    prompts.sort();
    let mut expected: Vec<String> = (0..32)
        .map(|i| {
            if i % 2 == 0 {
                format!("number {i}")
            } else {
                format!("plain {i}")
            }
        })
        .collect();
    expected.sort();
    assert_eq!(prompts, expected);
}
