use std::time::Duration;

use pipeline::{IconImage, IconStore, IntegrationError, QueueId, QueueStatus, QueueTracker};
use serde_json::json;
use upstream::{HttpIconStore, MessageLogTracker};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn image(url: String) -> IconImage {
    IconImage {
        name: "icon.png".to_string(),
        url,
    }
}

#[tokio::test]
async fn fetches_icon_bytes_from_absolute_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bucket/icon.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpIconStore::new(Duration::from_secs(5), None).unwrap();
    let bytes = store
        .fetch_icon(&image(format!("{}/bucket/icon.png", server.uri())))
        .await
        .unwrap();

    assert_eq!(bytes, vec![0x89, 0x50, 0x4e, 0x47]);
}

#[tokio::test]
async fn relative_url_resolves_against_media_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/uploads/icon.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8]))
        .mount(&server)
        .await;

    let store = HttpIconStore::new(Duration::from_secs(5), Some(format!("{}/", server.uri()))).unwrap();
    let bytes = store
        .fetch_icon(&image("/uploads/icon.png".to_string()))
        .await
        .unwrap();

    assert_eq!(bytes, vec![1u8]);
}

#[tokio::test]
async fn relative_url_without_base_fails() {
    let store = HttpIconStore::new(Duration::from_secs(5), None).unwrap();

    let result = store.fetch_icon(&image("/uploads/icon.png".to_string())).await;

    assert!(matches!(result, Err(IntegrationError::Transport { .. })));
}

#[tokio::test]
async fn empty_or_missing_icon_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty.png"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = HttpIconStore::new(Duration::from_secs(5), None).unwrap();

    assert!(matches!(
        store.fetch_icon(&image(format!("{}/empty.png", server.uri()))).await,
        Err(IntegrationError::Empty { what: "icon bytes" })
    ));
    assert!(matches!(
        store.fetch_icon(&image(format!("{}/missing.png", server.uri()))).await,
        Err(IntegrationError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn tracker_puts_status_on_message_log_record() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/voc-automation-messagelogs/42"))
        .and(body_json(json!({ "data": { "status": "In Progress" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 42 } })))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = MessageLogTracker::new(server.uri(), Duration::from_secs(5)).unwrap();

    tracker
        .update_status(QueueId::new(42), QueueStatus::InProgress)
        .await
        .unwrap();
}

#[tokio::test]
async fn tracker_sends_bearer_token_to_custom_collection() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/message-logs/7"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_json(json!({ "data": { "status": "Created" } })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = MessageLogTracker::new(server.uri(), Duration::from_secs(5))
        .unwrap()
        .with_collection("message-logs")
        .with_api_token("tok-1");

    tracker
        .update_status(QueueId::new(7), QueueStatus::Created)
        .await
        .unwrap();
}

#[tokio::test]
async fn tracker_failure_is_reported_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = MessageLogTracker::new(server.uri(), Duration::from_secs(5)).unwrap();

    assert!(matches!(
        tracker.update_status(QueueId::new(1), QueueStatus::Error).await,
        Err(IntegrationError::Status { status: 503, .. })
    ));
}
