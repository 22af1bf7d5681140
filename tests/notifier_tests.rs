//! ResponseNotifier tests: callback header contract and fire-and-forget
//! delivery semantics.

mod common;

use common::{event, LOG_STREAM};
use webhook_provisioner::{ProvisionError, ResponseNotifier, ResponseStatus};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifier() -> ResponseNotifier {
    ResponseNotifier::with_client(reqwest::Client::new(), LOG_STREAM.to_string())
}

#[tokio::test]
async fn puts_the_document_with_an_empty_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/callback"))
        .and(header("content-type", ""))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let invocation = event("Create", &format!("{}/callback", server.uri()));
    notifier()
        .send(&invocation, ResponseStatus::Success, Some(serde_json::json!({})))
        .await
        .unwrap();
}

#[tokio::test]
async fn content_length_matches_the_serialized_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/callback"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let invocation = event("Create", &format!("{}/callback", server.uri()));
    notifier()
        .send(&invocation, ResponseStatus::Failed, Some(serde_json::json!({})))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let content_length: usize = requests[0]
        .headers
        .get("content-length")
        .expect("content-length header must be present")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(content_length, requests[0].body.len());

    let document: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(document["Status"], "FAILED");
}

#[tokio::test]
async fn any_callback_status_counts_as_delivered() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/callback"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let invocation = event("Create", &format!("{}/callback", server.uri()));
    let result = notifier()
        .send(&invocation, ResponseStatus::Success, None)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn transport_failure_is_a_notification_transport_error() {
    let invocation = event("Create", "http://127.0.0.1:9/callback");
    let err = notifier()
        .send(&invocation, ResponseStatus::Success, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisionError::NotificationTransport(_)));
}
