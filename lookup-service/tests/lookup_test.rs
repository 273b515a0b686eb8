mod common;

use common::{SeededConnector, TestApp};
use reqwest::StatusCode;
use serde_json::json;

fn catalog() -> SeededConnector {
    SeededConnector::new(json!({
        "42": {"id": "42", "name": "Widget"},
        "7": {"id": "7", "name": "Gadget", "tags": ["blue", "small"]},
        "blank": "",
        "motd": "hello"
    }))
    .failing("99")
}

#[tokio::test]
async fn ping_is_acknowledged_without_store_access() {
    let app = TestApp::spawn("westus", catalog()).await;

    let response = app.get("westus", "ping").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), "Ping ACK");
    assert_eq!(app.connector.store("westus").reads(), 0);
}

#[tokio::test]
async fn present_document_is_returned_as_json() {
    let app = TestApp::spawn("westus", catalog()).await;

    let response = app.get("westus", "42").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({"id": "42", "name": "Widget"}));
    assert_eq!(app.connector.store("westus").reads(), 1);
}

#[tokio::test]
async fn missing_document_returns_placeholder_with_200() {
    let app = TestApp::spawn("westus", catalog()).await;

    let response = app.get("westus", "missing").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.text().await.unwrap(),
        "Document 'missing' not found"
    );
}

#[tokio::test]
async fn store_error_is_reported_as_not_found() {
    let app = TestApp::spawn("westus", catalog()).await;

    let response = app.get("westus", "99").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "Document '99' not found");
}

#[tokio::test]
async fn empty_document_is_reported_as_not_found() {
    let app = TestApp::spawn("westus", catalog()).await;

    let response = app.get("westus", "blank").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "Document 'blank' not found");
}

#[tokio::test]
async fn string_document_is_sent_unquoted() {
    let app = TestApp::spawn("westus", catalog()).await;

    let response = app.get("westus", "motd").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), "hello");
}

#[tokio::test]
async fn unavailable_store_still_answers_200() {
    let app = TestApp::spawn("westus", catalog()).await;
    app.connector.store("westus").set_unavailable(true);

    let found = app.get("westus", "42").await;
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(found.text().await.unwrap(), "Document '42' not found");

    let ping = app.get("westus", "ping").await;
    assert_eq!(ping.text().await.unwrap(), "Ping ACK");
}

#[tokio::test]
async fn repeated_lookups_are_idempotent() {
    let app = TestApp::spawn("westus", catalog()).await;

    let first: serde_json::Value = app.get("westus", "7").await.json().await.unwrap();
    let second: serde_json::Value = app.get("westus", "7").await.json().await.unwrap();
    assert_eq!(first, second);

    let absent_first = app.get("westus", "nope").await.text().await.unwrap();
    let absent_second = app.get("westus", "nope").await.text().await.unwrap();
    assert_eq!(absent_first, absent_second);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = TestApp::spawn("westus", catalog()).await;

    let response = reqwest::Client::new()
        .get(format!("{}/42", app.address("westus")))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-me");
}

#[tokio::test]
async fn root_path_has_no_key_route() {
    let app = TestApp::spawn("westus", catalog()).await;

    let response = reqwest::Client::new()
        .get(format!("{}/", app.address("westus")))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
