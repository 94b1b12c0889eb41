//! Integration tests for folder and subfolder creation and deletion.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_folder_and_subfolder() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "docs" })), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["name"], "docs");
    assert_eq!(response.body["data"]["storage_key"], "alice/docs/");

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "drafts", "parent": "docs" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["storage_key"], "alice/docs/drafts/");

    let response = app.request("GET", "/api/objects", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"]["keys"],
        json!(["alice/docs/", "alice/docs/drafts/"])
    );
}

#[tokio::test]
async fn test_duplicate_folder_conflicts() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;
    let body = json!({ "name": "docs" });

    app.request("POST", "/api/folders", Some(body.clone()), Some(&token))
        .await;
    let response = app
        .request("POST", "/api/folders", Some(body), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(app.blobs.len(), 1);
}

#[tokio::test]
async fn test_subfolder_requires_parent() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "drafts", "parent": "missing" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.blobs.is_empty());
}

#[tokio::test]
async fn test_third_level_is_rejected() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "deep", "parent": "docs/drafts" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_folder_removes_contents() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;

    app.request("POST", "/api/folders", Some(json!({ "name": "docs" })), Some(&token))
        .await;
    app.request(
        "POST",
        "/api/folders",
        Some(json!({ "name": "drafts", "parent": "docs" })),
        Some(&token),
    )
    .await;
    let response = app
        .upload(&token, "a.txt", b"hello", &[("parent", "docs"), ("sub", "drafts")])
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .request("DELETE", "/api/folders", Some(json!({ "path": "docs" })), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["blobs_removed"], 3);
    assert!(app.blobs.is_empty());

    let response = app
        .request("DELETE", "/api/folders", Some(json!({ "path": "docs" })), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_root_cannot_be_deleted() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;

    let response = app
        .request("DELETE", "/api/folders", Some(json!({ "path": "" })), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_outage_is_service_unavailable() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;
    app.catalog.set_fail_writes(true);

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "docs" })), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["error"], "SERVICE_UNAVAILABLE");
    // The marker written before the catalog step was rolled back.
    assert!(app.blobs.is_empty());
}
