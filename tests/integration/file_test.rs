//! Integration tests for upload, delete, rename and move.

mod helpers;

use http::StatusCode;
use serde_json::json;

use cabinet_storage::BlobOp;

async fn with_folders(app: &helpers::TestApp, token: &str, names: &[&str]) {
    for name in names {
        let response = app
            .request("POST", "/api/folders", Some(json!({ "name": name })), Some(token))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_upload_to_root_and_folder() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;
    with_folders(&app, &token, &["docs"]).await;

    let response = app.upload(&token, "notes.txt", b"root file", &[]).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["storage_key"], "alice/notes.txt");
    assert_eq!(response.body["data"]["size"], 9);

    let response = app
        .upload(&token, "upload.bin", b"data", &[("name", "report.pdf"), ("parent", "docs")])
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["name"], "report.pdf");
    assert_eq!(response.body["data"]["storage_key"], "alice/docs/report.pdf");
    assert_eq!(
        app.blobs.get("alice/docs/report.pdf").as_deref(),
        Some(&b"data"[..])
    );
}

#[tokio::test]
async fn test_upload_duplicate_conflicts() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;

    app.upload(&token, "a.txt", b"one", &[]).await;
    let response = app.upload(&token, "a.txt", b"two", &[]).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(app.blobs.get("alice/a.txt").as_deref(), Some(&b"one"[..]));
}

#[tokio::test]
async fn test_upload_into_missing_folder() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;

    let response = app
        .upload(&token, "a.txt", b"x", &[("parent", "nowhere")])
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.blobs.is_empty());
}

#[tokio::test]
async fn test_upload_over_limit() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;
    let big = vec![0u8; 2048];

    let response = app.upload(&token, "big.bin", &big, &[]).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.blobs.is_empty());
}

#[tokio::test]
async fn test_delete_file_twice() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;
    app.upload(&token, "a.txt", b"x", &[]).await;

    let response = app
        .request("POST", "/api/files/delete", Some(json!({ "name": "a.txt" })), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["changed"], true);

    let response = app
        .request("POST", "/api/files/delete", Some(json!({ "name": "a.txt" })), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["changed"], false);
    assert!(app.blobs.is_empty());
}

#[tokio::test]
async fn test_rename_file() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;
    with_folders(&app, &token, &["docs"]).await;
    app.upload(&token, "a.txt", b"x", &[("parent", "docs")]).await;
    app.upload(&token, "taken.txt", b"y", &[("parent", "docs")]).await;

    let response = app
        .request(
            "POST",
            "/api/files/rename",
            Some(json!({ "old_name": "a.txt", "new_name": "taken.txt", "parent": "docs" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "POST",
            "/api/files/rename",
            Some(json!({ "old_name": "a.txt", "new_name": "b.txt", "parent": "docs" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["changed"], true);
    assert!(app.blobs.get("alice/docs/a.txt").is_none());
    assert!(app.blobs.get("alice/docs/b.txt").is_some());
}

#[tokio::test]
async fn test_move_file_between_folders() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;
    with_folders(&app, &token, &["inbox", "archive"]).await;
    app.upload(&token, "a.txt", b"x", &[("parent", "inbox")]).await;

    let response = app
        .request(
            "POST",
            "/api/files/move",
            Some(json!({ "name": "a.txt", "from": "inbox", "to": "archive" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["changed"], true);
    assert!(app.blobs.get("alice/inbox/a.txt").is_none());
    assert!(app.blobs.get("alice/archive/a.txt").is_some());

    let response = app
        .request(
            "POST",
            "/api/files/move",
            Some(json!({ "name": "a.txt", "from": "archive", "to": "missing" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.blobs.get("alice/archive/a.txt").is_some());
}

#[tokio::test]
async fn test_failed_compensation_reports_partial_failure() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;
    app.catalog.set_fail_writes(true);
    app.blobs.fail_after(BlobOp::Delete, 0);

    let response = app.upload(&token, "a.txt", b"x", &[]).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "PARTIAL_FAILURE");
    // The orphan blob is left behind for the reconcile audit.
    assert!(app.blobs.get("alice/a.txt").is_some());
}

#[tokio::test]
async fn test_users_cannot_see_each_other() {
    let app = helpers::TestApp::new();
    let alice = app.register_and_login("alice").await;
    let bob = app.register_and_login("bob").await;

    app.upload(&alice, "a.txt", b"x", &[]).await;
    let response = app.upload(&bob, "a.txt", b"y", &[]).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app.request("GET", "/api/objects", None, Some(&bob)).await;
    assert_eq!(response.body["data"]["keys"], json!(["bob/a.txt"]));
}
