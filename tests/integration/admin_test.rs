//! Integration tests for admin user management and the reconcile audit.

mod helpers;

use http::StatusCode;

use cabinet_storage::BlobOp;

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;

    let response = app
        .request("GET", "/api/admin/users", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_and_delete_user() {
    let app = helpers::TestApp::new();
    let admin = app.register_and_login("admin").await;
    let alice = app.register_and_login("alice").await;
    app.request(
        "POST",
        "/api/folders",
        Some(serde_json::json!({ "name": "docs" })),
        Some(&alice),
    )
    .await;
    app.upload(&alice, "a.txt", b"x", &[("parent", "docs")]).await;

    let response = app
        .request("GET", "/api/admin/users", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(2));

    let response = app
        .request("DELETE", "/api/admin/users/alice", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["blobs_removed"], 2);
    assert!(app.blobs.is_empty());

    let response = app
        .request("DELETE", "/api/admin/users/alice", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // A deleted user's token no longer resolves to an account.
    let response = app.request("GET", "/api/auth/me", None, Some(&alice)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reconcile_reports_orphan_blob() {
    let app = helpers::TestApp::new();
    let admin = app.register_and_login("admin").await;
    let alice = app.register_and_login("alice").await;
    app.upload(&alice, "kept.txt", b"x", &[]).await;

    let response = app
        .request("GET", "/api/admin/reconcile", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["orphan_blobs"], serde_json::json!([]));

    app.catalog.set_fail_writes(true);
    app.blobs.fail_after(BlobOp::Delete, 0);
    app.upload(&alice, "orphan.txt", b"y", &[]).await;
    app.catalog.set_fail_writes(false);
    app.blobs.clear_failures();

    let response = app
        .request("GET", "/api/admin/reconcile?owner=alice", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"]["orphan_blobs"],
        serde_json::json!(["alice/orphan.txt"])
    );
    assert_eq!(response.body["data"]["dangling_rows"], serde_json::json!([]));
}

#[tokio::test]
async fn test_admin_views_span_owners() {
    let app = helpers::TestApp::new();
    let admin = app.register_and_login("admin").await;
    let alice = app.register_and_login("alice").await;
    let bob = app.register_and_login("bob").await;
    app.upload(&alice, "a.txt", b"x", &[]).await;
    app.upload(&bob, "b.txt", b"y", &[]).await;

    let response = app
        .request("GET", "/api/admin/files", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(2));

    let response = app
        .request("GET", "/api/admin/objects", None, Some(&admin))
        .await;
    assert_eq!(
        response.body["data"]["keys"],
        serde_json::json!(["alice/a.txt", "bob/b.txt"])
    );
}
