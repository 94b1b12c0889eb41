//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use cabinet_api::AppState;
use cabinet_core::config::{AppConfig, BlobProvider, CatalogBackend};
use cabinet_database::{MemoryCatalog, MemoryUserStore};
use cabinet_storage::MemoryBlobStore;

const BOUNDARY: &str = "cabinet-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Catalog behind the router, for direct inspection
    pub catalog: Arc<MemoryCatalog>,
    /// Blob store behind the router, for direct inspection and fault injection
    pub blobs: Arc<MemoryBlobStore>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application on in-memory stores.
    /// `admin` is the only admin username.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = CatalogBackend::Memory;
        config.storage.provider = BlobProvider::Memory;
        config.storage.max_upload_size_bytes = 1024;
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.auth.admin_usernames = vec!["admin".to_string()];

        let catalog = Arc::new(MemoryCatalog::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let state = AppState::new(
            config.clone(),
            catalog.clone(),
            Arc::new(MemoryUserStore::new()),
            blobs.clone(),
        );

        Self {
            router: cabinet_api::build_app(state),
            catalog,
            blobs,
            config,
        }
    }

    /// Register a user and return their access token
    pub async fn register_and_login(&self, username: &str) -> String {
        let body = serde_json::json!({
            "username": username,
            "email": format!("{username}@test.com"),
            "password": "password123",
        });
        let response = self
            .request("POST", "/api/auth/register", Some(body), None)
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );
        self.login(username, "password123").await
    }

    /// Login and return JWT access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        let response = self
            .request("POST", "/api/auth/login", Some(body), None)
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Upload `content` as `filename` with optional text fields
    /// (`name`, `parent`, `sub`).
    pub async fn upload(
        &self,
        token: &str,
        filename: &str,
        content: &[u8],
        fields: &[(&str, &str)],
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/files")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
