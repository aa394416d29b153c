//! Shared helpers for API tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bazaar_server::{
    config::{
        AuthConfig, DatabaseConfig, LoggingConfig, ServerBindConfig, ServerConfig, UploadConfig,
    },
    routes::create_router,
    AppState,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "bazaar-test-boundary";

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub uploads: TempDir,
}

pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        server: ServerBindConfig {
            host: "127.0.0.1".into(),
            port: 3003,
            request_timeout_secs: 30,
            body_limit_bytes: 1024 * 1024,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 10,
            run_migrations: true,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret-0123456789abcdef".into(),
            token_ttl_secs: 3600,
        },
        uploads: UploadConfig {
            directory: upload_dir.to_path_buf(),
            max_file_bytes: 4096,
        },
        logging: LoggingConfig::default(),
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let uploads = TempDir::new().unwrap();
        let config = test_config(uploads.path());
        let state = AppState::new(&config).await.unwrap();
        let router = create_router(state.clone());
        Self {
            state,
            router,
            uploads,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.json(Method::GET, uri, token, None).await
    }

    /// Register an account and return its id.
    pub async fn register(&self, email: &str, role: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/v1/users/register",
                None,
                Some(json!({
                    "name": "Test User",
                    "email": email,
                    "password": "password123",
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["user"]["id"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/v1/users/login",
                None,
                Some(json!({ "email": email, "password": "password123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    /// Register and log in, returning (user id, token).
    pub async fn account(&self, email: &str, role: &str) -> (String, String) {
        let id = self.register(email, role).await;
        let token = self.login(email).await;
        (id, token)
    }

    /// Create a product as `token` and return its id.
    pub async fn create_product(&self, token: &str, title: &str, category: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/v1/products",
                Some(token),
                Some(json!({
                    "title": title,
                    "category": category,
                    "price": "9.99",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.uploads.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Text parts as `(name, value)`, plus an optional `(file name, bytes)` image.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Body {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

pub fn multipart_request(method: Method, uri: &str, token: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body)
        .unwrap()
}
