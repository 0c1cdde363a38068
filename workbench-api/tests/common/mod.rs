//! Common test utilities for the HTTP suites
//!
//! - In-memory application state (no database needed)
//! - A seeded user and a JWT for it
//! - Request helpers that decode JSON responses

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use workbench_api::app::{build_router, AppState};
use workbench_api::config::Config;
use workbench_shared::models::{CreateUser, User};

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";
pub const PASSWORD: &str = "secret123";

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
    pub user: User,
    pub jwt_token: String,
}

/// Configuration with cheap password hashing
pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "APP_JWT_SECRET" => Some(JWT_SECRET.to_string()),
        "PASSWORD_HASH_MEMORY_KIB" => Some("1024".to_string()),
        "PASSWORD_HASH_ITERATIONS" => Some("1".to_string()),
        "PASSWORD_HASH_PARALLELISM" => Some("1".to_string()),
        _ => None,
    })
    .expect("test configuration")
}

impl TestContext {
    /// Fresh in-memory state with one user who holds a valid token
    pub async fn new() -> Self {
        let state = AppState::in_memory(test_config());

        let user = state
            .users
            .create_user(CreateUser {
                name: "Test User".to_string(),
                email: "tester@example.com".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .expect("seed user");
        let jwt_token = state.issue_token(&user).expect("issue token");

        TestContext {
            app: build_router(state.clone()),
            state,
            user,
            jwt_token,
        }
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Sends an authenticated request
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        self.send_with(method, uri, body, Some(&self.auth_header())).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Sends a request with an explicit (or no) `Authorization` header
    pub async fn send_with(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        authorization: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_raw(request).await
    }

    pub async fn send_raw(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Creates a product through the API and returns its JSON
    pub async fn create_product(&self, sku: &str, price: f64, stock: i32) -> Value {
        let response = self
            .post(
                "/v1/products",
                serde_json::json!({
                    "name": format!("Product {}", sku),
                    "price": price,
                    "stock": stock,
                    "category": "furniture",
                    "sku": sku,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }

    /// Creates a project owned by the seeded user
    pub async fn create_project(&self, name: &str) -> Value {
        let response = self
            .post(
                "/v1/projects",
                serde_json::json!({ "name": name, "owner_id": self.user.id }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }
}
