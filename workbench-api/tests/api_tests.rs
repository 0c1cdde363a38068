//! HTTP tests for the Workbench API
//!
//! Every test drives the real router over in-memory storage:
//! - Health, request ids and authentication
//! - Resource CRUD, soft delete and list filters
//! - Error body shape and status mapping

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::get,
    Extension, Json, Router,
};
use chrono::Duration;
use common::{TestContext, JWT_SECRET, PASSWORD};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use workbench_api::middleware::auth::{jwt_auth_layer, AuthContext};
use workbench_shared::auth::jwt::{create_token, Claims};

fn assert_error(body: &Value, error: &str, code: u16) {
    assert_eq!(body["error"], error, "{}", body);
    assert_eq!(body["code"], code, "{}", body);
    assert!(body["message"].is_string(), "{}", body);
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;

    let live = ctx.send_with(Method::GET, "/health/live", None, None).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body["status"], "alive");

    let ready = ctx.send_with(Method::GET, "/health/ready", None, None).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.body["status"], "ready");

    let health = ctx.send_with(Method::GET, "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "healthy");
    assert_eq!(health.body["database"], "in-memory");
    assert_eq!(health.body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let ctx = TestContext::new().await;

    let generated = ctx.send_with(Method::GET, "/health/live", None, None).await;
    let id = generated.headers["x-request-id"].to_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());

    let request = Request::builder()
        .uri("/health/live")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();
    let propagated = ctx.send_raw(request).await;
    assert_eq!(propagated.headers["x-request-id"], "trace-me-123");

    // Errors carry one too
    let unauthorized = ctx.send_with(Method::GET, "/v1/users", None, None).await;
    assert!(unauthorized.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_login() {
    let ctx = TestContext::new().await;

    let ok = ctx
        .send_with(
            Method::POST,
            "/v1/auth/login",
            Some(json!({ "email": "tester@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    let token = ok.body["token"].as_str().unwrap().to_string();

    // The issued token opens the protected routes
    let me = ctx
        .send_with(
            Method::GET,
            &format!("/v1/users/{}", ctx.user.id),
            None,
            Some(&format!("Bearer {}", token)),
        )
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], "tester@example.com");
}

#[tokio::test]
async fn test_login_failures() {
    let ctx = TestContext::new().await;

    let wrong_password = ctx
        .send_with(
            Method::POST,
            "/v1/auth/login",
            Some(json!({ "email": "tester@example.com", "password": "nope-nope" })),
            None,
        )
        .await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_error(&wrong_password.body, "unauthorized", 401);

    // A prefix of a real address must not match
    let partial_email = ctx
        .send_with(
            Method::POST,
            "/v1/auth/login",
            Some(json!({ "email": "tester@example.co", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(partial_email.status, StatusCode::UNAUTHORIZED);

    let malformed = ctx
        .send_with(
            Method::POST,
            "/v1/auth/login",
            Some(json!({ "email": "not-an-email", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_error(&malformed.body, "validation_error", 400);
    assert_eq!(malformed.body["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_protected_routes_require_valid_token() {
    let ctx = TestContext::new().await;

    let missing = ctx.send_with(Method::GET, "/v1/products", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_error(&missing.body, "unauthorized", 401);

    let garbage = ctx
        .send_with(Method::GET, "/v1/products", None, Some("Bearer not.a.token"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let wrong_scheme = ctx
        .send_with(Method::GET, "/v1/products", None, Some("Basic dXNlcjpwYXNz"))
        .await;
    assert_eq!(wrong_scheme.status, StatusCode::UNAUTHORIZED);

    let other_secret = create_token(
        &Claims::new(ctx.user.id, "tester@example.com", Duration::hours(1)),
        "another-secret-key-at-least-32-bytes-long",
    )
    .unwrap();
    let forged = ctx
        .send_with(
            Method::GET,
            "/v1/products",
            None,
            Some(&format!("Bearer {}", other_secret)),
        )
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);

    let expired = create_token(
        &Claims::new(ctx.user.id, "tester@example.com", Duration::minutes(-10)),
        JWT_SECRET,
    )
    .unwrap();
    let expired = ctx
        .send_with(
            Method::GET,
            "/v1/products",
            None,
            Some(&format!("Bearer {}", expired)),
        )
        .await;
    assert_eq!(expired.status, StatusCode::UNAUTHORIZED);
    assert_eq!(expired.body["message"], "Token expired");
}

#[tokio::test]
async fn test_auth_layer_exposes_caller_to_handlers() {
    let ctx = TestContext::new().await;

    async fn whoami(Extension(auth): Extension<AuthContext>) -> Json<Value> {
        Json(json!({ "user_id": auth.user_id, "email": auth.email }))
    }

    let app = Router::new()
        .route("/whoami", get(whoami))
        .route_layer(axum::middleware::from_fn_with_state(
            ctx.state.clone(),
            jwt_auth_layer,
        ))
        .with_state(ctx.state.clone());

    let request = Request::builder()
        .uri("/whoami")
        .header(header::AUTHORIZATION, ctx.auth_header())
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["user_id"], ctx.user.id.to_string());
    assert_eq!(body["email"], "tester@example.com");
}

#[tokio::test]
async fn test_user_lifecycle() {
    let ctx = TestContext::new().await;

    let created = ctx
        .post(
            "/v1/users",
            json!({ "name": "Ada", "email": "ada@example.com", "password": "hunter22" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert!(created.body.get("password_hash").is_none());
    assert!(created.body.get("password").is_none());
    let id = created.body["id"].as_str().unwrap().to_string();
    assert!(Uuid::parse_str(&id).is_ok());

    let fetched = ctx.get(&format!("/v1/users/{}", id)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["email"], "ada@example.com");

    let updated = ctx
        .put(&format!("/v1/users/{}", id), json!({ "name": "Ada Lovelace" }))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["name"], "Ada Lovelace");
    assert_eq!(updated.body["email"], "ada@example.com");

    let listed = ctx.get("/v1/users?email=ADA@").await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().unwrap().len(), 1);

    let deleted = ctx.delete(&format!("/v1/users/{}", id)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(deleted.body, Value::Null);

    let gone = ctx.get(&format!("/v1/users/{}", id)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_error(&gone.body, "not_found", 404);

    // Deleting again is not an error
    let again = ctx.delete(&format!("/v1/users/{}", id)).await;
    assert_eq!(again.status, StatusCode::NO_CONTENT);

    // The address is free again once its owner is deleted
    let reused = ctx
        .post(
            "/v1/users",
            json!({ "name": "Ada II", "email": "ada@example.com", "password": "hunter22" }),
        )
        .await;
    assert_eq!(reused.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_user_validation_and_conflicts() {
    let ctx = TestContext::new().await;

    let short_password = ctx
        .post(
            "/v1/users",
            json!({ "name": "Bob", "email": "bob@example.com", "password": "12345" }),
        )
        .await;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);
    assert_error(&short_password.body, "validation_error", 400);
    assert_eq!(short_password.body["details"][0]["field"], "password");

    let bad_email = ctx
        .post(
            "/v1/users",
            json!({ "name": "Bob", "email": "bob.example.com", "password": "123456" }),
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.body["details"][0]["field"], "email");

    let duplicate = ctx
        .post(
            "/v1/users",
            json!({ "name": "Again", "email": "tester@example.com", "password": "123456" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_error(&duplicate.body, "conflict", 400);
    assert_eq!(duplicate.body["message"], "Email already exists");
}

#[tokio::test]
async fn test_product_validation() {
    let ctx = TestContext::new().await;

    let free = ctx
        .post("/v1/products", json!({ "name": "Free", "price": 0.0, "sku": "FREE-1" }))
        .await;
    assert_eq!(free.status, StatusCode::BAD_REQUEST);
    assert_eq!(free.body["details"][0]["field"], "price");

    let cheap = ctx
        .post("/v1/products", json!({ "name": "Cheap", "price": 0.01, "sku": "CHEAP-1" }))
        .await;
    assert_eq!(cheap.status, StatusCode::CREATED);
    assert_eq!(cheap.body["stock"], 0);
    assert_eq!(cheap.body["description"], "");

    let negative_stock = ctx
        .post(
            "/v1/products",
            json!({ "name": "Debt", "price": 1.0, "stock": -1, "sku": "DEBT-1" }),
        )
        .await;
    assert_eq!(negative_stock.status, StatusCode::BAD_REQUEST);

    let duplicate = ctx
        .post("/v1/products", json!({ "name": "Copy", "price": 5.0, "sku": "CHEAP-1" }))
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_error(&duplicate.body, "conflict", 400);
    assert_eq!(duplicate.body["message"], "SKU already exists");
}

#[tokio::test]
async fn test_product_stock_adjustments() {
    let ctx = TestContext::new().await;
    let product = ctx.create_product("DSK-1", 199.0, 10).await;
    let id = product["id"].as_str().unwrap();
    let stock_uri = format!("/v1/products/{}/stock", id);

    let restocked = ctx.patch(&stock_uri, json!({ "quantity": 5 })).await;
    assert_eq!(restocked.status, StatusCode::OK);
    assert_eq!(restocked.body["stock"], 15);

    let consumed = ctx.patch(&stock_uri, json!({ "quantity": -15 })).await;
    assert_eq!(consumed.status, StatusCode::OK);
    assert_eq!(consumed.body["stock"], 0);

    let oversold = ctx.patch(&stock_uri, json!({ "quantity": -1 })).await;
    assert_eq!(oversold.status, StatusCode::BAD_REQUEST);
    assert_error(&oversold.body, "insufficient_stock", 400);

    let unchanged = ctx.get(&format!("/v1/products/{}", id)).await;
    assert_eq!(unchanged.body["stock"], 0);

    let unknown = ctx
        .patch(
            &format!("/v1/products/{}/stock", Uuid::new_v4()),
            json!({ "quantity": 1 }),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let missing_quantity = ctx.patch(&stock_uri, json!({})).await;
    assert_eq!(missing_quantity.status, StatusCode::BAD_REQUEST);
    assert_error(&missing_quantity.body, "bad_request", 400);

    let before = ctx.get(&format!("/v1/products/{}", id)).await;
    let zero = ctx.patch(&stock_uri, json!({ "quantity": 0 })).await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
    assert_error(&zero.body, "validation_error", 400);
    assert_eq!(zero.body["details"][0]["field"], "quantity");

    let after = ctx.get(&format!("/v1/products/{}", id)).await;
    assert_eq!(after.body["updated_at"], before.body["updated_at"]);
}

#[tokio::test]
async fn test_product_update_and_sku_lookup() {
    let ctx = TestContext::new().await;
    let product = ctx.create_product("CHR-7", 49.5, 3).await;
    let id = product["id"].as_str().unwrap();

    // Stock is not writable through a regular update
    let updated = ctx
        .put(
            &format!("/v1/products/{}", id),
            json!({ "price": 55.0, "sku": "CHR-8", "stock": 999 }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["price"], 55.0);
    assert_eq!(updated.body["stock"], 3);

    let by_sku = ctx.get("/v1/products/sku/CHR-8").await;
    assert_eq!(by_sku.status, StatusCode::OK);
    assert_eq!(by_sku.body["id"], id);

    let old_sku = ctx.get("/v1/products/sku/CHR-7").await;
    assert_eq!(old_sku.status, StatusCode::NOT_FOUND);

    let invalid = ctx
        .put(&format!("/v1/products/{}", id), json!({ "price": -2.0 }))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    ctx.delete(&format!("/v1/products/{}", id)).await;
    let after_delete = ctx
        .put(&format!("/v1/products/{}", id), json!({ "name": "Zombie" }))
        .await;
    assert_eq!(after_delete.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.get("/v1/products/sku/CHR-8").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_list_pagination_and_ranges() {
    let ctx = TestContext::new().await;
    for i in 1..=25 {
        ctx.create_product(&format!("SKU-{:02}", i), i as f64, i).await;
    }

    let page = ctx.get("/v1/products?limit=10&offset=20").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body.as_array().unwrap().len(), 5);

    let beyond = ctx.get("/v1/products?limit=10&offset=30").await;
    assert_eq!(beyond.body.as_array().unwrap().len(), 0);

    // Default page size
    let first = ctx.get("/v1/products").await;
    assert_eq!(first.body.as_array().unwrap().len(), 20);

    let unbounded = ctx.get("/v1/products?limit=0").await;
    assert_eq!(unbounded.body.as_array().unwrap().len(), 25);

    let ranged = ctx
        .get("/v1/products?price_from=10&price_to=20&sort=price%20asc")
        .await;
    let prices: Vec<f64> = ranged
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices.len(), 11);
    assert_eq!(prices.first(), Some(&10.0));
    assert_eq!(prices.last(), Some(&20.0));

    let by_stock = ctx.get("/v1/products?stock_to=3&sku=sku-0&name=").await;
    assert_eq!(by_stock.body.as_array().unwrap().len(), 3);

    let descending = ctx.get("/v1/products?sort=stock%20desc&limit=1").await;
    assert_eq!(descending.body[0]["stock"], 25);
}

#[tokio::test]
async fn test_malformed_requests_are_bad_requests() {
    let ctx = TestContext::new().await;

    let bad_id = ctx.get("/v1/products/not-a-uuid").await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_error(&bad_id.body, "bad_request", 400);

    let bad_query = ctx.get("/v1/products?price_from=cheap").await;
    assert_eq!(bad_query.status, StatusCode::BAD_REQUEST);

    let bad_sort = ctx.get("/v1/products?sort=price%3B%20drop").await;
    assert_eq!(bad_sort.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_sort.body["details"][0]["field"], "sort");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/products")
        .header(header::AUTHORIZATION, ctx.auth_header())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let bad_json = ctx.send_raw(request).await;
    assert_eq!(bad_json.status, StatusCode::BAD_REQUEST);
    assert_error(&bad_json.body, "bad_request", 400);
}

#[tokio::test]
async fn test_unknown_sort_column_is_internal_error() {
    let ctx = TestContext::new().await;
    ctx.create_product("ANY-1", 1.0, 1).await;

    let response = ctx.get("/v1/products?sort=no_such_column").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "An internal error occurred");
}

#[tokio::test]
async fn test_project_lifecycle() {
    let ctx = TestContext::new().await;

    let project = ctx.create_project("Roadmap").await;
    assert_eq!(project["status"], "active");
    assert_eq!(project["owner_id"], ctx.user.id.to_string());
    let id = project["id"].as_str().unwrap();

    let blank = ctx
        .post("/v1/projects", json!({ "name": "  ", "owner_id": ctx.user.id }))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let with_budget = ctx
        .put(
            &format!("/v1/projects/{}", id),
            json!({ "budget": 1500.0, "status": "paused" }),
        )
        .await;
    assert_eq!(with_budget.status, StatusCode::OK);
    assert_eq!(with_budget.body["budget"], 1500.0);
    assert_eq!(with_budget.body["status"], "paused");

    let cleared = ctx
        .put(&format!("/v1/projects/{}", id), json!({ "budget": null }))
        .await;
    assert_eq!(cleared.body["budget"], Value::Null);
    assert_eq!(cleared.body["status"], "paused");

    ctx.create_project("Other").await;
    let owned = ctx.get(&format!("/v1/projects/owner/{}", ctx.user.id)).await;
    assert_eq!(owned.status, StatusCode::OK);
    assert_eq!(owned.body.as_array().unwrap().len(), 2);

    let paused = ctx.get("/v1/projects?status=paused").await;
    assert_eq!(paused.body.as_array().unwrap().len(), 1);
    assert_eq!(paused.body[0]["id"], id);

    let deleted = ctx.delete(&format!("/v1/projects/{}", id)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let listed = ctx.get("/v1/projects").await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0]["name"], "Other");
}

#[tokio::test]
async fn test_project_item_lifecycle() {
    let ctx = TestContext::new().await;
    let project = ctx.create_project("Launch").await;
    let project_id = project["id"].as_str().unwrap();

    let created = ctx
        .post(
            "/v1/project-items",
            json!({
                "project_id": project_id,
                "name": "Write docs",
                "estimated_hours": 4.0,
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["status"], "pending");
    assert_eq!(created.body["priority"], "medium");
    assert_eq!(created.body["assigned_to"], Value::Null);
    let item_id = created.body["id"].as_str().unwrap();

    ctx.post(
        "/v1/project-items",
        json!({
            "project_id": project_id,
            "name": "Ship it",
            "priority": "high",
            "assigned_to": ctx.user.id,
        }),
    )
    .await;

    let by_project = ctx
        .get(&format!("/v1/project-items/project/{}", project_id))
        .await;
    assert_eq!(by_project.body.as_array().unwrap().len(), 2);

    let by_assignee = ctx
        .get(&format!("/v1/project-items/assignee/{}", ctx.user.id))
        .await;
    assert_eq!(by_assignee.body.as_array().unwrap().len(), 1);
    assert_eq!(by_assignee.body[0]["name"], "Ship it");

    let assigned = ctx
        .put(
            &format!("/v1/project-items/{}", item_id),
            json!({ "assigned_to": ctx.user.id, "status": "in_progress", "actual_hours": 1.5 }),
        )
        .await;
    assert_eq!(assigned.status, StatusCode::OK);
    assert_eq!(assigned.body["status"], "in_progress");
    assert_eq!(assigned.body["actual_hours"], 1.5);

    let high = ctx.get("/v1/project-items?priority=high").await;
    assert_eq!(high.body.as_array().unwrap().len(), 1);

    let estimated = ctx.get("/v1/project-items?estimated_hours_from=4").await;
    assert_eq!(estimated.body.as_array().unwrap().len(), 1);
    assert_eq!(estimated.body[0]["id"], item_id);

    let deleted = ctx.delete(&format!("/v1/project-items/{}", item_id)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(
        ctx.get(&format!("/v1/project-items/{}", item_id)).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/v1/warehouses").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
