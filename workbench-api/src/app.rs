//! Application state and router builder
//!
//! This module defines the shared application state and provides
//! a function to build the Axum router with all routes and middleware.
//!
//! # Example
//!
//! ```no_run
//! use workbench_api::{app::AppState, config::Config};
//! use workbench_shared::db::pool::create_pool;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = create_pool(&config.pool_config()).await?;
//! let state = AppState::new(pool, config);
//! let app = workbench_api::app::build_router(state);
//! # Ok(())
//! # }
//! ```

use crate::{config::Config, middleware::auth::jwt_auth_layer, routes};
use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request},
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{info_span, Level};
use workbench_shared::{
    auth::jwt::{self, Claims, JwtError},
    models::{Product, Project, ProjectItem, User},
    repository::{
        MemoryStore, PgProductRepository, PgProjectItemRepository, PgProjectRepository,
        PgUserRepository, ProductRepository, ProjectItemRepository, ProjectRepository,
        UserRepository,
    },
    services::{ProductService, ProjectItemService, ProjectService, UserService},
};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is reference counted, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool; `None` when running on in-memory storage
    pub db: Option<PgPool>,

    /// Application configuration
    pub config: Arc<Config>,

    pub users: UserService,
    pub products: ProductService,
    pub projects: ProjectService,
    pub project_items: ProjectItemService,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn new(db: PgPool, config: Config) -> Self {
        Self::with_repositories(
            Some(db.clone()),
            config,
            Arc::new(PgUserRepository::new(db.clone())),
            Arc::new(PgProductRepository::new(db.clone())),
            Arc::new(PgProjectRepository::new(db.clone())),
            Arc::new(PgProjectItemRepository::new(db)),
        )
    }

    /// State backed by in-process stores, for tests and local experiments
    pub fn in_memory(config: Config) -> Self {
        Self::with_repositories(
            None,
            config,
            Arc::new(MemoryStore::<User>::new()),
            Arc::new(MemoryStore::<Product>::new()),
            Arc::new(MemoryStore::<Project>::new()),
            Arc::new(MemoryStore::<ProjectItem>::new()),
        )
    }

    fn with_repositories(
        db: Option<PgPool>,
        config: Config,
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        projects: Arc<dyn ProjectRepository>,
        project_items: Arc<dyn ProjectItemRepository>,
    ) -> Self {
        Self {
            users: UserService::new(users, config.password, info_span!("user_service")),
            products: ProductService::new(products, info_span!("product_service")),
            projects: ProjectService::new(projects, info_span!("project_service")),
            project_items: ProjectItemService::new(
                project_items,
                info_span!("project_item_service"),
            ),
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Signs a token for `user` with the configured lifetime
    pub fn issue_token(&self, user: &User) -> Result<String, JwtError> {
        let claims = Claims::new(
            user.id,
            user.email.as_str(),
            chrono::Duration::seconds(self.config.jwt.expiration_seconds),
        );
        jwt::create_token(&claims, self.jwt_secret())
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health, /health/live, /health/ready   # public
/// └── /v1/
///     ├── POST /auth/login                   # public
///     ├── /users[/:id]                       # JWT
///     ├── /products[/:id], /products/:id/stock, /products/sku/:sku
///     ├── /projects[/:id], /projects/owner/:owner_id
///     └── /project-items[/:id], /project-items/project/:project_id,
///         /project-items/assignee/:user_id
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Request id (set from the incoming `x-request-id` or a new UUID)
/// 2. Logging (tower-http TraceLayer)
/// 3. Request id propagation onto the response
/// 4. CORS (tower-http CorsLayer)
/// 5. Request timeout
/// 6. Authentication (on the protected `/v1` routes only)
pub fn build_router(state: AppState) -> Router {
    use routes::{auth, health, products, project_items, projects, users};

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    let protected_routes = Router::new()
        .route("/users", post(users::create_user).get(users::list_users))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/products/:id/stock", patch(products::update_product_stock))
        .route("/products/sku/:sku", get(products::get_product_by_sku))
        .route(
            "/projects",
            post(projects::create_project).get(projects::list_projects),
        )
        .route(
            "/projects/:id",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/projects/owner/:owner_id", get(projects::get_projects_by_owner))
        .route(
            "/project-items",
            post(project_items::create_project_item).get(project_items::list_project_items),
        )
        .route(
            "/project-items/:id",
            get(project_items::get_project_item)
                .put(project_items::update_project_item)
                .delete(project_items::delete_project_item),
        )
        .route(
            "/project-items/project/:project_id",
            get(project_items::get_project_items_by_project),
        )
        .route(
            "/project-items/assignee/:user_id",
            get(project_items::get_project_items_by_assignee),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers([header::HeaderName::from_static("x-request-id")])
            .allow_credentials(true)
            .max_age(Duration::from_secs(3600))
    };

    let timeout = Duration::from_secs(state.config.api.request_timeout_seconds);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
