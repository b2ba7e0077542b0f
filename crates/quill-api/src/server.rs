// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, StatusCode},
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::auth::Role;
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{AuthLayer, RoleLayer};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// This is the main entry point for creating and running the HTTP server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout,
            ))
            .layer(create_cors_layer(&self.config));

        let root = Router::new()
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready));

        let api = self.api_routes();
        let router = match self.config.normalized_base_path() {
            "" => root.merge(api),
            base => root.nest(base, api),
        };

        router
            .fallback(route_not_found)
            .layer(DefaultBodyLimit::max(self.config.max_body_size))
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Routes under the base path, grouped by the gate in front of them.
    fn api_routes(&self) -> Router<AppState> {
        let auth = AuthLayer::new(self.state.jwt_manager.clone());

        let public = Router::<AppState>::new()
            .route("/auth/login", post(handlers::login))
            .route("/auth/signup", post(handlers::signup))
            .route("/blog", get(handlers::list_blogs))
            .route("/blog/{id}", get(handlers::get_blog))
            .route("/comments/blog/{blog_id}", get(handlers::list_comments))
            .route("/users", post(handlers::create_user))
            .route("/users/{id}", get(handlers::get_user));

        let authenticated = Router::<AppState>::new()
            .route("/auth/logout", post(handlers::logout))
            .route("/auth/me", get(handlers::me))
            .route("/blog", post(handlers::create_blog))
            .route("/blog/{id}", axum::routing::delete(handlers::delete_blog))
            .route_layer(auth.clone());

        let creators = Router::<AppState>::new()
            .route("/blog/{id}", put(handlers::update_blog))
            .route_layer(RoleLayer::require_min_level(Role::Creator.level()))
            .route_layer(auth.clone());

        let commenters = Router::<AppState>::new()
            .route("/comments/blog/{blog_id}", post(handlers::create_comment))
            .route_layer(RoleLayer::require_role_in([
                Role::Commentor,
                Role::Creator,
                Role::Admin,
            ]))
            .route_layer(auth.clone());

        let moderators = Router::<AppState>::new()
            .route(
                "/comments/blog/{blog_id}/{id}",
                put(handlers::update_comment).delete(handlers::delete_comment),
            )
            .route_layer(RoleLayer::require_role_in([Role::Creator, Role::Admin]))
            .route_layer(auth.clone());

        let admins = Router::<AppState>::new()
            .route("/users", get(handlers::list_users))
            .route(
                "/users/{id}",
                put(handlers::update_user).delete(handlers::delete_user),
            )
            .route_layer(RoleLayer::require_min_level(Role::Admin.level()))
            .route_layer(auth);

        public
            .merge(authenticated)
            .merge(creators)
            .merge(commenters)
            .merge(moderators)
            .merge(admins)
    }

    /// Runs the server.
    pub async fn run(self) -> ApiResult<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        self.serve(listener, shutdown_signal).await
    }

    /// Serves on an already bound listener until `shutdown_signal` resolves.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| ApiError::internal(format!("Failed to read local address: {}", e)))?;
        let router = self.router();

        info!(
            addr = %local_addr,
            base_path = %self.config.base_path,
            store = self.state.store().backend_name(),
            "Starting API server"
        );

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("route")
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
///
/// Wildcards are only honored without credentials; browsers reject the
/// combination and tower-http refuses to build it.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = &config.cors;
    let wildcard = |values: &[String]| values.iter().any(|v| v == "*");

    let mut layer = CorsLayer::new().max_age(Duration::from_secs(cors.max_age_secs));

    if wildcard(&cors.allowed_origins) && !cors.allow_credentials {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter(|o| o.as_str() != "*")
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        layer = layer.allow_origin(AllowOrigin::list(origins));
    }

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    if wildcard(&cors.allowed_headers) && !cors.allow_credentials {
        layer = layer.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = cors
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        layer = layer.allow_headers(AllowHeaders::list(headers));
    }

    if cors.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    layer
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
#[derive(Default)]
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the store.
    pub fn store(mut self, store: quill_core::Store) -> Self {
        self.state_builder = self.state_builder.store(store);
        self
    }

    /// Sets the notifier.
    pub fn notifier(mut self, notifier: Arc<dyn quill_core::Notifier>) -> Self {
        self.state_builder = self.state_builder.notifier(notifier);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

// =============================================================================
// Tests
// =============================================================================
