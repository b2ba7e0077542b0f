// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! An in-process application: router, state and recording notifier, driven
//! with `tower::ServiceExt::oneshot` so no socket is bound.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use quill_api::{ApiConfig, ApiServerBuilder, AppState, Role};
use quill_core::model::NewUser;
use quill_core::User;

use super::builders::TestRequest;
use super::fixtures::{ConfigFixtures, UserFixtures};
use super::mocks::RecordingNotifier;
use super::{init_test_logging, unique_test_id};

// =============================================================================
// TestResponse
// =============================================================================

/// A fully buffered response.
#[derive(Debug)]
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when empty or not JSON.
    pub body: Value,
}

impl TestResponse {
    /// Reads a header as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `id` field of a write acknowledgement.
    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .unwrap_or_else(|| panic!("No id in {}", self.body))
            .to_string()
    }
}

// =============================================================================
// TestApp
// =============================================================================

/// One isolated application instance.
pub struct TestApp {
    /// The full router, including CORS and fallbacks.
    pub router: Router,
    /// The shared state behind it.
    pub state: AppState,
    /// Captures verification emails.
    pub notifier: Arc<RecordingNotifier>,
    base_path: String,
}

impl TestApp {
    /// Creates an application with [`ConfigFixtures::api_config`].
    pub fn new() -> Self {
        Self::with_config(ConfigFixtures::api_config())
    }

    /// Creates an application with a custom configuration.
    pub fn with_config(config: ApiConfig) -> Self {
        Self::with_parts(config, Arc::new(RecordingNotifier::new()))
    }

    /// Creates an application with a custom notifier.
    pub fn with_notifier(notifier: Arc<RecordingNotifier>) -> Self {
        Self::with_parts(ConfigFixtures::api_config(), notifier)
    }

    fn with_parts(config: ApiConfig, notifier: Arc<RecordingNotifier>) -> Self {
        init_test_logging();

        let base_path = config.normalized_base_path().to_string();
        let server = ApiServerBuilder::new()
            .config(config)
            .notifier(notifier.clone())
            .build()
            .expect("Failed to build test server");

        Self {
            router: server.router(),
            state: server.state().clone(),
            notifier,
            base_path,
        }
    }

    /// Prefixes `path` with the configured base path.
    pub fn path(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }

    /// Sends a request through the router.
    pub async fn send(&self, request: TestRequest) -> TestResponse {
        self.send_raw(request.build()).await
    }

    /// Sends a prebuilt request through the router.
    pub async fn send_raw(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Inserts an account directly, bypassing signup.
    pub async fn seed_user(&self, user_name: &str, role: &str, approved: bool) -> User {
        let password_hash = self
            .state
            .hasher
            .hash(UserFixtures::PASSWORD)
            .expect("Failed to hash password");

        self.state
            .store()
            .users()
            .insert_user(NewUser {
                user_name: user_name.to_string(),
                user_email: format!("{}@example.com", user_name),
                password_hash,
                role: role.to_string(),
                approved,
                verify_code: None,
                verify_expires: None,
            })
            .await
            .expect("Failed to seed user")
    }

    /// Logs in over HTTP.
    pub async fn login(&self, user_name: &str, password: &str) -> TestResponse {
        self.send(
            TestRequest::post(self.path("/auth/login"))
                .json(UserFixtures::login(user_name, password)),
        )
        .await
    }

    /// Seeds an approved account with `role` and returns its access token.
    pub async fn token_for(&self, role: Role) -> String {
        self.token_for_role_name(role.as_str()).await
    }

    /// Like [`TestApp::token_for`], for arbitrary role strings.
    pub async fn token_for_role_name(&self, role: &str) -> String {
        let user_name = unique_test_id();
        self.seed_user(&user_name, role, true).await;

        let response = self.login(&user_name, UserFixtures::PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.body["accessToken"]
            .as_str()
            .expect("No accessToken in login response")
            .to_string()
    }

    /// Creates a post as a fresh Creator and returns its id.
    pub async fn create_blog(&self) -> String {
        let token = self.token_for(Role::Creator).await;
        let response = self
            .send(
                TestRequest::post(self.path("/blog"))
                    .bearer(&token)
                    .json(super::fixtures::BlogFixtures::new_blog()),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.id()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
