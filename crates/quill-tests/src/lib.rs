// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Quill Integration Tests
//!
//! Integration tests for the Quill blog backend plus the utilities they
//! share.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Request bodies, accounts and configurations
//!   - `builders`: Request builder for driving the router
//!   - `assertions`: Response assertion helpers
//!   - `mocks`: Recording notifier
//!   - `harness`: In-process application with seeding helpers
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p quill-tests
//!
//! cargo test -p quill-tests --test integration_auth
//! cargo test -p quill-tests --test integration_api
//! cargo test -p quill-tests --test integration_config
//! ```
//!
//! ## Test Categories
//!
//! ### Auth Tests (`integration_auth.rs`)
//! - Signup, approval and login
//! - Bearer token verification failures
//! - Role gates per route group
//! - CORS preflight
//!
//! ### API Tests (`integration_api.rs`)
//! - Blog and comment lifecycles
//! - User administration
//! - Validation, not-found and conflict responses
//! - Health and readiness
//!
//! ### Config Tests (`integration_config.rs`)
//! - File formats, placeholders and validation
//! - Mapping onto the server configuration
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use quill_api::Role;
//! use quill_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::new();
//!     let token = app.token_for(Role::Creator).await;
//!     let response = app
//!         .send(TestRequest::post(app.path("/blog")).bearer(&token).json(BlogFixtures::new_blog()))
//!         .await;
//!     response.assert_status(StatusCode::CREATED);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
    pub use axum::http::StatusCode;
}
