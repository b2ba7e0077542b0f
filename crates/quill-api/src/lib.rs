// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # quill-api
//!
//! REST API server for the Quill blog backend.
//!
//! Provides the HTTP routes for accounts, posts and comments, bcrypt
//! password hashing, HMAC-signed JWT access tokens, and the role gate that
//! sits in front of every protected route.
//!
//! ## Request path
//!
//! ```text
//! request -> trace/cors/timeout -> AuthLayer -> RoleLayer -> handler
//! ```
//!
//! Public routes skip both gates. Token-only routes skip the role gate.

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

// =============================================================================
// Re-exports
// =============================================================================

pub use auth::{AuthContext, Claims, JwtConfig, JwtManager, PasswordHasher, Role, TokenIssuer};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use middleware::{AccessPolicy, AuthLayer, RoleLayer};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
