// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! Protected routes compose two layers, innermost last:
//!
//! - [`AuthLayer`]: verifies the bearer token and attaches an `AuthContext`
//! - [`RoleLayer`]: admits or rejects based on the attached role

mod auth;
mod role;

pub use auth::{AuthLayer, AuthMiddleware, MISSING_AUTHORIZATION};
pub use role::{
    AccessPolicy, RoleLayer, RoleMiddleware, AUTHENTICATION_REQUIRED, INSUFFICIENT_PERMISSIONS,
};
