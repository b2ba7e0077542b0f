// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`health`]: liveness and readiness
//! - [`auth`]: login, signup, logout and the caller's identity
//! - [`blogs`]: blog posts
//! - [`comments`]: comments under a post
//! - [`users`]: account administration

pub mod auth;
pub mod blogs;
pub mod comments;
pub mod health;
pub mod users;

pub use auth::{login, logout, me, signup, LoginRequest};
pub use blogs::{create_blog, delete_blog, get_blog, list_blogs, update_blog};
pub use comments::{create_comment, delete_comment, list_comments, update_comment};
pub use health::{health, ready, ReadinessResponse};
pub use users::{
    create_user, delete_user, get_user, list_users, update_user, CreateUserRequest,
    UpdateUserRequest,
};
