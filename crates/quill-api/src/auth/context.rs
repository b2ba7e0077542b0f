// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication context.

use serde::Serialize;
use uuid::Uuid;

use super::{Claims, Role};

/// Identity attached to a request after its token has been verified.
///
/// Lives in the request extensions for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    /// Account identifier from `sub`.
    pub user_id: String,
    /// Login name.
    pub username: String,
    /// Role; [`Role::Unknown`] when the token named an unrecognized role.
    pub role: Role,
    /// Request ID for tracing.
    pub request_id: Uuid,
}

impl AuthContext {
    /// Creates a context from verified claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            username: claims.username.clone(),
            role: claims.role(),
            request_id: Uuid::now_v7(),
        }
    }

    /// Creates a context directly.
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            role,
            request_id: Uuid::now_v7(),
        }
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Privilege level of the role.
    pub fn level(&self) -> u8 {
        self.role.level()
    }

    /// Returns `true` if the role is one of `roles`. [`Role::Unknown`] never matches.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.role.is_known() && roles.contains(&self.role)
    }

    /// Returns `true` if the role level is at least `level`.
    pub fn has_min_level(&self, level: u8) -> bool {
        self.level() >= level
    }
}
