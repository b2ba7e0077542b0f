// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthContext;

// =============================================================================
// MessageResponse
// =============================================================================

/// Acknowledgement of a write: `{"message": ..., "id": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Affected record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning post, for comment writes.
    #[serde(rename = "blogId", skip_serializing_if = "Option::is_none")]
    pub blog_id: Option<String>,
    #[serde(skip)]
    status: Option<StatusCode>,
}

impl MessageResponse {
    /// A bare message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
            blog_id: None,
            status: None,
        }
    }

    /// Message naming the affected record.
    pub fn with_id(message: impl Into<String>, id: impl ToString) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::new(message)
        }
    }

    /// Adds the owning post.
    pub fn with_blog_id(mut self, blog_id: impl ToString) -> Self {
        self.blog_id = Some(blog_id.to_string());
        self
    }

    /// Responds with 201 instead of 200.
    pub fn created(mut self) -> Self {
        self.status = Some(StatusCode::CREATED);
        self
    }
}

impl IntoResponse for MessageResponse {
    fn into_response(self) -> Response {
        let status = self.status.unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

// =============================================================================
// Typed Responses
// =============================================================================

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed access token.
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// The caller's own identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// Account identifier.
    pub user_id: String,
    /// Login name.
    pub username: String,
    /// Canonical role name, `"Unknown"` for unrecognized roles.
    pub role: String,
    /// Privilege level.
    pub level: u8,
}

impl From<&AuthContext> for MeResponse {
    fn from(ctx: &AuthContext) -> Self {
        Self {
            user_id: ctx.user_id.clone(),
            username: ctx.username.clone(),
            role: ctx.role.as_str().to_string(),
            level: ctx.level(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Version string.
    pub version: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[test]
    fn test_message_response_shape() {
        let body = serde_json::to_value(MessageResponse::new("Logged out")).unwrap();
        assert_eq!(body, serde_json::json!({"message": "Logged out"}));

        let body = serde_json::to_value(
            MessageResponse::with_id("Comment created successfully", "c-1").with_blog_id("b-1"),
        )
        .unwrap();
        assert_eq!(body["id"], "c-1");
        assert_eq!(body["blogId"], "b-1");
    }

    #[test]
    fn test_created_status() {
        assert_eq!(MessageResponse::new("ok").into_response().status(), StatusCode::OK);
        assert_eq!(
            MessageResponse::new("ok").created().into_response().status(),
            StatusCode::CREATED
        );
    }

    #[test]
    fn test_token_response_wire_name() {
        let body = serde_json::to_value(TokenResponse {
            access_token: "abc".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"accessToken": "abc"}));
    }

    #[test]
    fn test_me_response() {
        let me = MeResponse::from(&AuthContext::new("u-1", "alice", Role::Creator));
        assert_eq!(me.role, "Creator");
        assert_eq!(me.level, 4);
    }
}
