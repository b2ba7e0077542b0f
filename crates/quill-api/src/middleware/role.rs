// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role gate middleware.
//!
//! Runs after [`AuthLayer`](super::AuthLayer) and decides, from the role in
//! the request's [`AuthContext`], whether the handler may run.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{AuthContext, Role};
use crate::error::ApiError;

/// Rejection when no authenticated identity is attached.
pub const AUTHENTICATION_REQUIRED: &str = "authentication required";

/// Rejection when the role does not satisfy the policy.
pub const INSUFFICIENT_PERMISSIONS: &str = "insufficient permissions";

// =============================================================================
// AccessPolicy
// =============================================================================

/// What a role must satisfy to pass the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Role must be one of the listed roles.
    RoleIn(Vec<Role>),
    /// Role level must be at least this value.
    MinLevel(u8),
}

impl AccessPolicy {
    /// Returns `true` if `ctx` satisfies the policy.
    pub fn allows(&self, ctx: &AuthContext) -> bool {
        match self {
            Self::RoleIn(roles) => ctx.has_any_role(roles),
            Self::MinLevel(level) => ctx.has_min_level(*level),
        }
    }
}

// =============================================================================
// RoleLayer
// =============================================================================

/// Layer enforcing an [`AccessPolicy`].
#[derive(Clone, Debug)]
pub struct RoleLayer {
    policy: Arc<AccessPolicy>,
}

impl RoleLayer {
    /// Admits only the listed roles.
    pub fn require_role_in(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            policy: Arc::new(AccessPolicy::RoleIn(roles.into_iter().collect())),
        }
    }

    /// Admits any role whose level is at least `level`.
    pub fn require_min_level(level: u8) -> Self {
        Self {
            policy: Arc::new(AccessPolicy::MinLevel(level)),
        }
    }

    /// The enforced policy.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }
}

impl<S> Layer<S> for RoleLayer {
    type Service = RoleMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RoleMiddleware {
            inner,
            policy: self.policy.clone(),
        }
    }
}

// =============================================================================
// RoleMiddleware
// =============================================================================

/// Middleware for role enforcement.
#[derive(Clone, Debug)]
pub struct RoleMiddleware<S> {
    inner: S,
    policy: Arc<AccessPolicy>,
}

impl<S> Service<Request<Body>> for RoleMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let policy = self.policy.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let ctx = match req.extensions().get::<AuthContext>() {
                Some(ctx) => ctx.clone(),
                None => {
                    tracing::warn!(path = %req.uri().path(), "No auth context found, denying access");
                    return Ok(ApiError::unauthorized(AUTHENTICATION_REQUIRED).into_response());
                }
            };

            if policy.allows(&ctx) {
                inner.call(req).await
            } else {
                tracing::warn!(
                    user_id = %ctx.user_id,
                    role = %ctx.role,
                    policy = ?*policy,
                    path = %req.uri().path(),
                    "Permission denied"
                );
                Ok(ApiError::forbidden(INSUFFICIENT_PERMISSIONS).into_response())
            }
        })
    }
}

/// Builds a [`RoleLayer`].
///
/// ```ignore
/// require_role!(any: Role::Creator, Role::Admin)
/// require_role!(min: Role::Creator)
/// ```
#[macro_export]
macro_rules! require_role {
    (any: $($role:expr),+ $(,)?) => {
        $crate::middleware::RoleLayer::require_role_in([$($role),+])
    };
    (min: $role:expr) => {
        $crate::middleware::RoleLayer::require_min_level($role.level())
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::convert::Infallible;
    use tower::ServiceExt;

    async fn ok(_req: Request<Body>) -> Result<Response, Infallible> {
        Ok(Response::new(Body::empty()))
    }

    fn request(role: Option<Role>) -> Request<Body> {
        let mut req = Request::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();
        if let Some(role) = role {
            req.extensions_mut()
                .insert(AuthContext::new("u-1", "alice", role));
        }
        req
    }

    async fn status(layer: &RoleLayer, role: Option<Role>) -> StatusCode {
        let mut service = layer.layer(tower::service_fn(ok));
        service
            .ready()
            .await
            .unwrap()
            .call(request(role))
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_role_in_membership() {
        let layer = RoleLayer::require_role_in([Role::Commentor, Role::Creator, Role::Admin]);

        for role in [Role::Commentor, Role::Creator, Role::Admin] {
            assert_eq!(status(&layer, Some(role)).await, StatusCode::OK, "{}", role);
        }
        for role in [Role::User, Role::Manuals, Role::Unknown] {
            assert_eq!(status(&layer, Some(role)).await, StatusCode::FORBIDDEN, "{}", role);
        }
    }

    #[tokio::test]
    async fn test_min_level() {
        let layer = RoleLayer::require_min_level(Role::Creator.level());

        assert_eq!(status(&layer, Some(Role::Creator)).await, StatusCode::OK);
        assert_eq!(status(&layer, Some(Role::Admin)).await, StatusCode::OK);
        assert_eq!(status(&layer, Some(Role::Commentor)).await, StatusCode::FORBIDDEN);
        assert_eq!(status(&layer, Some(Role::Unknown)).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_min_level_all_pairs() {
        let mut roles = vec![Role::Unknown];
        roles.extend(Role::ALL);

        for required in &roles {
            let layer = RoleLayer::require_min_level(required.level());
            for actual in &roles {
                let expected = if actual.level() >= required.level() {
                    StatusCode::OK
                } else {
                    StatusCode::FORBIDDEN
                };
                assert_eq!(
                    status(&layer, Some(*actual)).await,
                    expected,
                    "{} against min {}",
                    actual,
                    required
                );
            }
        }
    }

    #[tokio::test]
    async fn test_missing_context_is_unauthorized() {
        let layer = RoleLayer::require_min_level(0);
        assert_eq!(status(&layer, None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_forbidden_body() {
        let layer = require_role!(min: Role::Admin);
        let response = layer
            .layer(tower::service_fn(ok))
            .oneshot(request(Some(Role::User)))
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], INSUFFICIENT_PERMISSIONS);
    }

    #[test]
    fn test_macro_builds_policy() {
        let layer = require_role!(any: Role::Creator, Role::Admin);
        assert_eq!(
            layer.policy(),
            &AccessPolicy::RoleIn(vec![Role::Creator, Role::Admin])
        );
    }
}
