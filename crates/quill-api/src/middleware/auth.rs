// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT authentication middleware.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::auth::{AuthContext, JwtManager};
use crate::error::ApiError;

/// Rejection for an absent or unusable `Authorization` header.
pub const MISSING_AUTHORIZATION: &str = "missing or invalid authorization header";

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer that requires a valid bearer token.
///
/// On success the request continues with an [`AuthContext`] in its
/// extensions. On failure the inner service is never called.
#[derive(Clone, Debug)]
pub struct AuthLayer {
    jwt_manager: JwtManager,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(jwt_manager: JwtManager) -> Self {
        Self { jwt_manager }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            jwt_manager: self.jwt_manager.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for JWT authentication.
#[derive(Clone, Debug)]
pub struct AuthMiddleware<S> {
    inner: S,
    jwt_manager: JwtManager,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let jwt_manager = self.jwt_manager.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    tracing::debug!(path = %req.uri().path(), "No usable authorization header");
                    return Ok(ApiError::unauthorized(MISSING_AUTHORIZATION).into_response());
                }
            };

            let claims = match jwt_manager.validate_token(&token) {
                Ok(claims) => claims,
                Err(e) => return Ok(e.into_response()),
            };

            let auth_ctx = AuthContext::from_claims(&claims).with_request_id(Uuid::now_v7());
            tracing::trace!(
                user_id = %auth_ctx.user_id,
                role = %auth_ctx.role,
                request_id = %auth_ctx.request_id,
                "Request authenticated"
            );
            req.extensions_mut().insert(auth_ctx);

            inner.call(req).await
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the bearer token from the Authorization header.
///
/// The scheme must be exactly `Bearer ` and the token non-empty.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Claims, JwtConfig, Role};
    use axum::http::{HeaderValue, StatusCode};
    use tower::ServiceExt;

    fn jwt() -> JwtManager {
        JwtManager::new(JwtConfig::new("middleware-secret-long-enough-for-hs256")).unwrap()
    }

    async fn echo(req: Request<Body>) -> Result<Response, std::convert::Infallible> {
        let body = match req.extensions().get::<AuthContext>() {
            Some(ctx) => format!("{}:{}", ctx.username, ctx.role),
            None => "anonymous".to_string(),
        };
        Ok(Response::new(Body::from(body)))
    }

    async fn call_with(header: Option<&str>) -> (StatusCode, String) {
        let service = AuthLayer::new(jwt()).layer(tower::service_fn(echo));
        let mut builder = Request::builder().uri("/protected");
        if let Some(value) = header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = service
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut req = Request::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();

        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut().insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer mytoken123"),
        );
        assert_eq!(extract_bearer_token(&req), Some("mytoken123".to_string()));
    }

    #[tokio::test]
    async fn test_valid_token_attaches_context() {
        let (token, _) = jwt().create_access_token("u-1", "alice", "Creator").unwrap();
        let (status, body) = call_with(Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("alice:{}", Role::Creator));
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        for header in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer")] {
            let (status, body) = call_with(header).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert!(body.contains(MISSING_AUTHORIZATION), "body: {}", body);
        }
    }

    #[tokio::test]
    async fn test_bad_tokens_rejected_uniformly() {
        let expired = jwt()
            .create_token(&Claims::new("u-1", "alice", "Admin", -60))
            .unwrap();
        let foreign = JwtManager::new(JwtConfig::new("some-other-secret-long-enough-1234"))
            .unwrap()
            .create_access_token("u-1", "alice", "Admin")
            .unwrap()
            .0;

        let at_expiry = jwt()
            .create_token(&Claims::new("u-1", "alice", "Admin", 0))
            .unwrap();

        for token in [expired, at_expiry, foreign, "garbage".to_string()] {
            let (status, body) = call_with(Some(&format!("Bearer {}", token))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert!(body.contains("invalid or expired token"), "body: {}", body);
        }
    }
}
