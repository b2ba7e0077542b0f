// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use std::str::FromStr;

use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use quill_core::StoreError;
use serde::de::DeserializeOwned;

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::middleware::AUTHENTICATION_REQUIRED;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for authenticated requests.
///
/// Reads the [`AuthContext`] that `AuthLayer` attached. Returns 401 if the
/// route was mounted without it.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(ctx): Auth) -> impl IntoResponse {
///     format!("Hello, {}", ctx.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Auth)
            .ok_or_else(|| ApiError::unauthorized(AUTHENTICATION_REQUIRED))
    }
}

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// JSON body extractor whose rejection is an [`ApiError`].
///
/// Malformed bodies become 400 with the standard error body instead of
/// axum's plain-text rejection.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {}", e.body_text())))?;

        Ok(ValidatedJson(value))
    }
}

// =============================================================================
// Path identifiers
// =============================================================================

/// Parses a path segment into a typed identifier.
///
/// Malformed identifiers cannot name an existing record, so they surface as
/// 404 through the `StoreError` conversion.
pub fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = StoreError>,
{
    raw.parse::<T>().map_err(ApiError::from)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use axum::body::Body;
    use axum::http::StatusCode;
    use quill_core::BlogId;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    #[tokio::test]
    async fn test_auth_extractor() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let err = Auth::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let mut req = axum::http::Request::new(());
        req.extensions_mut()
            .insert(AuthContext::new("u-1", "alice", Role::Admin));
        let (mut parts, _) = req.into_parts();
        let Auth(ctx) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_validated_json() {
        let req = axum::http::Request::builder()
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"quill"}"#))
            .unwrap();
        let ValidatedJson(payload) = ValidatedJson::<Payload>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(payload.name, "quill");

        let req = axum::http::Request::builder()
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let err = ValidatedJson::<Payload>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_id() {
        let id = BlogId::generate();
        assert_eq!(parse_id::<BlogId>(&id.to_string()).unwrap(), id);

        let err = parse_id::<BlogId>("not-a-uuid").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
