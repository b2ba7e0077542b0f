// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use super::users::{register_user, CreateUserRequest};
use crate::error::ApiResult;
use crate::extractors::{Auth, ValidatedJson};
use crate::response::{MeResponse, MessageResponse, TokenResponse};
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
///
/// Missing fields deserialize as empty strings so both can be reported
/// together as validation errors.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    /// Login name.
    pub user_name: String,
    /// Plaintext password.
    pub user_password: String,
}

/// POST /auth/login
///
/// Exchanges credentials for a signed access token.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let issued = state
        .issuer
        .issue_token(&request.user_name, &request.user_password)
        .await?;

    tracing::info!(user_id = %issued.claims.sub, "User logged in successfully");

    Ok(Json(TokenResponse {
        access_token: issued.access_token,
    }))
}

// =============================================================================
// Signup
// =============================================================================

/// POST /auth/signup
///
/// Registers an unapproved account and sends its verification code.
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = register_user(&state, request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// =============================================================================
// Logout
// =============================================================================

/// POST /auth/logout
///
/// Tokens are stateless; this only acknowledges the request.
pub async fn logout(Auth(ctx): Auth) -> MessageResponse {
    tracing::info!(user_id = %ctx.user_id, "User logged out");
    MessageResponse::new("Logged out successfully")
}

// =============================================================================
// Current user
// =============================================================================

/// GET /auth/me
pub async fn me(Auth(ctx): Auth) -> Json<MeResponse> {
    Json(MeResponse::from(&ctx))
}
