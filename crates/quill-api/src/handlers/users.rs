// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User account handlers.
//!
//! Account creation is shared between `POST /auth/signup` and `POST /users`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use quill_core::{EmailMessage, NewUser, User, UserId, UserPatch};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Role;
use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::extractors::{parse_id, Auth, ValidatedJson};
use crate::response::MessageResponse;
use crate::state::AppState;

/// How long a verification code stays valid.
const VERIFY_CODE_TTL_HOURS: i64 = 24;

// =============================================================================
// Request bodies
// =============================================================================

/// Body of `POST /auth/signup` and `POST /users`.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    /// Login name.
    pub user_name: String,
    /// Contact address.
    pub user_email: String,
    /// Plaintext password.
    pub user_password: String,
    /// Role name; only `User` may be requested here.
    pub role: Option<String>,
}

/// Body of `PUT /users/{id}`.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    /// New login name.
    pub user_name: Option<String>,
    /// New contact address.
    pub user_email: Option<String>,
    /// New plaintext password.
    pub user_password: Option<String>,
    /// New role name.
    pub role: Option<String>,
    /// New approval state.
    pub user_approved: Option<bool>,
}

/// Resolves a requested role name. Only canonical names are accepted.
fn resolve_role(requested: Option<&str>) -> ApiResult<Role> {
    match requested {
        None | Some("") => Ok(Role::User),
        Some(name) => match Role::parse(name) {
            Role::Unknown => Err(ApiError::invalid_field(
                "role",
                format!("unknown role: {}", name),
            )),
            role => Ok(role),
        },
    }
}

/// Role for a self-registered account. Anything above `User` is granted by
/// an admin through `PUT /users/{id}`.
fn registration_role(requested: Option<&str>) -> ApiResult<Role> {
    match resolve_role(requested)? {
        Role::User => Ok(Role::User),
        role => Err(ApiError::invalid_field(
            "role",
            format!("role {} cannot be self-assigned", role),
        )),
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Creates an unapproved account and mails its verification code.
pub(crate) async fn register_user(state: &AppState, request: CreateUserRequest) -> ApiResult<User> {
    let mut errors = ValidationErrors::new();
    errors.require("user_name", &request.user_name, "Username is required");
    errors.require("user_email", &request.user_email, "Email is required");
    errors.require_present("user_password", &request.user_password, "Password is required");
    errors.into_result(())?;

    let role = registration_role(request.role.as_deref())?;

    let users = state.store().users();
    if users.find_user_by_email(&request.user_email).await?.is_some() {
        return Err(ApiError::conflict("email already in use"));
    }
    if users.find_user_by_name(&request.user_name).await?.is_some() {
        return Err(ApiError::conflict("username already in use"));
    }

    let password_hash = state.hasher.hash_async(request.user_password).await?;
    let verify_code = Uuid::new_v4().to_string();

    let user = users
        .insert_user(NewUser {
            user_name: request.user_name,
            user_email: request.user_email,
            password_hash,
            role: role.as_str().to_string(),
            approved: false,
            verify_code: Some(verify_code.clone()),
            verify_expires: Some(Utc::now() + Duration::hours(VERIFY_CODE_TTL_HOURS)),
        })
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    let message = EmailMessage::verification(&user.user_email, &user.user_name, &verify_code);
    if let Err(e) = state.notifier().send(message).await {
        tracing::warn!(
            user_id = %user.id,
            notifier = state.notifier().name(),
            error = %e,
            "Failed to send verification email"
        );
    }

    Ok(user)
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = state.store().users().list_users().await?;
    Ok(Json(users))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id = parse_id::<UserId>(&id)?;
    state
        .store()
        .users()
        .get_user(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("user"))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = register_user(&state, request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let id = parse_id::<UserId>(&id)?;

    let mut errors = ValidationErrors::new();
    if let Some(ref name) = request.user_name {
        errors.require("user_name", name, "Username cannot be empty");
    }
    if let Some(ref email) = request.user_email {
        errors.require("user_email", email, "Email cannot be empty");
    }
    if let Some(ref password) = request.user_password {
        errors.require_present("user_password", password, "Password cannot be empty");
    }
    errors.into_result(())?;

    let role = match request.role {
        Some(ref name) => Some(resolve_role(Some(name))?.as_str().to_string()),
        None => None,
    };

    let password_hash = match request.user_password {
        Some(password) => Some(state.hasher.hash_async(password).await?),
        None => None,
    };

    let user = state
        .store()
        .users()
        .update_user(
            id,
            UserPatch {
                user_name: request.user_name,
                user_email: request.user_email,
                password_hash,
                role,
                approved: request.user_approved,
            },
        )
        .await?;

    tracing::info!(user_id = %user.id, by = %ctx.user_id, "User updated");
    Ok(Json(user))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    let id = parse_id::<UserId>(&id)?;
    state.store().users().delete_user(id).await?;

    tracing::info!(user_id = %id, by = %ctx.user_id, "User deleted");
    Ok(MessageResponse::with_id("User deleted successfully", id))
}
