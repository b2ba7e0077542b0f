// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Blog post handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use quill_core::{Blog, BlogId, BlogPatch, NewBlog};

use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::extractors::{parse_id, Auth, ValidatedJson};
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /blog
pub async fn list_blogs(State(state): State<AppState>) -> ApiResult<Json<Vec<Blog>>> {
    Ok(Json(state.store().blogs().list_blogs().await?))
}

/// GET /blog/{id}
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Blog>> {
    let id = parse_id::<BlogId>(&id)?;
    state
        .store()
        .blogs()
        .get_blog(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("blog"))
}

/// POST /blog
pub async fn create_blog(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(new): ValidatedJson<NewBlog>,
) -> ApiResult<MessageResponse> {
    let mut errors = ValidationErrors::new();
    errors.require("blog_subject", &new.blog_subject, "Subject is required");
    errors.require("blog_body", &new.blog_body, "Body is required");
    errors.into_result(())?;

    let blog = state.store().blogs().insert_blog(new).await?;
    tracing::info!(blog_id = %blog.id, user_id = %ctx.user_id, "Blog created");

    Ok(MessageResponse::with_id("Blog created successfully", blog.id).created())
}

/// PUT /blog/{id}
pub async fn update_blog(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<BlogPatch>,
) -> ApiResult<MessageResponse> {
    let id = parse_id::<BlogId>(&id)?;
    let blog = state.store().blogs().update_blog(id, patch).await?;
    tracing::info!(blog_id = %blog.id, user_id = %ctx.user_id, "Blog updated");

    Ok(MessageResponse::with_id("Blog updated successfully", blog.id))
}

/// DELETE /blog/{id}
pub async fn delete_blog(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    let id = parse_id::<BlogId>(&id)?;
    state.store().blogs().delete_blog(id).await?;
    tracing::info!(blog_id = %id, user_id = %ctx.user_id, "Blog deleted");

    Ok(MessageResponse::with_id("Blog deleted successfully", id))
}
