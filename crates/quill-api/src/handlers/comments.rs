// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Comment handlers. Every route is scoped to one blog post.

use axum::{
    extract::{Path, State},
    Json,
};
use quill_core::{BlogId, Comment, CommentId, CommentPatch, NewComment};

use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::extractors::{parse_id, Auth, ValidatedJson};
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /comments/blog/{blog_id}
pub async fn list_comments(
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
) -> ApiResult<Json<Vec<Comment>>> {
    let blog_id = parse_id::<BlogId>(&blog_id)?;
    Ok(Json(state.store().comments().list_comments(blog_id).await?))
}

/// POST /comments/blog/{blog_id}
pub async fn create_comment(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(blog_id): Path<String>,
    ValidatedJson(new): ValidatedJson<NewComment>,
) -> ApiResult<MessageResponse> {
    let blog_id = parse_id::<BlogId>(&blog_id)?;

    let mut errors = ValidationErrors::new();
    errors.require("comment_body", &new.comment_body, "Comment body is required");
    errors.into_result(())?;

    if state.store().blogs().get_blog(blog_id).await?.is_none() {
        return Err(ApiError::not_found("blog"));
    }

    let comment = state.store().comments().insert_comment(blog_id, new).await?;
    tracing::info!(
        comment_id = %comment.id,
        blog_id = %blog_id,
        user_id = %ctx.user_id,
        "Comment created"
    );

    Ok(MessageResponse::with_id("Comment created successfully", comment.id)
        .with_blog_id(blog_id)
        .created())
}

/// PUT /comments/blog/{blog_id}/{id}
pub async fn update_comment(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path((blog_id, id)): Path<(String, String)>,
    ValidatedJson(patch): ValidatedJson<CommentPatch>,
) -> ApiResult<MessageResponse> {
    let blog_id = parse_id::<BlogId>(&blog_id)?;
    let id = parse_id::<CommentId>(&id)?;

    let comment = state
        .store()
        .comments()
        .update_comment(blog_id, id, patch)
        .await?;
    tracing::info!(comment_id = %comment.id, user_id = %ctx.user_id, "Comment updated");

    Ok(MessageResponse::with_id("Comment updated successfully", comment.id).with_blog_id(blog_id))
}

/// DELETE /comments/blog/{blog_id}/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path((blog_id, id)): Path<(String, String)>,
) -> ApiResult<MessageResponse> {
    let blog_id = parse_id::<BlogId>(&blog_id)?;
    let id = parse_id::<CommentId>(&id)?;

    state.store().comments().delete_comment(blog_id, id).await?;
    tracing::info!(comment_id = %id, user_id = %ctx.user_id, "Comment deleted");

    Ok(MessageResponse::with_id("Comment deleted successfully", id).with_blog_id(blog_id))
}
