//! Comment Endpoints

use crate::api::{error::ApiError, routes::AppState};
use crate::auth::models::AuthUser;
use crate::models::{Comment, CommentWithAuthor};
use crate::policy::{self, Action};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CreateCommentPayload {
    pub post_id: i64,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentPayload {
    pub content: String,
}

/// Add a comment - POST /api/comments (any authenticated account)
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateCommentPayload>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    policy::authorize(user.role, user.id, Action::CreateComment, None).require()?;

    if payload.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Comment content is required".to_string()));
    }

    // The parent post must exist before a comment can reference it
    if !state.posts.exists(payload.post_id)? {
        return Err(ApiError::NotFound("Blog post"));
    }

    let comment = state.comments.insert(&payload.content, user.id, payload.post_id)?;

    info!(
        "Comment {} added to post {} by account {}",
        comment.id, comment.post_id, user.id
    );

    Ok((StatusCode::CREATED, Json(comment)))
}

/// List comments for a post - GET /api/comments/:id (public)
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<CommentWithAuthor>>, ApiError> {
    let comments = state.comments.for_post(post_id)?;
    Ok(Json(comments))
}

/// Edit a comment - PUT /api/comments/:id (owner or Admin)
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCommentPayload>,
) -> Result<Json<Comment>, ApiError> {
    let comment = state.comments.find(id)?.ok_or(ApiError::NotFound("Comment"))?;

    policy::authorize(user.role, user.id, Action::EditComment, Some(comment.author_id))
        .require()?;

    if payload.content.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Comment content cannot be empty".to_string(),
        ));
    }

    state.comments.update_content(id, &payload.content)?;

    Ok(Json(Comment {
        content: payload.content,
        ..comment
    }))
}

/// Delete a comment - DELETE /api/comments/:id (owner or Admin)
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let comment = state.comments.find(id)?.ok_or(ApiError::NotFound("Comment"))?;

    policy::authorize(user.role, user.id, Action::DeleteComment, Some(comment.author_id))
        .require()?;

    state.comments.delete(id)?;

    info!("Comment {} deleted by account {}", id, user.id);

    Ok(StatusCode::NO_CONTENT)
}
