//! Blog Post Endpoints

use crate::api::{error::ApiError, routes::AppState};
use crate::auth::models::AuthUser;
use crate::models::{BlogPost, PostWithAuthor};
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
pub struct PostPayload {
    pub title: String,
    pub content: String,
}

fn validate_payload(payload: &PostPayload) -> Result<(), ApiError> {
    if payload.title.trim().is_empty() || payload.content.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Title and content are required".to_string(),
        ));
    }
    Ok(())
}

/// Create a blog post - POST /api/blogs (Bloggers & Admins)
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PostPayload>,
) -> Result<(StatusCode, Json<BlogPost>), ApiError> {
    policy::authorize(user.role, user.id, Action::CreatePost, None).require()?;
    validate_payload(&payload)?;

    // Ownership comes from the token, never from the request body
    let post = state.posts.insert(&payload.title, &payload.content, user.id)?;

    info!("Blog post {} created by account {}", post.id, user.id);

    Ok((StatusCode::CREATED, Json(post)))
}

/// List all blog posts - GET /api/blogs (public)
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostWithAuthor>>, ApiError> {
    let posts = state.posts.list()?;
    Ok(Json(posts))
}

/// Update a blog post - PUT /api/blogs/:id (owner or Admin)
pub async fn update_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<PostPayload>,
) -> Result<Json<BlogPost>, ApiError> {
    let post = state.posts.find(id)?.ok_or(ApiError::NotFound("Blog post"))?;

    policy::authorize(user.role, user.id, Action::EditPost, Some(post.author_id)).require()?;
    validate_payload(&payload)?;

    state.posts.update(id, &payload.title, &payload.content)?;

    Ok(Json(BlogPost {
        id,
        title: payload.title,
        content: payload.content,
        author_id: post.author_id,
    }))
}

/// Delete a blog post - DELETE /api/blogs/:id (owner or Admin)
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let post = state.posts.find(id)?.ok_or(ApiError::NotFound("Blog post"))?;

    policy::authorize(user.role, user.id, Action::DeletePost, Some(post.author_id)).require()?;

    state.posts.delete(id)?;

    info!("Blog post {} deleted by account {}", id, user.id);

    Ok(StatusCode::NO_CONTENT)
}
