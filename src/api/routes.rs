use axum::{
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::{comments, posts};
use crate::auth::{api as auth_api, auth_middleware, TokenService};
use crate::store::{CommentStore, PostStore, UserStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub posts: Arc<PostStore>,
    pub comments: Arc<CommentStore>,
    pub tokens: Arc<TokenService>,
}

/// Create the API router. Reads are public; every mutating route sits
/// behind the token middleware.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/assign-role/:id", put(auth_api::assign_role))
        .route("/api/auth/delete-user/:id", delete(auth_api::delete_user))
        .route("/api/auth/reset-password", post(auth_api::reset_password))
        .route("/api/blogs", post(posts::create_post))
        .route(
            "/api/blogs/:id",
            put(posts::update_post).delete(posts::delete_post),
        )
        .route("/api/comments", post(comments::create_comment))
        .route(
            "/api/comments/:id",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let public = Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(auth_api::register))
        .route("/api/auth/login", post(auth_api::login))
        .route("/api/blogs", get(posts::list_posts))
        // ":id" here is the parent blog post id
        .route("/api/comments/:id", get(comments::list_comments));

    public
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

// ===== Route Handlers =====

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
