//! Authentication Middleware
//! Mission: Gate protected routes behind token validation

use crate::api::error::ApiError;
use crate::api::routes::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Validates the Bearer token and stores the authenticated requester in
/// request extensions. Missing, malformed and invalid tokens all produce
/// the same unauthenticated outcome.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthenticated)?
        .to_string();

    let auth_user = state
        .tokens
        .validate(&token)
        .map_err(|_| ApiError::Unauthenticated)?;

    req.extensions_mut().insert(auth_user);

    Ok(next.run(req).await)
}
