//! API Error Mapping
//! Mission: One place where every logical outcome becomes a response

use crate::auth::error::AuthError;
use crate::policy::DenyReason;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Every failure outcome the API can surface. Handlers return this for all
/// resources so posts, comments and accounts deny things identically.
#[derive(Debug)]
pub enum ApiError {
    EmailTaken,
    InvalidCredentials,
    Unauthenticated,
    InsufficientRole,
    NotOwner,
    CannotDeleteAdmin,
    InvalidRole,
    NotFound(&'static str),
    BadRequest(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken => ApiError::EmailTaken,
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::InvalidToken => ApiError::Unauthenticated,
            AuthError::Storage(e) => ApiError::Internal(e.into()),
            AuthError::Hash(e) => ApiError::Internal(e.into()),
        }
    }
}

impl From<DenyReason> for ApiError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::InsufficientRole => ApiError::InsufficientRole,
            DenyReason::NotOwner => ApiError::NotOwner,
            DenyReason::CannotDeleteAdmin => ApiError::CannotDeleteAdmin,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::EmailTaken => (StatusCode::CONFLICT, "Email already exists".to_string()),
            // Same message for unknown email and wrong password
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            ApiError::InsufficientRole => {
                (StatusCode::FORBIDDEN, "Insufficient role".to_string())
            }
            ApiError::NotOwner => (
                StatusCode::FORBIDDEN,
                "You can only modify your own resources".to_string(),
            ),
            ApiError::CannotDeleteAdmin => (
                StatusCode::FORBIDDEN,
                "Admin accounts cannot be deleted".to_string(),
            ),
            ApiError::InvalidRole => (
                StatusCode::BAD_REQUEST,
                "Invalid role. Allowed roles: Subscriber, Blogger, Admin".to_string(),
            ),
            ApiError::NotFound(entity) => {
                (StatusCode::NOT_FOUND, format!("{} not found", entity))
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}
