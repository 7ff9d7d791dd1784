//! Account Endpoints
//! Mission: Registration, login and admin account management

use crate::api::{error::ApiError, routes::AppState};
use crate::auth::models::{
    AssignRoleRequest, AuthUser, LoginRequest, LoginResponse, RegisterRequest,
    ResetPasswordRequest, UserResponse,
};
use crate::models::Role;
use crate::policy::{self, Action};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use tracing::{info, warn};

/// Register a new account - POST /api/auth/register
/// New accounts always start as Subscriber.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if payload.username.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(ApiError::BadRequest(
            "Username, email and password are required".to_string(),
        ));
    }

    let user = state
        .users
        .register(&payload.username, &payload.email, &payload.password)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// Login - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .users
        .verify_credentials(&payload.email, &payload.password)
        .map_err(|e| {
            warn!("❌ Failed login attempt for {}", payload.email);
            ApiError::from(e)
        })?;

    let (token, expires_in) = state.tokens.issue(&user)?;

    info!("✅ Login successful: {} ({})", user.username, user.role.as_str());

    Ok(Json(LoginResponse {
        token,
        expires_in,
        user: UserResponse::from_user(&user),
    }))
}

/// Assign a role - PUT /api/auth/assign-role/:id (Admin only)
pub async fn assign_role(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    Json(payload): Json<AssignRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    // Input validation comes before authorization: an unknown role name is
    // rejected no matter who asks.
    let role = Role::from_str(&payload.role).ok_or(ApiError::InvalidRole)?;

    policy::authorize(requester.role, requester.id, Action::AssignRole, None).require()?;

    let mut user = state.users.find_by_id(user_id)?.ok_or(ApiError::NotFound("User"))?;

    state.users.update_role(user.id, role)?;
    user.role = role;

    Ok(Json(UserResponse::from_user(&user)))
}

/// Delete an account - DELETE /api/auth/delete-user/:id (Admin only)
/// Admin accounts can never be deleted through this path.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let target = state.users.find_by_id(user_id)?.ok_or(ApiError::NotFound("User"))?;

    policy::authorize(
        requester.role,
        requester.id,
        Action::DeleteAccount {
            target_role: target.role,
        },
        Some(target.id),
    )
    .require()?;

    state.users.delete(target.id)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Reset a password - POST /api/auth/reset-password (owner or Admin)
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthUser>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if payload.new_password.is_empty() {
        return Err(ApiError::BadRequest("New password is required".to_string()));
    }

    let target = state
        .users
        .find_by_email(&payload.email)?
        .ok_or(ApiError::NotFound("User"))?;

    policy::authorize(
        requester.role,
        requester.id,
        Action::ResetPassword,
        Some(target.id),
    )
    .require()?;

    state.users.update_password(target.id, &payload.new_password)?;

    info!("Password reset for account {}", target.id);

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::store::{CommentStore, PostStore, UserStore};
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn test_state() -> (AppState, NamedTempFile) {
        let temp = NamedTempFile::new().unwrap();
        let db_path = temp.path().to_str().unwrap();
        let state = AppState {
            users: Arc::new(UserStore::new(db_path, "admin123").unwrap()),
            posts: Arc::new(PostStore::new(db_path).unwrap()),
            comments: Arc::new(CommentStore::new(db_path).unwrap()),
            tokens: Arc::new(TokenService::new(
                "test-secret-key-12345",
                "blogpress",
                "blogpress-clients",
                3600,
            )),
        };
        (state, temp)
    }

    #[tokio::test]
    async fn test_unknown_role_name_rejected_before_privilege_check() {
        let (state, _temp) = test_state();
        let target = state.users.register("alice", "alice@x.com", "pw").unwrap();

        // A Subscriber lacks the privilege to assign roles at all, but the
        // bad role name must win: InvalidRole, not InsufficientRole.
        let requester = AuthUser {
            id: target.id + 100,
            role: Role::Subscriber,
        };

        let result = assign_role(
            State(state),
            Extension(requester),
            Path(target.id),
            Json(AssignRoleRequest {
                role: "SuperAdmin".to_string(),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::InvalidRole)));
    }

    #[tokio::test]
    async fn test_valid_role_name_still_requires_admin() {
        let (state, _temp) = test_state();
        let target = state.users.register("alice", "alice@x.com", "pw").unwrap();

        let requester = AuthUser {
            id: target.id + 100,
            role: Role::Blogger,
        };

        let result = assign_role(
            State(state),
            Extension(requester),
            Path(target.id),
            Json(AssignRoleRequest {
                role: "Blogger".to_string(),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::InsufficientRole)));
    }
}
