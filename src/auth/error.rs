use thiserror::Error;

/// Errors from the credential store and token service
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration collided with an existing account
    #[error("email already registered")]
    EmailTaken,

    /// Unknown email or wrong password - deliberately the same variant
    /// for both so callers cannot enumerate accounts
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Any token failure (tamper, expiry, wrong issuer/audience) collapses
    /// into this single variant
    #[error("invalid or expired token")]
    InvalidToken,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}
