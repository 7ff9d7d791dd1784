//! Authentication Module
//! Mission: Credential handling, session tokens and the account endpoints

pub mod api;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use error::AuthError;
pub use jwt::TokenService;
pub use middleware::auth_middleware;
pub use models::AuthUser;
