//! HTTP API
//! Mission: Map the auth/policy core onto protocol responses

pub mod comments;
pub mod error;
pub mod posts;
pub mod routes;

pub use error::ApiError;
pub use routes::{create_router, AppState};
