//! Blogpress Backend Library
//!
//! Exposes core modules for use by the binary and integration tests.

pub mod api;
pub mod auth;
pub mod models;
pub mod policy;
pub mod store;
