//! Blogpress - Multi-role Blogging Backend
//! Mission: Token-authenticated, role-gated CRUD over posts and comments

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogpress_backend::{
    api::{create_router, AppState},
    auth::TokenService,
    models::Config,
    store::{CommentStore, PostStore, UserStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing JWT_SECRET is fatal here, never per request
    let config = Config::from_env()?;

    let users = Arc::new(UserStore::new(
        &config.database_path,
        &config.admin_password,
    )?);
    let posts = Arc::new(PostStore::new(&config.database_path)?);
    let comments = Arc::new(CommentStore::new(&config.database_path)?);
    let tokens = Arc::new(TokenService::from_config(&config));

    let app = create_router(AppState {
        users,
        posts,
        comments,
        tokens,
    });

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    info!("🚀 Blogpress backend listening on port {}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
