use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Account roles, ordered by privilege
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Subscriber, // Default for new accounts; may comment
    Blogger,    // May author blog posts
    Admin,      // Full access, bypasses ownership checks
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Subscriber => "Subscriber",
            Role::Blogger => "Blogger",
            Role::Admin => "Admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "subscriber" => Some(Role::Subscriber),
            "blogger" => Some(Role::Blogger),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Privilege rank for minimum-role gates
    pub fn rank(&self) -> u8 {
        match self {
            Role::Subscriber => 0,
            Role::Blogger => 1,
            Role::Admin => 2,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Subscriber
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: Role,
    pub created_at: String,
}

/// A blog post, owned by the account that created it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
}

/// A comment on a blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
    pub post_id: i64,
    pub created_at: String,
}

/// Public listing of a post with the author's username resolved
#[derive(Debug, Clone, Serialize)]
pub struct PostWithAuthor {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
}

/// Public listing of a comment with the author's username resolved
#[derive(Debug, Clone, Serialize)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub content: String,
    pub author: String,
    pub created_at: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub token_ttl_secs: i64,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "./blogpress.db".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        // The signing secret has no safe default; refuse to start without it.
        let jwt_secret =
            std::env::var("JWT_SECRET").context("JWT_SECRET must be set before startup")?;

        let jwt_issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| "blogpress".to_string());

        let jwt_audience =
            std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "blogpress-clients".to_string());

        let token_ttl_secs = std::env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(3600); // 1-hour tokens by default

        let admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

        Ok(Self {
            database_path,
            port,
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            token_ttl_secs,
            admin_password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let admin = Role::Admin;
        let json = serde_json::to_string(&admin).unwrap();
        assert_eq!(json, r#""Admin""#);

        let blogger: Role = serde_json::from_str(r#""Blogger""#).unwrap();
        assert_eq!(blogger, Role::Blogger);
    }

    #[test]
    fn test_role_string_conversion() {
        assert_eq!(Role::from_str("Subscriber"), Some(Role::Subscriber));
        assert_eq!(Role::from_str("BLOGGER"), Some(Role::Blogger));
        assert_eq!(Role::from_str("admin"), Some(Role::Admin));

        // Anything outside the closed enum is rejected
        assert_eq!(Role::from_str("SuperAdmin"), None);
        assert_eq!(Role::from_str(""), None);
    }

    #[test]
    fn test_role_ranks_are_ordered() {
        assert!(Role::Subscriber.rank() < Role::Blogger.rank());
        assert!(Role::Blogger.rank() < Role::Admin.rank());
    }

    #[test]
    fn test_default_role_is_subscriber() {
        assert_eq!(Role::default(), Role::Subscriber);
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "secret-hash".to_string(),
            role: Role::Subscriber,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("alice@x.com"));
    }
}
