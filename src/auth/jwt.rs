//! JWT Token Service
//! Mission: Issue and validate stateless session tokens

use crate::auth::error::AuthError;
use crate::auth::models::{AuthUser, Claims};
use crate::models::{Config, User};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Signs and verifies session tokens with a process-wide symmetric secret.
/// Built once at startup from `Config`; validation is pure computation.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, issuer: &str, audience: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            ttl_secs,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            &config.jwt_issuer,
            &config.jwt_audience,
            config.token_ttl_secs,
        )
    }

    /// Issue a signed token for a user. Returns the token and its
    /// lifetime in seconds.
    pub fn issue(&self, user: &User) -> Result<(String, i64), AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        debug!(
            "Issuing token for user {} ({}), ttl {}s",
            user.id,
            user.role.as_str(),
            self.ttl_secs
        );

        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok((token, self.ttl_secs))
    }

    /// Validate a token and extract the requester. Signature, issuer,
    /// audience and expiry are all checked; every failure collapses into
    /// `AuthError::InvalidToken` so callers cannot tell tamper from expiry.
    pub fn validate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_audience(std::slice::from_ref(&self.audience));

        let decoded = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!("Token rejected: {}", e);
            AuthError::InvalidToken
        })?;

        // We minted the subject claim ourselves; a non-numeric id means the
        // token did not come from this service.
        let id: i64 = decoded
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthUser {
            id,
            role: decoded.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn test_service() -> TokenService {
        TokenService::new("test-secret-key-12345", "blogpress", "blogpress-clients", 3600)
    }

    fn test_user(id: i64, role: Role) -> User {
        User {
            id,
            username: "testuser".to_string(),
            email: "test@x.com".to_string(),
            password_hash: "hash".to_string(),
            role,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let service = test_service();
        let user = test_user(42, Role::Blogger);

        let (token, expires_in) = service.issue(&user).unwrap();
        assert!(!token.is_empty());
        assert_eq!(expires_in, 3600);

        let auth = service.validate(&token).unwrap();
        assert_eq!(auth.id, 42);
        assert_eq!(auth.role, Role::Blogger);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = test_service();
        assert!(matches!(
            service.validate("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(service.validate(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_different_secret_rejected() {
        let issued_by =
            TokenService::new("secret-one", "blogpress", "blogpress-clients", 3600);
        let checked_by =
            TokenService::new("secret-two", "blogpress", "blogpress-clients", 3600);

        let (token, _) = issued_by.issue(&test_user(1, Role::Admin)).unwrap();
        assert!(matches!(
            checked_by.validate(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let issued_by =
            TokenService::new("shared-secret", "other-service", "blogpress-clients", 3600);
        let checked_by =
            TokenService::new("shared-secret", "blogpress", "blogpress-clients", 3600);

        let (token, _) = issued_by.issue(&test_user(1, Role::Subscriber)).unwrap();
        assert!(matches!(
            checked_by.validate(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let issued_by = TokenService::new("shared-secret", "blogpress", "someone-else", 3600);
        let checked_by =
            TokenService::new("shared-secret", "blogpress", "blogpress-clients", 3600);

        let (token, _) = issued_by.issue(&test_user(1, Role::Subscriber)).unwrap();
        assert!(matches!(
            checked_by.validate(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // TTL well past the default validation leeway
        let service =
            TokenService::new("test-secret-key-12345", "blogpress", "blogpress-clients", -7200);

        let (token, _) = service.issue(&test_user(1, Role::Admin)).unwrap();
        assert!(matches!(
            service.validate(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();
        let (token, _) = service.issue(&test_user(5, Role::Subscriber)).unwrap();

        // Flip a character in the payload segment
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        assert_eq!(parts.len(), 3);
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert!(matches!(
            service.validate(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }
}
