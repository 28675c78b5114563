//! JWT access-token generation and validation.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload. There
//! are no refresh tokens; clients log in again once a token expires.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use parkwise_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's role name (`"admin"` or `"user"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4), for audit logs.
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes.
    pub access_token_expiry_mins: i64,
}

/// Default access token expiry in minutes (one working day).
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 8 * 60;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `480`   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

/// Generate an HS256 access token for the given user.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + config.expires_in_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        }
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let token = generate_access_token(42, "admin", &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: "user".to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let signer = test_config();
        let verifier = JwtConfig {
            secret: "some-other-secret".to_string(),
            ..test_config()
        };

        let token = generate_access_token(1, "user", &signer).unwrap();
        assert!(validate_token(&token, &verifier).is_err());
    }
}
