use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// Claims carried by platform-issued session tokens.
///
/// The identity platform mints these; this layer only verifies them. `sub`
/// is the principal's profile id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: impl Into<String>, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.into(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("JWT secret not configured")]
    MissingSecret,
    #[error("invalid session token: {0}")]
    InvalidToken(String),
    #[error("token generation failed: {0}")]
    TokenGeneration(String),
}

/// Verify a session token against the configured platform secret.
pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    verify_token_with(&config::config().security.jwt_secret, token)
}

pub fn verify_token_with(secret: &str, token: &str) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Mint a session token. The identity platform owns token issuance in
/// production; this exists for local development and the test harness.
pub fn mint_token_with(secret: &str, claims: &Claims) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn round_trips_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "artist@example.com", 3600);
        let token = mint_token_with(SECRET, &claims).unwrap();

        let decoded = verify_token_with(SECRET, &token).unwrap();
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.email, "artist@example.com");
    }

    #[test]
    fn rejects_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.c", 3600);
        let token = mint_token_with(SECRET, &claims).unwrap();
        assert!(matches!(
            verify_token_with("other-secret", &token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        // Expired beyond the default validation leeway
        let claims = Claims::new(Uuid::new_v4(), "a@b.c", -600);
        let token = mint_token_with(SECRET, &claims).unwrap();
        assert!(matches!(
            verify_token_with(SECRET, &token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        assert!(matches!(
            verify_token_with("", "whatever"),
            Err(AuthError::MissingSecret)
        ));
    }
}
