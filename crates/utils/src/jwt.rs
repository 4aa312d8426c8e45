//! Session token helpers. Tokens are HS256 JWTs valid for seven days.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TOKEN_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Stable user identifier (google subject or local user id).
    pub sub: String,
    pub name: String,
    pub email: String,
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        let exp = (Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp();
        Self {
            sub: sub.into(),
            name: name.into(),
            email: email.into(),
            exp,
        }
    }
}

pub fn issue(secret: &str, claims: &Claims) -> Result<String, JwtError> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn verify(secret: &str, token: &str) -> Result<Claims, JwtError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_roundtrip() {
        let claims = Claims::new("42", "Daniel", "daniel@example.com");
        let token = issue("test-secret", &claims).unwrap();
        let decoded = verify("test-secret", &token).unwrap();
        assert_eq!(decoded.sub, "42");
        assert_eq!(decoded.email, "daniel@example.com");
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let claims = Claims::new("42", "Daniel", "daniel@example.com");
        let token = issue("test-secret", &claims).unwrap();
        assert!(verify("other-secret", &token).is_err());
    }
}
