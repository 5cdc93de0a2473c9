//! Token service: issuing and verifying the signed, expiring
//! credentials that authenticate review mutations.
//!
//! Tokens are HS256 JWTs carrying the user's id and username. Expired,
//! malformed and bad-signature tokens all fail verification the same
//! way; callers cannot distinguish them.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Fixed token lifetime: one hour from issuance.
pub const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id (uuid)
    pub id: String,
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

pub fn issue(
    secret: &str,
    user_id: &str,
    username: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        id: user_id.to_string(),
        username: username.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
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

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let token = issue(SECRET, "user-1", "alice").unwrap();
        let claims = verify(SECRET, &token).unwrap();

        assert_eq!(claims.id, "user-1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue(SECRET, "user-1", "alice").unwrap();
        assert!(verify("other-secret", &token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(verify(SECRET, "not.a.jwt").is_err());
        assert!(verify(SECRET, "").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Hand-build a token whose exp is far enough in the past to clear
        // the default validation leeway.
        let now = Utc::now();
        let claims = Claims {
            id: "user-1".to_string(),
            username: "alice".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify(SECRET, &token).is_err());
    }
}
