//! JWT encoding and decoding utilities.

use super::types::Claims;
use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use uuid::Uuid;

/// A freshly signed access token.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies HS256 access tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    /// Issue a token for `user_id` valid from now.
    pub fn issue(&self, user_id: Uuid) -> ApiResult<IssuedToken> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> ApiResult<IssuedToken> {
        let claims = Claims::issued_at(user_id, now, self.ttl_secs);
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("token expiry out of range")))?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| ApiError::Internal(err.into()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_32_chars_long!!!";

    #[test]
    fn test_issue_verify_roundtrip() {
        let tokens = TokenService::new(SECRET, 3600);
        let user_id = Uuid::new_v4();

        let issued = tokens.issue(user_id).unwrap();
        let claims = tokens.verify(&issued.token).unwrap();

        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.expires_at(), Some(issued.expires_at));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = TokenService::new(SECRET, 60);
        let issued = tokens
            .issue_at(Uuid::new_v4(), Utc::now() - chrono::Duration::seconds(61))
            .unwrap();

        assert!(matches!(tokens.verify(&issued.token), Err(ApiError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = TokenService::new(SECRET, 3600).issue(Uuid::new_v4()).unwrap();
        let other = TokenService::new("another_secret_key_32_chars_long!", 3600);

        assert!(matches!(other.verify(&issued.token), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn test_garbage_rejected() {
        let tokens = TokenService::new(SECRET, 3600);
        assert!(matches!(tokens.verify("not.a.jwt"), Err(ApiError::InvalidToken)));
    }
}
