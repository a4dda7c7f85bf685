//! HS256 tokens signed with a shared secret, for development and end-to-end tests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, IdentityVerifier, VerifiedIdentity};

pub const LOCAL_ISSUER: &str = "list-tracker";

#[derive(Debug, Serialize, Deserialize)]
pub struct LocalClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
}

impl LocalClaims {
    pub fn new(uid: impl Into<String>, email: Option<String>, expiry_hours: u64) -> Result<Self, AuthError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::TokenGeneration(format!("expiry of {} hours is out of range", expiry_hours)))?
            .timestamp();

        Ok(Self {
            sub: uid.into(),
            email,
            iss: LOCAL_ISSUER.to_string(),
            exp,
            iat: now.timestamp(),
        })
    }
}

/// Sign a local token for `uid`
pub fn issue_local_token(
    secret: &str,
    uid: &str,
    email: Option<String>,
    expiry_hours: u64,
) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::TokenGeneration("empty secret".to_string()));
    }
    if uid.trim().is_empty() {
        return Err(AuthError::TokenGeneration("empty uid".to_string()));
    }

    let claims = LocalClaims::new(uid, email, expiry_hours)?;
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub struct LocalVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl LocalVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[LOCAL_ISSUER]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityVerifier for LocalVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let data = decode::<LocalClaims>(token, &self.key, &self.validation)?;
        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }
        Ok(VerifiedIdentity {
            uid: data.claims.sub,
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_uid_and_email() {
        let token = issue_local_token("secret", "user-1", Some("u@example.com".into()), 1).unwrap();
        let identity = LocalVerifier::new("secret").verify(&token).await.unwrap();
        assert_eq!(identity.uid, "user-1");
        assert_eq!(identity.email.as_deref(), Some("u@example.com"));
    }

    #[tokio::test]
    async fn rejects_wrong_secret() {
        let token = issue_local_token("secret", "user-1", None, 1).unwrap();
        let err = LocalVerifier::new("other").verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn rejects_expired_tokens() {
        let now = Utc::now().timestamp();
        let claims = LocalClaims {
            sub: "user-1".into(),
            email: None,
            iss: LOCAL_ISSUER.into(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        let err = LocalVerifier::new("secret").verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[tokio::test]
    async fn rejects_foreign_issuer() {
        let mut claims = LocalClaims::new("user-1", None, 1).unwrap();
        claims.iss = "someone-else".into();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(LocalVerifier::new("secret").verify(&token).await.is_err());
    }

    #[test]
    fn refuses_to_sign_without_secret_or_uid() {
        assert!(issue_local_token("", "user-1", None, 1).is_err());
        assert!(issue_local_token("secret", " ", None, 1).is_err());
    }

    #[test]
    fn out_of_range_expiry_is_an_error() {
        for hours in [u64::MAX, i64::MAX as u64, 1 << 40] {
            let err = issue_local_token("secret", "user-1", None, hours).unwrap_err();
            assert!(matches!(err, AuthError::TokenGeneration(_)));
        }
    }
}
