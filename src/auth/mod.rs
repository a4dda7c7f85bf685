pub mod firebase;
pub mod local;

use async_trait::async_trait;
use thiserror::Error;

pub use firebase::FirebaseVerifier;
pub use local::{issue_local_token, LocalVerifier};

/// Identity established by a verifier for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Provider-issued user id; items are owned by this value
    pub uid: String,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    Expired,

    #[error("Unknown signing key: {0}")]
    UnknownKey(String),

    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidToken(err.to_string()),
        }
    }
}

/// Verifies a bearer token out of process (or against a shared secret).
/// Implementations must not cache verification results.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}
