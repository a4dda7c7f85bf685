//! Firebase ID token verification against Google's published signing keys.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{AuthError, IdentityVerifier, VerifiedIdentity};
use crate::config::FirebaseConfig;

/// Seconds of clock skew tolerated on `iat`
const IAT_LEEWAY_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    iat: i64,
}

/// Upper bound on a single key set fetch; callers wait on it under the cache lock
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum spacing between key set fetches, whatever triggered them
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

struct CachedKeys {
    set: JwkSet,
    fetched_at: Instant,
}

#[derive(Default)]
struct KeyCache {
    keys: Option<CachedKeys>,
    last_attempt: Option<Instant>,
}

impl KeyCache {
    fn lookup(&self, kid: &str, ttl: Duration) -> Option<Jwk> {
        self.keys
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < ttl)
            .and_then(|cached| cached.set.find(kid).cloned())
    }

    /// Any cached key for `kid`, expired or not
    fn lookup_stale(&self, kid: &str) -> Option<Jwk> {
        self.keys.as_ref().and_then(|cached| cached.set.find(kid).cloned())
    }

    fn throttled(&self) -> bool {
        self.last_attempt
            .is_some_and(|at| at.elapsed() < MIN_REFRESH_INTERVAL)
    }
}

pub struct FirebaseVerifier {
    project_id: String,
    jwks_url: String,
    key_ttl: Duration,
    client: reqwest::Client,
    cache: RwLock<KeyCache>,
}

impl FirebaseVerifier {
    pub fn new(project_id: impl Into<String>, config: &FirebaseConfig) -> Self {
        Self {
            project_id: project_id.into(),
            jwks_url: config.jwks_url.clone(),
            key_ttl: Duration::from_secs(config.key_cache_secs),
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_default(),
            cache: RwLock::new(KeyCache::default()),
        }
    }

    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    /// Look up the signing key for `kid`.
    ///
    /// A stale key set or an unknown `kid` triggers a refresh, at most once
    /// per [`MIN_REFRESH_INTERVAL`]. Concurrent callers queue on the write
    /// lock and reuse the result of the first fetch.
    async fn key_for(&self, kid: &str) -> Result<Jwk, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(jwk) = cache.lookup(kid, self.key_ttl) {
                return Ok(jwk);
            }
            if cache.throttled() {
                return cache
                    .lookup_stale(kid)
                    .ok_or_else(|| AuthError::UnknownKey(kid.to_string()));
            }
        }

        let mut cache = self.cache.write().await;
        // Another caller may have refreshed while we waited
        if let Some(jwk) = cache.lookup(kid, self.key_ttl) {
            return Ok(jwk);
        }
        if cache.throttled() {
            return cache
                .lookup_stale(kid)
                .ok_or_else(|| AuthError::UnknownKey(kid.to_string()));
        }

        cache.last_attempt = Some(Instant::now());
        let set = self.fetch_keys().await?;
        let jwk = set.find(kid).cloned();
        cache.keys = Some(CachedKeys { set, fetched_at: Instant::now() });

        jwk.ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }

    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        debug!("Fetching identity provider keys from {}", self.jwks_url);
        let set = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;
        info!("Loaded {} identity provider signing keys", set.keys.len());
        Ok(set)
    }

    #[cfg(test)]
    async fn seed_keys(&self, set: JwkSet) {
        let mut cache = self.cache.write().await;
        cache.keys = Some(CachedKeys { set, fetched_at: Instant::now() });
        cache.last_attempt = Some(Instant::now());
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken(format!("unexpected algorithm {:?}", header.alg)));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing key id".to_string()))?;

        let jwk = self.key_for(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.project_id.as_str()]);
        validation.set_issuer(&[self.issuer()]);

        let claims = decode::<FirebaseClaims>(token, &key, &validation)?.claims;

        if claims.iat > Utc::now().timestamp() + IAT_LEEWAY_SECS {
            return Err(AuthError::InvalidToken("issued in the future".to_string()));
        }
        if claims.sub.is_empty() || claims.sub.len() > 128 {
            return Err(AuthError::InvalidToken("invalid subject".to_string()));
        }

        Ok(VerifiedIdentity { uid: claims.sub, email: claims.email })
    }
}
