use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use crate::app::AppState;
use crate::auth::{AuthError, IdentityVerifier, VerifiedIdentity};
use crate::config::AppConfig;
use crate::database::MemoryItemStore;

/// Verifier with a fixed token table: `<name>-token` authenticates as `<name>`
pub struct StaticVerifier {
    tokens: HashMap<String, String>,
}

impl Default for StaticVerifier {
    fn default() -> Self {
        let tokens = ["alice", "bob"]
            .into_iter()
            .map(|uid| (format!("{}-token", uid), uid.to_string()))
            .collect();
        Self { tokens }
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        self.tokens
            .get(token)
            .map(|uid| VerifiedIdentity { uid: uid.clone(), email: None })
            .ok_or_else(|| AuthError::InvalidToken("unknown test token".to_string()))
    }
}

pub fn test_config() -> AppConfig {
    let vars: HashMap<&str, &str> = [
        ("STORAGE_BACKEND", "memory"),
        ("AUTH_PROVIDER", "local"),
        ("JWT_SECRET", "test-secret"),
    ]
    .into_iter()
    .collect();
    AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("test configuration is valid")
}

/// Fresh in-memory state; every call starts with an empty store
pub fn test_state() -> AppState {
    AppState::new(Arc::new(MemoryItemStore::new()), Arc::new(StaticVerifier::default()))
}

/// One in-process request against a router
pub struct TestRequest {
    method: String,
    path: String,
    token: Option<String>,
    body: Option<Value>,
}

impl TestRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            token: None,
            body: None,
        }
    }

    pub fn token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_string);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Send and return the status plus the parsed JSON body (`Null` when empty)
    pub async fn send(self, app: &Router) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(self.method.as_str()).uri(&self.path);
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match &self.body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).expect("valid request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}
