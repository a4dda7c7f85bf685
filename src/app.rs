use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::auth::{FirebaseVerifier, IdentityVerifier, LocalVerifier};
use crate::config::{AppConfig, AuthProvider, SecurityConfig, StorageBackend};
use crate::database::{CategoryRegistry, ItemStore, MemoryItemStore, PgItemStore};
use crate::handlers::{items, system};
use crate::middleware::{require_identity, validate_category};

/// Shared, immutable per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub registry: CategoryRegistry,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            registry: CategoryRegistry::new(store),
            verifier,
        }
    }

    /// Build the configured store and identity verifier
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn ItemStore> = match config.storage {
            StorageBackend::Postgres => Arc::new(
                PgItemStore::connect(&config.database)
                    .await
                    .context("failed to connect to the database")?,
            ),
            StorageBackend::Memory => {
                warn!("Using the in-memory store; items are lost on shutdown");
                Arc::new(MemoryItemStore::new())
            }
        };

        let verifier: Arc<dyn IdentityVerifier> = match config.auth.provider {
            AuthProvider::Firebase => {
                let firebase = &config.auth.firebase;
                let project_id = firebase
                    .project_id
                    .as_deref()
                    .context("FIREBASE_PROJECT_ID is not set")?;
                info!(
                    "Verifying Firebase ID tokens for project {} (service account: {})",
                    project_id,
                    firebase.client_email.as_deref().unwrap_or("none")
                );
                Arc::new(FirebaseVerifier::new(project_id, firebase))
            }
            AuthProvider::Local => {
                let secret = config.auth.jwt_secret.as_deref().context("JWT_SECRET is not set")?;
                warn!("Using local HS256 tokens; do not expose this server publicly");
                Arc::new(LocalVerifier::new(secret))
            }
        };

        Ok(Self::new(store, verifier))
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    // Layers run bottom-up: category gate first, then identity
    let item_routes = Router::new()
        .route("/:category", get(items::list).post(items::create))
        .route("/:category/:id", put(items::update).delete(items::delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_identity))
        .route_layer(middleware::from_fn(validate_category));

    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(item_routes)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
