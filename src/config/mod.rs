use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Firebase,
    Local,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub provider: AuthProvider,
    pub firebase: FirebaseConfig,
    /// HS256 secret for the local provider
    pub jwt_secret: Option<String>,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub project_id: Option<String>,
    pub client_email: Option<String>,
    pub jwks_url: String,
    pub key_cache_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Empty means any origin is allowed
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("The local auth provider cannot be used in production")]
    LocalAuthInProduction,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Environment profile
    /// defaults are applied first, then individual overrides.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)?;

        config.validate()?;
        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse_or_keep("PORT", &v, self.server.port);
        }

        // Storage
        if let Some(v) = lookup("STORAGE_BACKEND") {
            self.storage = match v.to_ascii_lowercase().as_str() {
                "postgres" | "postgresql" => StorageBackend::Postgres,
                "memory" => StorageBackend::Memory,
                _ => return Err(ConfigError::InvalidValue { name: "STORAGE_BACKEND", value: v }),
            };
        }

        // Database
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.is_empty());
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_or_keep("DATABASE_MAX_CONNECTIONS", &v, self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse_or_keep("DATABASE_CONNECTION_TIMEOUT", &v, self.database.connection_timeout);
        }

        // Auth
        if let Some(v) = lookup("AUTH_PROVIDER") {
            self.auth.provider = match v.to_ascii_lowercase().as_str() {
                "firebase" => AuthProvider::Firebase,
                "local" => AuthProvider::Local,
                _ => return Err(ConfigError::InvalidValue { name: "AUTH_PROVIDER", value: v }),
            };
        }
        if let Some(v) = lookup("FIREBASE_PROJECT_ID") {
            self.auth.firebase.project_id = Some(v).filter(|s| !s.is_empty());
        }
        if let Some(v) = lookup("FIREBASE_CLIENT_EMAIL") {
            self.auth.firebase.client_email = Some(v).filter(|s| !s.is_empty());
        }
        if let Some(v) = lookup("FIREBASE_JWKS_URL") {
            self.auth.firebase.jwks_url = v;
        }
        if let Some(v) = lookup("FIREBASE_KEY_CACHE_SECS") {
            self.auth.firebase.key_cache_secs = parse_or_keep("FIREBASE_KEY_CACHE_SECS", &v, self.auth.firebase.key_cache_secs);
        }
        if let Some(v) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = Some(v).filter(|s| !s.is_empty());
        }
        if let Some(v) = lookup("JWT_EXPIRY_HOURS") {
            self.auth.jwt_expiry_hours = parse_or_keep("JWT_EXPIRY_HOURS", &v, self.auth.jwt_expiry_hours);
        }

        // API
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = parse_or_keep("API_MAX_REQUEST_SIZE_BYTES", &v, self.api.max_request_size_bytes);
        }

        // Security
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage == StorageBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        match self.auth.provider {
            AuthProvider::Firebase if self.auth.firebase.project_id.is_none() => {
                Err(ConfigError::Missing("FIREBASE_PROJECT_ID"))
            }
            AuthProvider::Local if self.environment == Environment::Production => {
                Err(ConfigError::LocalAuthInProduction)
            }
            AuthProvider::Local if self.auth.jwt_secret.is_none() => Err(ConfigError::Missing("JWT_SECRET")),
            _ => Ok(()),
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { host: "0.0.0.0".to_string(), port: 5000 },
            storage: StorageBackend::Postgres,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            auth: AuthConfig {
                provider: AuthProvider::Firebase,
                firebase: FirebaseConfig::default(),
                jwt_secret: None,
                jwt_expiry_hours: 24 * 7, // 1 week
            },
            api: ApiConfig {
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig { cors_origins: Vec::new() },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            auth: AuthConfig {
                jwt_expiry_hours: 24,
                ..Self::development().auth
            },
            api: ApiConfig {
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            auth: AuthConfig {
                jwt_expiry_hours: 4,
                ..Self::development().auth
            },
            api: ApiConfig {
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            ..Self::development()
        }
    }
}

/// Parse a numeric override, keeping `current` when the value does not parse
fn parse_or_keep<T>(name: &str, value: &str, current: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid number, keeping {}", name, value, current);
            current
        }
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            client_email: None,
            jwks_url: DEFAULT_FIREBASE_JWKS_URL.to_string(),
            key_cache_secs: 3600,
        }
    }
}
