//! Configuration management for the API server
//!
//! Configuration comes from environment variables (a `.env` file is loaded
//! first if present).
//!
//! # Environment Variables
//!
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `API_PORT`: Port to bind to (default: 8080)
//! - `API_PRODUCTION`: Production mode flag (default: false)
//! - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
//! - `STORE_BACKEND`: `postgres` or `memory` (default: postgres)
//! - `DATABASE_URL`: PostgreSQL connection string (required for postgres)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
//! - `JWT_SECRET`: Secret used to verify bearer tokens (required, >= 32 chars)
//! - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
//! - `RUST_LOG`: Log filter

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Persistence configuration
    pub store: StoreConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Log output format
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Production mode (restricts CORS to the configured origins)
    pub production: bool,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Which store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL via sqlx
    Postgres,

    /// Process-local store; data is lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("Unknown STORE_BACKEND '{}', expected 'postgres' or 'memory'", other),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Selected backend
    pub backend: StoreBackend,

    /// PostgreSQL connection URL (required for the postgres backend)
    pub database_url: Option<String>,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for verifying HS256 tokens
    ///
    /// Must be shared with the identity provider and at least 32 bytes.
    pub secret: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable
    Pretty,

    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("Unknown LOG_FORMAT '{}', expected 'pretty' or 'json'", other),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is not a valid port: {}", e))?;

        let production = lookup("API_PRODUCTION")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let backend = lookup("STORE_BACKEND")
            .map(|v| v.parse::<StoreBackend>())
            .transpose()?
            .unwrap_or(StoreBackend::Postgres);

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if backend == StoreBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL environment variable is required for the postgres store");
        }

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is not a number: {}", e))?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let log_format = lookup("LOG_FORMAT")
            .map(|v| v.parse::<LogFormat>())
            .transpose()?
            .unwrap_or(LogFormat::Pretty);

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                production,
                cors_origins,
            },
            store: StoreConfig {
                backend,
                database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
