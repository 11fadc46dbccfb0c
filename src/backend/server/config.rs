/**
 * Server Configuration
 *
 * This module handles loading of server configuration from environment
 * variables (a `.env` file is read by `main` first), and the optional
 * PostgreSQL connection.
 *
 * # Variables
 *
 * | Variable | Default |
 * |----------|---------|
 * | `SERVER_HOST` | `0.0.0.0` |
 * | `SERVER_PORT` | `5000` |
 * | `DATABASE_URL` | unset: in-memory store |
 * | `JWT_SECRET` | development secret (warns) |
 * | `TOKEN_TTL_DAYS` | `7` |
 * | `BCRYPT_COST` | `bcrypt::DEFAULT_COST` |
 * | `CORS_ORIGINS` | `http://localhost:3000,http://localhost:5173` |
 * | `STATIC_DIR` | `public` |
 *
 * # Error Handling
 *
 * Unparsable numbers are a `ConfigError`. A missing or unreachable database
 * is logged and the server continues on the in-memory store.
 */

use std::path::PathBuf;

use chrono::Duration;
use sqlx::PgPool;

use crate::backend::auth::sessions::DEFAULT_TOKEN_TTL_DAYS;
use crate::shared::ConfigError;

const DEV_JWT_SECRET: &str = "blogify-dev-secret-change-in-production";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Cost bounds accepted by `bcrypt::hash`
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl: Duration::days(DEFAULT_TOKEN_TTL_DAYS),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
            static_dir: PathBuf::from("public"),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set. Using an insecure development secret.");
                defaults.jwt_secret
            }
        };

        let token_ttl = match var("TOKEN_TTL_DAYS") {
            Some(raw) => Duration::days(parse_positive("TOKEN_TTL_DAYS", &raw)?),
            None => defaults.token_ttl,
        };

        let bcrypt_cost = match var("BCRYPT_COST") {
            Some(raw) => {
                let cost: u32 = parse_number("BCRYPT_COST", &raw)?;
                if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
                    return Err(ConfigError::InvalidValue {
                        name: "BCRYPT_COST",
                        value: raw,
                    });
                }
                cost
            }
            None => defaults.bcrypt_cost,
        };

        Ok(Self {
            host: var("SERVER_HOST").unwrap_or(defaults.host),
            port: match var("SERVER_PORT") {
                Some(raw) => parse_number("SERVER_PORT", &raw)?,
                None => defaults.port,
            },
            database_url: var("DATABASE_URL"),
            jwt_secret,
            token_ttl,
            bcrypt_cost,
            cors_origins: var("CORS_ORIGINS")
                .map(|raw| split_origins(&raw))
                .unwrap_or(defaults.cors_origins),
            static_dir: var("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
        })
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
    })
}

fn parse_positive(name: &'static str, raw: &str) -> Result<i64, ConfigError> {
    let value: i64 = parse_number(name, raw)?;
    if value <= 0 {
        return Err(ConfigError::InvalidValue {
            name,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

/// Connect to PostgreSQL and run migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable
/// - `None` if `database_url` is `None` or the connection fails
///
/// Migration failures are logged; the pool is still returned.
pub async fn load_database(database_url: Option<&str>) -> Option<PgPool> {
    let Some(database_url) = database_url else {
        tracing::warn!("DATABASE_URL not set. Using the in-memory store; data will not persist.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to the in-memory store.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {:?}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
