//! Configuration management for the API server
//!
//! Settings start from built-in defaults and are overridden by environment
//! variables (a `.env` file is loaded first when present).
//!
//! # Environment Variables
//!
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `APP_PORT`: Port to bind to (default: 8080)
//! - `CORS_ALLOWED_ORIGINS`: Comma separated origins, `*` for any (default: *)
//! - `REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `DATABASE_URL`: PostgreSQL connection string; when unset it is built from
//!   `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_SSL_MODE`
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
//! - `RUN_MIGRATIONS`: Apply migrations on startup (default: true)
//! - `APP_JWT_SECRET`: Secret key for JWT signing (required, >= 32 chars)
//! - `APP_JWT_EXPIRATION`: Token lifetime such as `24h`, `90m`, `3600s` (default: 24h)
//! - `LOG_LEVEL`: Default log filter when `RUST_LOG` is unset (default: info)
//! - `LOG_FORMAT`: `text` or `json` (default: text)
//! - `PASSWORD_HASH_MEMORY_KIB`, `PASSWORD_HASH_ITERATIONS`,
//!   `PASSWORD_HASH_PARALLELISM`: Argon2id cost (default: argon2 defaults)
//!
//! # Example
//!
//! ```no_run
//! use workbench_api::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! println!("Server will listen on {}", config.bind_address());
//! # Ok(())
//! # }
//! ```
use serde::Deserialize;
use std::env;
use workbench_shared::auth::{jwt::DEFAULT_EXPIRATION_HOURS, password::PasswordCost};
use workbench_shared::db::pool::DatabaseConfig as PoolConfig;

/// Minimum JWT secret length
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Longest accepted token lifetime (one year)
pub const MAX_JWT_EXPIRATION_SECONDS: i64 = 365 * 24 * 3600;

/// Complete application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub logging: LoggingConfig,
    pub password: PasswordCost,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    pub request_timeout_seconds: u64,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token lifetime in seconds
    pub expiration_seconds: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

/// Parses `24h`, `90m`, `3600s` or a bare number of seconds
pub fn parse_duration_secs(value: &str) -> anyhow::Result<i64> {
    let value = value.trim();
    let (digits, multiplier) = match value.char_indices().last() {
        Some((i, 'h')) => (&value[..i], 3600),
        Some((i, 'm')) => (&value[..i], 60),
        Some((i, 's')) => (&value[..i], 1),
        _ => (value, 1),
    };

    let amount: i64 = digits
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid duration '{}'", value))?;
    if amount <= 0 {
        anyhow::bail!("duration must be positive, got '{}'", value);
    }
    amount
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("duration '{}' is out of range", value))
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `APP_JWT_SECRET` is missing or shorter than 32 characters
    /// - A variable has a value of the wrong type
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => PoolConfig::compose_url(
                &var("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                var("DB_PORT").map(|p| p.parse::<u16>()).transpose()?.unwrap_or(5432),
                &var("DB_USER").unwrap_or_else(|| "postgres".to_string()),
                &var("DB_PASSWORD").unwrap_or_else(|| "postgres".to_string()),
                &var("DB_NAME").unwrap_or_else(|| "workbench".to_string()),
                &var("DB_SSL_MODE").unwrap_or_else(|| "disable".to_string()),
            ),
        };

        let cors_origins: Option<Vec<String>> = var("CORS_ALLOWED_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect()
        });

        let expiration_seconds = var("APP_JWT_EXPIRATION")
            .map(|v| parse_duration_secs(&v))
            .transpose()?;

        let default_cost = PasswordCost::default();

        let config = config::Config::builder()
            .set_default("api.host", "0.0.0.0")?
            .set_default("api.port", 8080)?
            .set_default("api.cors_origins", vec!["*"])?
            .set_default("api.request_timeout_seconds", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.run_migrations", true)?
            .set_default("jwt.expiration_seconds", DEFAULT_EXPIRATION_HOURS * 3600)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?
            .set_default("password.memory_kib", default_cost.memory_kib)?
            .set_default("password.iterations", default_cost.iterations)?
            .set_default("password.parallelism", default_cost.parallelism)?
            .set_override("database.url", database_url)?
            .set_override_option("api.host", var("API_HOST"))?
            .set_override_option("api.port", var("APP_PORT"))?
            .set_override_option("api.cors_origins", cors_origins)?
            .set_override_option("api.request_timeout_seconds", var("REQUEST_TIMEOUT_SECONDS"))?
            .set_override_option("database.max_connections", var("DATABASE_MAX_CONNECTIONS"))?
            .set_override_option("database.run_migrations", var("RUN_MIGRATIONS"))?
            .set_override_option("jwt.secret", var("APP_JWT_SECRET"))?
            .set_override_option("jwt.expiration_seconds", expiration_seconds)?
            .set_override_option("logging.level", var("LOG_LEVEL"))?
            .set_override_option("logging.format", var("LOG_FORMAT").map(|f| f.to_lowercase()))?
            .set_override_option("password.memory_kib", var("PASSWORD_HASH_MEMORY_KIB"))?
            .set_override_option("password.iterations", var("PASSWORD_HASH_ITERATIONS"))?
            .set_override_option("password.parallelism", var("PASSWORD_HASH_PARALLELISM"))?
            .build()?;

        if config.get_string("jwt.secret").is_err() {
            anyhow::bail!("APP_JWT_SECRET environment variable is required");
        }

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-field checks the deserializer cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            anyhow::bail!(
                "APP_JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }
        if !(1..=MAX_JWT_EXPIRATION_SECONDS).contains(&self.jwt.expiration_seconds) {
            anyhow::bail!(
                "APP_JWT_EXPIRATION must be between 1 second and {} seconds",
                MAX_JWT_EXPIRATION_SECONDS
            );
        }
        if self.api.request_timeout_seconds == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECONDS must be greater than 0");
        }
        Ok(())
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Pool settings for [`workbench_shared::db::pool::create_pool`]
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.database.max_connections,
            ..PoolConfig::from_url(&self.database.url)
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|o| o == "*")
    }
}
