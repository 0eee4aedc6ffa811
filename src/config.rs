use std::env;
use std::time::Duration;

/// Where records are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    /// Parse from an environment value
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(format!(
                "Invalid STORAGE_BACKEND: {}. Must be one of: [\"postgres\", \"memory\"]",
                s
            )),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub test_before_acquire: bool,
    pub migrations_path: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub database: Option<DatabaseConfig>,
    pub log_level: String,
    pub http_port: u16,
    pub environment: String,
    pub cors_allowed_origin: Option<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

impl DatabaseConfig {
    /// Create database config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable is required")?;

        let max_connections = env_or("DATABASE_MAX_CONNECTIONS", 10u32);
        let acquire_timeout_secs = env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 30u64);
        let idle_timeout_secs = env_or("DATABASE_IDLE_TIMEOUT_SECS", 600u64); // 10 minutes
        let max_lifetime_secs = env_or("DATABASE_MAX_LIFETIME_SECS", 1800u64); // 30 minutes
        let test_before_acquire = env_or("DATABASE_TEST_BEFORE_ACQUIRE", true);
        let migrations_path =
            env::var("MIGRATIONS_PATH").unwrap_or_else(|_| "./migrations".to_string());

        let config = Self {
            url,
            max_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
            test_before_acquire,
            migrations_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pool cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.max_connections == 0 {
            return Err("DATABASE_MAX_CONNECTIONS must be greater than 0".to_string());
        }

        if self.acquire_timeout_secs == 0 {
            return Err("DATABASE_ACQUIRE_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Get idle timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Get max lifetime as Duration
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/college_events".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            test_before_acquire: true,
            migrations_path: "./migrations".to_string(),
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let storage = StorageBackend::parse(
            &env::var("STORAGE_BACKEND").unwrap_or_else(|_| "postgres".to_string()),
        )?;

        let database = match storage {
            StorageBackend::Postgres => Some(DatabaseConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let http_port = env_or("HTTP_PORT", 3000u16);
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|origin| !origin.trim().is_empty());

        let config = Self {
            storage,
            database,
            log_level: log_level.to_lowercase(),
            http_port,
            environment: environment.to_lowercase(),
            cors_allowed_origin,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), String> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&self.environment.as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                self.environment, valid_environments
            ));
        }

        if self.storage == StorageBackend::Memory && self.is_production() {
            return Err("STORAGE_BACKEND=memory is not allowed in production".to_string());
        }

        if self.storage == StorageBackend::Postgres && self.database.is_none() {
            return Err("Postgres storage requires a database configuration".to_string());
        }

        Ok(())
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Postgres,
            database: Some(DatabaseConfig::default()),
            log_level: "info".to_string(),
            http_port: 3000,
            environment: "development".to_string(),
            cors_allowed_origin: None,
        }
    }
}
