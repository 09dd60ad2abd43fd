//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

// == Environment ==
/// Deployment environment. Production connects to Redis over TLS with a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

// == Store Backend ==
/// Which store backs the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Cache backend
    pub backend: StoreBackend,
    /// Redis `host:port`
    pub redis_endpoint: String,
    /// Redis password, only sent in production
    pub redis_password: Option<String>,
    /// Prefix applied to every Redis key
    pub redis_instance: String,
    /// Seconds between purges of the in-memory store
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `APP_ENVIRONMENT` - Development, Staging or Production (default: Development)
    /// - `CACHE_BACKEND` - redis or memory (default: redis)
    /// - `REDIS_ENDPOINT` - Redis host:port (default: localhost:6379)
    /// - `REDIS_PASSWORD` - Redis password (default: none)
    /// - `REDIS_INSTANCE` - Key prefix (default: empty)
    /// - `CLEANUP_INTERVAL` - Memory store purge frequency in seconds (default: 60)
    ///
    /// Unparseable numeric values fall back to their defaults; an unknown
    /// environment or backend name is an error.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let environment = match env::var("APP_ENVIRONMENT") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.environment,
        };
        let backend = match env::var("CACHE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.backend,
        };

        Ok(Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            environment,
            backend,
            redis_endpoint: env::var("REDIS_ENDPOINT").unwrap_or(defaults.redis_endpoint),
            redis_password: env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty()),
            redis_instance: env::var("REDIS_INSTANCE").unwrap_or(defaults.redis_instance),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
        })
    }

    // == Redis URL ==
    /// Connection URL for the configured Redis endpoint.
    ///
    /// Production uses TLS (`rediss://`) and authenticates with the password;
    /// other environments connect in plain text to the endpoint as given.
    pub fn redis_url(&self) -> String {
        match self.environment {
            Environment::Production => match &self.redis_password {
                Some(password) => format!("rediss://:{}@{}", password, self.redis_endpoint),
                None => format!("rediss://{}", self.redis_endpoint),
            },
            _ => format!("redis://{}", self.redis_endpoint),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            environment: Environment::Development,
            backend: StoreBackend::Redis,
            redis_endpoint: "localhost:6379".to_string(),
            redis_password: None,
            redis_instance: String::new(),
            cleanup_interval: 60,
        }
    }
}
