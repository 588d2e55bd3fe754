/// Configuration for Ping Service
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Redis,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StorageBackend::Redis),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "PING_STORAGE must be 'redis' or 'memory', got '{}'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub redis_url: String,
    pub storage: StorageBackend,
    pub rate_limit: RateLimitConfig,
    /// Simulated work inside the serialized section of `/ping`
    pub ping_delay: Duration,
    pub top_users: usize,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 2,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub ttl: Duration,
    pub cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(86_400),
            cookie_name: "ping_session".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            storage: StorageBackend::Redis,
            rate_limit: RateLimitConfig::default(),
            ping_delay: Duration::from_millis(5_000),
            top_users: 10,
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Config::default();

        let max_requests: u32 =
            parse_env_or_default("PING_RATE_LIMIT_MAX", defaults.rate_limit.max_requests)?;
        let window_secs: u64 = parse_env_or_default("PING_RATE_LIMIT_WINDOW_SECS", 60)?;
        if window_secs == 0 {
            return Err("PING_RATE_LIMIT_WINDOW_SECS must be positive".to_string());
        }
        let session_ttl_secs: u64 = parse_env_or_default("SESSION_TTL_SECS", 86_400)?;
        if session_ttl_secs == 0 {
            return Err("SESSION_TTL_SECS must be positive".to_string());
        }

        Ok(Config {
            host: std::env::var("PING_SERVICE_HOST").unwrap_or(defaults.host),
            port: parse_env_or_default("PING_SERVICE_PORT", defaults.port)?,
            redis_url: std::env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            storage: match std::env::var("PING_STORAGE") {
                Ok(value) => value.parse()?,
                Err(_) => defaults.storage,
            },
            rate_limit: RateLimitConfig {
                max_requests,
                window: Duration::from_secs(window_secs),
            },
            ping_delay: Duration::from_millis(parse_env_or_default("PING_DELAY_MS", 5_000)?),
            top_users: parse_env_or_default("PING_TOP_USERS", defaults.top_users)?,
            session: SessionConfig {
                ttl: Duration::from_secs(session_ttl_secs),
                cookie_name: std::env::var("SESSION_COOKIE_NAME")
                    .ok()
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or(defaults.session.cookie_name),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}
