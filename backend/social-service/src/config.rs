/// Configuration management for Social Service
///
/// Values come from environment variables (optionally seeded from `.env`),
/// with development defaults for everything except production secrets.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// JWT secret used when `JWT_SECRET` is unset outside production.
pub const DEV_JWT_SECRET: &str = "trellis-dev-secret-change-me";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub storage: StorageBackend,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

/// Which repository implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "SOCIAL_STORAGE must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expires_in_minutes: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expires_in_minutes", &self.jwt_expires_in_minutes)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let is_production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("SOCIAL_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("SOCIAL_SERVICE_PORT", 8080)?,
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if is_production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if is_production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/trellis".to_string()),
                max_connections: parse_env_or_default("DATABASE_MAX_CONNECTIONS", 10)?,
                run_migrations: parse_env_or_default("RUN_MIGRATIONS", true)?,
            },
            storage: match std::env::var("SOCIAL_STORAGE") {
                Ok(value) => value.parse()?,
                Err(_) => StorageBackend::Postgres,
            },
            auth: {
                let jwt_secret = match std::env::var("JWT_SECRET") {
                    Ok(value) if !value.trim().is_empty() => value,
                    _ if is_production => {
                        return Err("JWT_SECRET must be set in production".to_string())
                    }
                    _ => DEV_JWT_SECRET.to_string(),
                };

                if is_production && jwt_secret == DEV_JWT_SECRET {
                    return Err("JWT_SECRET cannot use the development default in production".to_string());
                }

                let jwt_expires_in_minutes: i64 =
                    parse_env_or_default("JWT_EXPIRES_IN_MINUTES", 60)?;
                if jwt_expires_in_minutes <= 0 {
                    return Err("JWT_EXPIRES_IN_MINUTES must be positive".to_string());
                }

                AuthConfig {
                    jwt_secret,
                    jwt_expires_in_minutes,
                }
            },
            uploads: UploadConfig {
                dir: std::env::var("UPLOADS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./uploads")),
                max_bytes: parse_env_or_default("UPLOAD_MAX_BYTES", 10 * 1024 * 1024)?,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
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

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "APP_ENV",
        "SOCIAL_SERVICE_HOST",
        "SOCIAL_SERVICE_PORT",
        "CORS_ALLOWED_ORIGINS",
        "DATABASE_URL",
        "DATABASE_MAX_CONNECTIONS",
        "RUN_MIGRATIONS",
        "SOCIAL_STORAGE",
        "JWT_SECRET",
        "JWT_EXPIRES_IN_MINUTES",
        "UPLOADS_DIR",
        "UPLOAD_MAX_BYTES",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database.max_connections, 10);
        assert!(config.database.run_migrations);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.auth.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.auth.jwt_expires_in_minutes, 60);
        assert_eq!(config.uploads.max_bytes, 10 * 1024 * 1024);
    }

    #[test]
    #[serial]
    fn test_invalid_number_is_reported() {
        clear_env();
        std::env::set_var("SOCIAL_SERVICE_PORT", "eighty");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("SOCIAL_SERVICE_PORT"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_memory_storage() {
        clear_env();
        std::env::set_var("SOCIAL_STORAGE", "Memory");
        assert_eq!(Config::from_env().unwrap().storage, StorageBackend::Memory);
        std::env::set_var("SOCIAL_STORAGE", "sqlite");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_requires_real_secret() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://trellis.dev");
        assert!(Config::from_env().is_err());

        std::env::set_var("JWT_SECRET", DEV_JWT_SECRET);
        assert!(Config::from_env().is_err());

        std::env::set_var("JWT_SECRET", "a-real-secret");
        assert!(Config::from_env().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_debug_redacts_secret() {
        let auth = AuthConfig {
            jwt_secret: "super-secret".to_string(),
            jwt_expires_in_minutes: 5,
        };
        assert!(!format!("{:?}", auth).contains("super-secret"));
    }
}
