/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 127.0.0.1)
/// - `API_PORT`: Port to bind to (default: 3000)
/// - `API_PRODUCTION`: Enables HSTS and `Secure` cookies (default: false)
/// - `CORS_ORIGINS`: Comma separated allowed origins, `*` for any (default: *)
/// - `DATABASE_URL`: PostgreSQL connection string; unset selects the in-memory store
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `SESSION_TTL_SECONDS`: Absolute session lifetime, at most ten years (default: 3600)
/// - `SESSION_CAPACITY`: Maximum live sessions (default: 10000)
/// - `SESSION_COOKIE_NAME`: Session cookie name (default: hivehelper.sid)
/// - `SESSION_PURGE_INTERVAL_SECONDS`: Expired session sweep interval (default: 86400)
/// - `PASSWORD_MEMORY_KIB`, `PASSWORD_ITERATIONS`, `PASSWORD_PARALLELISM`:
///   Argon2id cost (defaults: 65536, 3, 4)
///
/// # Example
///
/// ```no_run
/// use hivehelper_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use hivehelper_shared::auth::{
    password::PasswordParams,
    session::{SessionConfig, MAX_SESSION_TTL_SECONDS},
};
use serde::{Deserialize, Serialize};
use std::{env, str::FromStr};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration; None runs on the in-memory store
    pub database: Option<DatabaseConfig>,

    /// Session store and cookie settings
    pub session: SessionConfig,

    /// Argon2id cost parameters
    pub password: PasswordParams,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Production mode (HTTPS assumed)
    pub production: bool,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            production: false,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    ///
    /// Unset and empty values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_defaults = ApiConfig::default();
        let api = ApiConfig {
            host: get("API_HOST").unwrap_or(api_defaults.host),
            port: parse_or(&get, "API_PORT", api_defaults.port)?,
            production: parse_flag(&get, "API_PRODUCTION")?,
            cors_origins: get("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or(api_defaults.cors_origins),
        };

        let database = match get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 10)?,
            }),
            None => None,
        };

        let session_defaults = SessionConfig::default();
        let session = SessionConfig {
            ttl_seconds: parse_or(&get, "SESSION_TTL_SECONDS", session_defaults.ttl_seconds)?,
            capacity: parse_or(&get, "SESSION_CAPACITY", session_defaults.capacity)?,
            cookie_name: get("SESSION_COOKIE_NAME").unwrap_or(session_defaults.cookie_name),
            secure_cookie: api.production,
            purge_interval_seconds: parse_or(
                &get,
                "SESSION_PURGE_INTERVAL_SECONDS",
                session_defaults.purge_interval_seconds,
            )?,
        };

        let password_defaults = PasswordParams::default();
        let password = PasswordParams {
            memory_kib: parse_or(&get, "PASSWORD_MEMORY_KIB", password_defaults.memory_kib)?,
            iterations: parse_or(&get, "PASSWORD_ITERATIONS", password_defaults.iterations)?,
            parallelism: parse_or(&get, "PASSWORD_PARALLELISM", password_defaults.parallelism)?,
            output_len: password_defaults.output_len,
        };

        if session.ttl_seconds == 0 || session.ttl_seconds > MAX_SESSION_TTL_SECONDS {
            anyhow::bail!(
                "SESSION_TTL_SECONDS must be between 1 and {MAX_SESSION_TTL_SECONDS}"
            );
        }

        Ok(Self {
            api,
            database,
            session,
            password,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value:?}")),
        None => Ok(default),
    }
}

fn parse_flag<G>(get: &G, key: &str) -> anyhow::Result<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        None | Some("0") | Some("false") | Some("no") => Ok(false),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some(other) => anyhow::bail!("{key} must be true or false, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(!config.api.production);
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert!(config.database.is_none());
        assert_eq!(config.session.ttl_seconds, 3600);
        assert_eq!(config.session.cookie_name, "hivehelper.sid");
        assert!(!config.session.secure_cookie);
        assert_eq!(config.password, PasswordParams::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("API_PORT", "8080"),
            ("API_PRODUCTION", "true"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("DATABASE_URL", "postgresql://localhost/hivehelper"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("SESSION_TTL_SECONDS", "60"),
            ("PASSWORD_ITERATIONS", "2"),
        ]))
        .unwrap();

        assert_eq!(config.api.port, 8080);
        assert!(config.api.production);
        assert!(config.session.secure_cookie);
        assert_eq!(config.api.cors_origins.len(), 2);
        assert_eq!(config.api.cors_origins[1], "https://b.example");

        let database = config.database.unwrap();
        assert_eq!(database.url, "postgresql://localhost/hivehelper");
        assert_eq!(database.max_connections, 4);

        assert_eq!(config.session.ttl_seconds, 60);
        assert_eq!(config.password.iterations, 2);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_lookup(lookup(&[("API_PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup(&[("API_PRODUCTION", "maybe")])).is_err());
        assert!(Config::from_lookup(lookup(&[("SESSION_TTL_SECONDS", "0")])).is_err());
    }

    #[test]
    fn test_session_ttl_upper_bound() {
        let max = MAX_SESSION_TTL_SECONDS.to_string();
        let config = Config::from_lookup(lookup(&[("SESSION_TTL_SECONDS", max.as_str())])).unwrap();
        assert_eq!(config.session.ttl_seconds, MAX_SESSION_TTL_SECONDS);

        let too_long = (MAX_SESSION_TTL_SECONDS + 1).to_string();
        assert!(Config::from_lookup(lookup(&[("SESSION_TTL_SECONDS", too_long.as_str())])).is_err());
        assert!(
            Config::from_lookup(lookup(&[("SESSION_TTL_SECONDS", "9000000000000000")])).is_err()
        );
    }

    #[test]
    fn test_empty_database_url_means_memory() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "")])).unwrap();
        assert!(config.database.is_none());
    }
}
