use std::env;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use crate::auth::provider::DEFAULT_BASE_URL;
use crate::auth::session::DEFAULT_SESSION_TTL_HOURS;
use crate::services::event_service::ReadFailurePolicy;
use crate::services::validation::EndBeforeStart;
use crate::utils::locale::Locale;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub store_backend: StoreBackend,
    pub identity_base_url: String,
    pub identity_api_key: String,
    pub locale: Locale,
    pub read_failure: ReadFailurePolicy,
    pub end_before_start: EndBeforeStart,
    pub cors_allowed_origins: String,
    pub production: bool,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Bad values fall back to the
    /// default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host: IpAddr = parse_or(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port: u16 = parse_or(&lookup, "PORT", DEFAULT_PORT);

        let identity_api_key = lookup("IDENTITY_API_KEY").unwrap_or_default();
        if identity_api_key.is_empty() {
            tracing::warn!("Config: IDENTITY_API_KEY is not set, sign-in will be rejected by the provider");
        }

        let mut session_ttl_hours = parse_or(&lookup, "SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS);
        if session_ttl_hours <= 0 {
            tracing::warn!("Config: SESSION_TTL_HOURS must be positive, using default");
            session_ttl_hours = DEFAULT_SESSION_TTL_HOURS;
        }

        Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost/my_calendar".to_string()),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            bind_addr: SocketAddr::new(host, port),
            store_backend: parse_or(&lookup, "STORE_BACKEND", StoreBackend::Postgres),
            identity_base_url: lookup("IDENTITY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            identity_api_key,
            locale: parse_or(&lookup, "APP_LOCALE", Locale::default()),
            read_failure: parse_or(&lookup, "READ_FAILURE_POLICY", ReadFailurePolicy::default()),
            end_before_start: parse_or(&lookup, "END_BEFORE_START", EndBeforeStart::default()),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| cors::DEFAULT_ALLOWED_ORIGINS.to_string()),
            production: lookup("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
            session_ttl_hours,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Config: invalid {} '{}': {}, using default", key, raw, e);
            default
        }),
    }
}
