use crate::error::{Error, Result};
use crate::policy::lifecycle::TransitionPolicy;
use dotenvy::dotenv;
use std::env;

pub const DEFAULT_MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
/// One year.
const MAX_JWT_TTL_MINUTES: i64 = 525_600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
    pub public_rps: u32,
    pub trust_forwarded_for: bool,
    pub uploads_dir: String,
    pub max_resume_bytes: usize,
    pub transition_policy: TransitionPolicy,
    pub notification_webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub cors_origins: Vec<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let storage = match get_env_or("STORAGE", "postgres").to_ascii_lowercase().as_str() {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(Error::Config(format!(
                    "Invalid value for STORAGE: {} (expected postgres or memory)",
                    other
                )))
            }
        };
        let database_url = match storage {
            StorageBackend::Postgres => Some(get_env("DATABASE_URL")?),
            StorageBackend::Memory => env::var("DATABASE_URL").ok(),
        };
        let transition_policy = get_env_or("APPLICATION_TRANSITIONS", "permissive")
            .parse::<TransitionPolicy>()
            .map_err(|e| Error::Config(format!("Invalid value for APPLICATION_TRANSITIONS: {}", e)))?;
        let jwt_ttl_minutes = check_jwt_ttl(get_env_parse_or("JWT_TTL_MINUTES", 1440)?)?;

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:8080"),
            storage,
            database_url,
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_ttl_minutes,
            public_rps: get_env_parse_or("PUBLIC_RPS", 20)?,
            trust_forwarded_for: get_env_parse_or("TRUST_FORWARDED_FOR", false)?,
            uploads_dir: get_env_or("UPLOADS_DIR", "./uploads"),
            max_resume_bytes: get_env_parse_or("MAX_RESUME_BYTES", DEFAULT_MAX_RESUME_BYTES)?,
            transition_policy,
            notification_webhook_url: env::var("NOTIFICATION_WEBHOOK_URL").ok(),
            webhook_secret: env::var("WEBHOOK_SECRET").ok(),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

fn check_jwt_ttl(minutes: i64) -> Result<i64> {
    if (1..=MAX_JWT_TTL_MINUTES).contains(&minutes) {
        Ok(minutes)
    } else {
        Err(Error::Config(format!(
            "Invalid value for JWT_TTL_MINUTES: {} (expected 1 to {})",
            minutes, MAX_JWT_TTL_MINUTES
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_ttl_must_be_within_a_year() {
        assert_eq!(check_jwt_ttl(1440).unwrap(), 1440);
        assert!(matches!(check_jwt_ttl(0), Err(Error::Config(_))));
        assert!(matches!(check_jwt_ttl(-5), Err(Error::Config(_))));
        assert!(matches!(check_jwt_ttl(i64::MAX), Err(Error::Config(_))));
    }
}
