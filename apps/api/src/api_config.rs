use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use schoolhub_application::DEFAULT_TOKEN_TTL_HOURS;
use schoolhub_core::AppError;
use tracing_subscriber::EnvFilter;

/// Minimum accepted length of the token signing secret.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub api_host: String,
    pub api_port: u16,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let jwt_secret = required_env("JWT_SECRET")?;
        validate_jwt_secret(&jwt_secret)?;

        let token_ttl_hours = match env::var("TOKEN_TTL_HOURS") {
            Ok(value) => parse_token_ttl_hours(&value)?,
            Err(_) => DEFAULT_TOKEN_TTL_HOURS,
        };

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            jwt_secret,
            token_ttl_hours,
            api_host,
            api_port,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn validate_jwt_secret(secret: &str) -> Result<(), AppError> {
    if secret.chars().count() < MIN_JWT_SECRET_LENGTH {
        return Err(AppError::Validation(format!(
            "JWT_SECRET must be at least {MIN_JWT_SECRET_LENGTH} characters"
        )));
    }

    Ok(())
}

fn parse_token_ttl_hours(value: &str) -> Result<i64, AppError> {
    match value.trim().parse::<i64>() {
        Ok(hours) if hours > 0 => Ok(hours),
        _ => Err(AppError::Validation(format!(
            "TOKEN_TTL_HOURS must be a positive integer, got '{value}'"
        ))),
    }
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
