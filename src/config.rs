use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
}

/// Admin account created at startup when ADMIN_EMAIL and ADMIN_PASSWORD are set.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    pub exchange_secret: String,
    pub frontend_url: String,
    pub public_rps: u32,
    pub api_rps: u32,
    pub company_name: String,
    /// `None` when SMTP_HOST, SMTP_USER or SMTP_PASSWORD is unset; email is then disabled.
    pub smtp: Option<SmtpConfig>,
    pub bootstrap_admin: Option<AdminSeed>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let jwt_expires_in = match env::var("JWT_EXPIRES_IN") {
            Ok(raw) => parse_duration(&raw).ok_or_else(|| {
                Error::Config(format!("Invalid value for JWT_EXPIRES_IN: {}", raw))
            })?,
            Err(_) => Duration::from_secs(7 * 24 * 60 * 60),
        };

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 20)?,
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_expires_in,
            exchange_secret: get_env("EXCHANGE_SECRET")?,
            frontend_url: get_env_or("FRONTEND_URL", "http://localhost:3000"),
            public_rps: get_env_parse_or("PUBLIC_RPS", 50)?,
            api_rps: get_env_parse_or("API_RPS", 100)?,
            company_name: get_env_or("COMPANY_NAME", "Our Company"),
            smtp: smtp_from_env()?,
            bootstrap_admin: admin_seed_from_env(),
        })
    }
}

fn smtp_from_env() -> Result<Option<SmtpConfig>> {
    let (Ok(host), Ok(user), Ok(password)) = (
        env::var("SMTP_HOST"),
        env::var("SMTP_USER"),
        env::var("SMTP_PASSWORD"),
    ) else {
        return Ok(None);
    };
    let from = env::var("EMAIL_FROM").unwrap_or_else(|_| user.clone());
    Ok(Some(SmtpConfig {
        host,
        port: get_env_parse_or("SMTP_PORT", 587)?,
        user,
        password,
        from,
    }))
}

fn admin_seed_from_env() -> Option<AdminSeed> {
    let (Ok(email), Ok(password)) = (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) else {
        return None;
    };
    Some(AdminSeed {
        email,
        password,
        full_name: get_env_or("ADMIN_NAME", "Administrator"),
    })
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

/// Parses `7d`, `12h`, `30m`, `45s` or a bare number of seconds.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], c),
        _ => (raw, 's'),
    };
    let value: u64 = digits.parse().ok()?;
    let secs = match unit {
        'd' => value.checked_mul(86_400)?,
        'h' => value.checked_mul(3_600)?,
        'm' => value.checked_mul(60)?,
        's' => value,
        _ => return None,
    };
    Some(Duration::from_secs(secs))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
