// src/config.rs

use std::env;

use chrono::{DateTime, TimeZone, Utc};
use dotenvy::dotenv;

/// Default reveal instant: Christmas Eve, midnight UTC.
pub const DEFAULT_REVEAL_DATE: &str = "2024-12-24T00:00:00Z";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When absent the server keeps documents in memory.
    pub database_url: Option<String>,
    pub rust_log: String,
    /// Predictions and scores stay hidden until this instant.
    pub reveal_date: DateTime<Utc>,
    pub port: u16,
    /// Allowed CORS origins; a single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Shared secret expected in the `X-Admin-Key` header on admin routes.
    pub admin_key: Option<String>,
    pub version: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let reveal_date = env::var("REVEAL_DATE")
            .map(|raw| parse_reveal_date(&raw).expect("REVEAL_DATE must be an RFC 3339 timestamp"))
            .unwrap_or_else(|_| default_reveal_date());

        let port = env::var("PORT")
            .map(|raw| raw.parse().expect("PORT must be a valid port number"))
            .unwrap_or(DEFAULT_PORT);

        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let admin_key = env::var("ADMIN_KEY").ok().filter(|key| !key.is_empty());

        Self {
            database_url,
            rust_log,
            reveal_date,
            port,
            cors_origins,
            admin_key,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            rust_log: "info".to_string(),
            reveal_date: default_reveal_date(),
            port: DEFAULT_PORT,
            cors_origins: vec!["*".to_string()],
            admin_key: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Accepts RFC 3339 (`2024-12-24T00:00:00Z`) or a naive timestamp, read as UTC.
pub fn parse_reveal_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn default_reveal_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 24, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
