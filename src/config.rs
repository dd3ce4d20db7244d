//! Environment-driven configuration.

use std::env;

use anyhow::Context;

pub const DEFAULT_PORT: u16 = 4000;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// When false the startup connectivity probe is skipped (set via
    /// `SKIP_DB_CHECK`, used by the test composition). In the default
    /// composition an unreachable store at startup is fatal.
    pub verify_store: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let verify_store = !env::var("SKIP_DB_CHECK")
            .map(|v| truthy(&v))
            .unwrap_or(false);

        Ok(Config {
            database_url,
            port,
            verify_store,
        })
    }
}

fn truthy(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
