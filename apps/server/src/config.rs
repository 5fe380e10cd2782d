use anyhow::Context;
use std::{net::SocketAddr, time::Duration};

use sharebook_core::RegistryConfig;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub registry: RegistryConfig,
}

impl Config {
    /// Reads `SHAREBOOK_*` variables, after loading `.env` when present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = lookup("SHAREBOOK_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid SHAREBOOK_LISTEN_ADDR")?;
        let db_path = lookup("SHAREBOOK_DB_PATH").unwrap_or_else(|| "./db/sharebook.db".into());
        let cors_allow = lookup("SHAREBOOK_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = lookup("SHAREBOOK_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .context("Invalid SHAREBOOK_REQUEST_TIMEOUT_MS")?;
        let registry = RegistryConfig::new(
            lookup("SHAREBOOK_DEFAULT_CURRENCY").as_deref(),
            lookup("SHAREBOOK_DEFAULT_COUNTRY").as_deref(),
        )?;

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            registry,
        })
    }
}
