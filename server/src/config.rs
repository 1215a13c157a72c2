use anyhow::{Context, Result};
use std::env;
use uuid::Uuid;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_DB_POOL_SIZE: u32 = 10;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Absolute origin used for image URLs, pagination and short links.
    pub public_base_url: String,
    pub db_pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let db_pool_size = match env::var("DB_POOL_SIZE") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DB_POOL_SIZE is not a number: {}", raw))?,
            Err(_) => DEFAULT_DB_POOL_SIZE,
        };

        Ok(Self {
            database_url,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string()),
            db_pool_size,
        })
    }

    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.public_base_url, path)
    }

    pub fn photo_url(&self, photo_id: Uuid) -> String {
        self.absolute_url(&format!("/api/photos/{}", photo_id))
    }
}
