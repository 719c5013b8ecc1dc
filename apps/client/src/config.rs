use anyhow::{bail, Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_LIST_LIMIT: u32 = 100;
/// Largest page the backend's list endpoint accepts.
pub const MAX_LIST_LIMIT: u32 = 200;

/// Client configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub list_limit: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let list_limit = match lookup("TUNECV_LIST_LIMIT") {
            Some(raw) => raw
                .parse::<u32>()
                .context("TUNECV_LIST_LIMIT must be a positive integer")?,
            None => DEFAULT_LIST_LIMIT,
        };
        if !(1..=MAX_LIST_LIMIT).contains(&list_limit) {
            bail!("TUNECV_LIST_LIMIT must be between 1 and {MAX_LIST_LIMIT}, got {list_limit}");
        }

        Ok(Config {
            api_url: lookup("TUNECV_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            list_limit,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
