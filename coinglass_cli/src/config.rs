//! Runtime configuration read from the environment (and `.env`, loaded in `main`).

use anyhow::{bail, Result};

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "COINGLASS_API_KEY";
/// Optional override of the API base URL.
pub const BASE_URL_VAR: &str = "COINGLASS_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let Some(api_key) = read(API_KEY_VAR) else {
            bail!("{} is not set. Export it or add it to a .env file.", API_KEY_VAR);
        };
        Ok(Self {
            api_key,
            base_url: read(BASE_URL_VAR),
        })
    }
}
