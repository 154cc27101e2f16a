//! Process configuration.
//!
//! Everything is read from environment variables once at startup and then
//! passed down explicitly; nothing below `main` reads the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `RECIPE_API_BASE_URL` | `http://localhost:8000` |
//! | `RECIPE_PAGE_SIZE` | `15` |
//! | `BIND_ADDR` | `127.0.0.1:3001` |

use std::net::SocketAddr;

use anyhow::Result;

use crate::client::PageSize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserConfig {
    /// Base address of the recipe backend, without a trailing slash
    pub api_base_url: String,
    /// Page size the table starts with
    pub page_size: PageSize,
    /// Address the SSE server listens on
    pub bind_addr: SocketAddr,
}

impl BrowserConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("RECIPE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        reqwest::Url::parse(&api_base_url)
            .map_err(|e| anyhow::anyhow!("RECIPE_API_BASE_URL is not a valid URL ({}): {}", api_base_url, e))?;

        let page_size = match lookup("RECIPE_PAGE_SIZE") {
            Some(raw) => {
                let value = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| anyhow::anyhow!("RECIPE_PAGE_SIZE must be a number ({}): {}", raw, e))?;
                PageSize::try_from(value)?
            }
            None => PageSize::default(),
        };

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("BIND_ADDR is not a socket address ({}): {}", bind_raw, e))?;

        Ok(Self {
            api_base_url,
            page_size,
            bind_addr,
        })
    }
}
