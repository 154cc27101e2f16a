//! # Recipe Browser Library
//!
//! A browsable, filterable table over a recipe catalog backend, served to
//! assistants and other clients through the Model Context Protocol (MCP).
//!
//! ## Client Module
//!
//! The [`client`] module talks to the recipe backend: a paged listing and a
//! filtered search.
//!
//! ## View Module
//!
//! The [`view`] module holds the table state (page, page size, filters, rows,
//! selection) and renders it as text.
//!
//! ## Server Module
//!
//! The [`server`] module exposes each user gesture on the table as an MCP tool.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use recipe_browser::{BrowserConfig, RecipeApiClient, RecipeTable};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = BrowserConfig::from_env()?;
//! let client = Arc::new(RecipeApiClient::new(config.api_base_url.clone()));
//!
//! let table = RecipeTable::new(client, config.page_size);
//! table.mount().await;
//! println!("{}", table.render().await);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod server;
pub mod view;

pub use client::RecipeApiClient;
pub use config::BrowserConfig;
pub use server::RecipeBrowserServer;
pub use view::RecipeTable;
