//! # Recipe API Client
//!
//! This module provides the HTTP client for the recipe catalog backend. It
//! issues the two read-only requests the recipe table needs: a paged listing
//! and a filtered search.
//!
//! ## Modules
//!
//! - [`client`] - The [`RecipeSource`] seam, the request builder and the reqwest client
//! - [`mock`] - Scripted [`RecipeSource`] used by tests
//! - [`types`] - Type definitions for API requests and responses
//!
//! ## Quick Start
//!
//! ```no_run
//! use recipe_browser::client::{RecipeApiClient, RecipeFilters, RecipeSource};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = RecipeApiClient::new("http://localhost:8000".to_string());
//!
//! // First page, fifteen per page
//! let page = client.fetch_recipes(1, 15).await?;
//! println!("Loaded {} recipes", page.len());
//!
//! // Filtered search
//! let mut filters = RecipeFilters::default();
//! filters.cuisine = "Italian".to_string();
//! let found = client.search_recipes(&filters).await?;
//! println!("Found {} Italian recipes", found.len());
//! # Ok(())
//! # }
//! ```

#[allow(clippy::module_inception)]
pub mod client;
pub mod mock;
pub mod types;

pub use client::{RecipeApiClient, RecipeRequest, RecipeSource};
pub use mock::{MockRecipeSource, MockResponse};
pub use types::*;
