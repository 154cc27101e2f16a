use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use crate::client::types::*;

/// A request the recipe table can issue.
///
/// Both the HTTP client and test doubles use [`RecipeRequest::path_and_query`],
/// so the wire format is defined in exactly one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeRequest {
    /// Plain paged listing, `GET /api/recipes?page=&limit=`
    Listing { page: u32, limit: u32 },
    /// Filtered search, `GET /api/recipes/search?...`
    Search(RecipeFilters),
}

impl RecipeRequest {
    pub fn path_and_query(&self) -> String {
        match self {
            RecipeRequest::Listing { page, limit } => {
                format!("/api/recipes?page={}&limit={}", page, limit)
            }
            RecipeRequest::Search(filters) => {
                let params: Vec<String> = filters
                    .active()
                    .into_iter()
                    .map(|(field, value)| format!("{}={}", field.as_str(), urlencoding::encode(value)))
                    .collect();

                let mut path = "/api/recipes/search".to_string();
                if !params.is_empty() {
                    path.push('?');
                    path.push_str(&params.join("&"));
                }
                path
            }
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, RecipeRequest::Search(_))
    }
}

/// Source of recipe lists, enabling mockability in tests.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Fetch one page of the unfiltered catalog.
    async fn fetch_recipes(&self, page: u32, limit: u32) -> Result<RecipeList>;

    /// Fetch every recipe matching the active filters (not paged).
    async fn search_recipes(&self, filters: &RecipeFilters) -> Result<RecipeList>;
}

pub struct RecipeApiClient {
    base_url: String,
    client: Client,
}

impl RecipeApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, request: &RecipeRequest) -> String {
        format!("{}{}", self.base_url, request.path_and_query())
    }

    async fn get_list(&self, request: &RecipeRequest) -> Result<RecipeList> {
        let url = self.url_for(request);
        tracing::debug!("Requesting recipes: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error requesting {}: {}", url, e);
                anyhow::anyhow!("Failed to connect to recipe API at {}: {}", self.base_url, e)
            })?;

        let status = response.status();
        tracing::debug!("Recipe response status: {}", status);

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::error!("Recipe request failed with status {}: {}", status, error_body);

            match status.as_u16() {
                404 => anyhow::bail!("Recipe endpoint not found. Check your base URL: {}", self.base_url),
                422 => anyhow::bail!("Recipe API rejected the query parameters: {}", error_body),
                500..=599 => anyhow::bail!("Recipe API server error ({}): {}", status, error_body),
                _ => anyhow::bail!("Recipe request failed with status {}: {}", status, error_body),
            }
        }

        let list: RecipeList = response.json().await
            .map_err(|e| {
                tracing::error!("Failed to parse recipe response: {}", e);
                anyhow::anyhow!("Invalid response format from recipe API: {}", e)
            })?;

        tracing::debug!("Received {} recipes", list.len());
        Ok(list)
    }
}

#[async_trait]
impl RecipeSource for RecipeApiClient {
    async fn fetch_recipes(&self, page: u32, limit: u32) -> Result<RecipeList> {
        self.get_list(&RecipeRequest::Listing { page, limit }).await
    }

    async fn search_recipes(&self, filters: &RecipeFilters) -> Result<RecipeList> {
        self.get_list(&RecipeRequest::Search(filters.clone())).await
    }
}
