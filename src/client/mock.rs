//! Scripted [`RecipeSource`] for tests.
//!
//! Responses are keyed by the request's path and query string, so a test
//! states exactly which URL it expects the table to ask for. A response can
//! also be held behind a [`Notify`] gate to reproduce out-of-order completion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Notify;

use crate::client::client::{RecipeRequest, RecipeSource};
use crate::client::types::{RecipeFilters, RecipeList};

/// Mock response for testing.
#[derive(Clone)]
pub enum MockResponse {
    /// An already parsed list
    List(RecipeList),
    /// A raw body, parsed the same way the HTTP client parses it
    Json(String),
    /// A failed request
    Error(String),
}

/// Mock recipe source for testing.
pub struct MockRecipeSource {
    responses: HashMap<String, MockResponse>,
    gates: HashMap<String, Arc<Notify>>,
    requests: Mutex<Vec<RecipeRequest>>,
}

impl MockRecipeSource {
    /// Create a new empty mock source.
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            gates: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Add a response for a request.
    pub fn with_response(mut self, request: &RecipeRequest, response: MockResponse) -> Self {
        self.responses.insert(request.path_and_query(), response);
        self
    }

    /// Add a parsed list for a request.
    pub fn with_list(self, request: &RecipeRequest, list: RecipeList) -> Self {
        self.with_response(request, MockResponse::List(list))
    }

    /// Add a raw JSON body for a request.
    pub fn with_json(self, request: &RecipeRequest, body: &str) -> Self {
        self.with_response(request, MockResponse::Json(body.to_string()))
    }

    /// Add a failure for a request.
    pub fn with_error(self, request: &RecipeRequest, error: &str) -> Self {
        self.with_response(request, MockResponse::Error(error.to_string()))
    }

    /// Hold the response for a request until `gate` is notified.
    pub fn with_gate(mut self, request: &RecipeRequest, gate: Arc<Notify>) -> Self {
        self.gates.insert(request.path_and_query(), gate);
        self
    }

    /// Every request received so far, in issue order.
    pub fn requests(&self) -> Vec<RecipeRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Path and query of every request received so far.
    pub fn request_paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(RecipeRequest::path_and_query)
            .collect()
    }

    async fn respond(&self, request: RecipeRequest) -> Result<RecipeList> {
        let key = request.path_and_query();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        if let Some(gate) = self.gates.get(&key) {
            gate.notified().await;
        }

        match self.responses.get(&key) {
            Some(MockResponse::List(list)) => Ok(list.clone()),
            Some(MockResponse::Json(body)) => serde_json::from_str::<RecipeList>(body)
                .map_err(|e| anyhow::anyhow!("Invalid response format from recipe API: {}", e)),
            Some(MockResponse::Error(e)) => Err(anyhow::anyhow!("{}", e)),
            None => Err(anyhow::anyhow!("No mock response for request: {}", key)),
        }
    }
}

impl Default for MockRecipeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeSource for MockRecipeSource {
    async fn fetch_recipes(&self, page: u32, limit: u32) -> Result<RecipeList> {
        self.respond(RecipeRequest::Listing { page, limit }).await
    }

    async fn search_recipes(&self, filters: &RecipeFilters) -> Result<RecipeList> {
        self.respond(RecipeRequest::Search(filters.clone())).await
    }
}
