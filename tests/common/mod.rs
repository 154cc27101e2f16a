#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use recipe_browser::client::{MockRecipeSource, PageSize, Recipe, RecipeList, RecipeRequest, RecipeSource};
use recipe_browser::view::TableState;
use recipe_browser::RecipeTable;

/// Upper bound for any wait on background work in these tests.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestEnvironment {
    pub source: Arc<MockRecipeSource>,
    pub table: Arc<RecipeTable>,
}

impl TestEnvironment {
    pub fn new(source: MockRecipeSource) -> Self {
        Self::with_page_size(source, PageSize::Fifteen)
    }

    pub fn with_page_size(source: MockRecipeSource, page_size: PageSize) -> Self {
        let source = Arc::new(source);
        let dyn_source: Arc<dyn RecipeSource> = source.clone();
        Self {
            table: Arc::new(RecipeTable::new(dyn_source, page_size)),
            source,
        }
    }

    /// Wait until the mock has seen `count` requests.
    pub async fn wait_for_requests(&self, count: usize) {
        let waited = tokio::time::timeout(WAIT_TIMEOUT, async {
            while self.source.requests().len() < count {
                tokio::task::yield_now().await;
            }
        })
        .await;
        assert!(
            waited.is_ok(),
            "Timed out waiting for {} requests, saw {:?}",
            count,
            self.source.request_paths()
        );
    }

    /// Wait until the table state satisfies `done`.
    pub async fn wait_until<F>(&self, done: F) -> TableState
    where
        F: Fn(&TableState) -> bool,
    {
        let waited = tokio::time::timeout(WAIT_TIMEOUT, async {
            loop {
                let state = self.table.snapshot().await;
                if done(&state) {
                    return state;
                }
                tokio::task::yield_now().await;
            }
        })
        .await;
        match waited {
            Ok(state) => state,
            Err(_) => panic!("Timed out waiting for table state: {:?}", self.table.snapshot().await),
        }
    }
}

pub fn listing(page: u32, limit: u32) -> RecipeRequest {
    RecipeRequest::Listing { page, limit }
}

pub fn recipe(id: i64, title: &str) -> Recipe {
    Recipe {
        id: Some(id),
        title: Some(title.to_string()),
        ..Default::default()
    }
}

/// `count` recipes with ids starting at `first_id`.
pub fn page_of(first_id: i64, count: usize, total: u64) -> RecipeList {
    RecipeList {
        data: (0..count as i64)
            .map(|i| recipe(first_id + i, &format!("Recipe {}", first_id + i)))
            .collect(),
        page: None,
        limit: None,
        total: Some(total),
    }
}

/// Live backend base URL, only when `RECIPE_API_LIVE=1`.
pub fn live_base_url() -> Option<String> {
    if std::env::var("RECIPE_API_LIVE").ok().as_deref() != Some("1") {
        println!("Skipping live test: set RECIPE_API_LIVE=1 to run against a real backend");
        return None;
    }
    Some(std::env::var("RECIPE_API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()))
}

/// Capture `log` records from dependencies and `tracing` events from the crate.
pub fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_browser=debug".to_string().into()),
        )
        .with_test_writer()
        .try_init();
}
