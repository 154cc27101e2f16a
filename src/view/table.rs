use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;

use crate::client::{FilterField, PageSize, RecipeList, RecipeRequest, RecipeSource};
use crate::view::render;
use crate::view::state::{Completion, LoadStatus, TableState, Ticket};

/// The recipe table: state plus the source it loads from.
///
/// Each method corresponds to one user gesture. Methods that trigger a load
/// return once that load has finished (or been superseded). The state lock is
/// released while the request is in flight, so concurrent gestures may overlap;
/// only the latest one decides what is displayed.
///
/// A load runs on its own task. Dropping the future of a gesture method does
/// not cancel the load, so the table never stays stuck in `Loading`.
pub struct RecipeTable {
    source: Arc<dyn RecipeSource>,
    state: Arc<Mutex<TableState>>,
}

impl RecipeTable {
    pub fn new(source: Arc<dyn RecipeSource>, page_size: PageSize) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(TableState::new(page_size))),
        }
    }

    /// Load the current page unless something has already been requested.
    pub async fn mount(&self) {
        let ticket = {
            let mut state = self.state.lock().await;
            if *state.status() != LoadStatus::Idle {
                return;
            }
            state.begin_listing()
        };
        self.run(ticket).await;
    }

    /// Re-request the current listing page.
    pub async fn reload(&self) {
        let ticket = self.state.lock().await.begin_listing();
        self.run(ticket).await;
    }

    /// Advance one page. Before the first load this mounts the table instead.
    pub async fn next_page(&self) -> bool {
        let (ticket, moved) = {
            let mut state = self.state.lock().await;
            if *state.status() == LoadStatus::Idle {
                (state.begin_listing(), false)
            } else if state.next_page() {
                (state.begin_listing(), true)
            } else {
                return false;
            }
        };
        self.run(ticket).await;
        moved
    }

    /// Go back one page. Before the first load this mounts the table instead.
    pub async fn previous_page(&self) -> bool {
        let (ticket, moved) = {
            let mut state = self.state.lock().await;
            if *state.status() == LoadStatus::Idle {
                (state.begin_listing(), false)
            } else if state.previous_page() {
                (state.begin_listing(), true)
            } else {
                return false;
            }
        };
        self.run(ticket).await;
        moved
    }

    pub async fn go_to_page(&self, page: u32) -> Result<bool> {
        let (ticket, moved) = {
            let mut state = self.state.lock().await;
            let idle = *state.status() == LoadStatus::Idle;
            let moved = state.go_to_page(page)?;
            if !moved && !idle {
                return Ok(false);
            }
            (state.begin_listing(), moved)
        };
        self.run(ticket).await;
        Ok(moved)
    }

    pub async fn set_page_size(&self, page_size: PageSize) -> bool {
        let (ticket, changed) = {
            let mut state = self.state.lock().await;
            let idle = *state.status() == LoadStatus::Idle;
            let changed = state.set_page_size(page_size);
            if !changed && !idle {
                return false;
            }
            (state.begin_listing(), changed)
        };
        self.run(ticket).await;
        changed
    }

    /// Edit one filter field. No request is made until [`RecipeTable::search`].
    pub async fn set_filter(&self, field: FilterField, value: impl Into<String>) {
        self.state.lock().await.set_filter(field, value);
    }

    pub async fn clear_filters(&self) {
        self.state.lock().await.clear_filters();
    }

    /// Replace the displayed rows with the results for the current filters.
    pub async fn search(&self) {
        let ticket = self.state.lock().await.begin_search();
        self.run(ticket).await;
    }

    pub async fn select_row(&self, row: usize) -> Result<()> {
        self.state.lock().await.select_row(row).map(|_| ())
    }

    pub async fn select_recipe(&self, id: i64) -> Result<()> {
        self.state.lock().await.select_id(id).map(|_| ())
    }

    pub async fn close_details(&self) {
        self.state.lock().await.close_details();
    }

    pub async fn render(&self) -> String {
        render::render_view(&*self.state.lock().await)
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> TableState {
        self.state.lock().await.clone()
    }

    async fn run(&self, ticket: Ticket) {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let seq = ticket.seq();

        let handle = tokio::spawn(async move {
            let outcome = fetch(source.as_ref(), ticket.request()).await;
            let mut state = state.lock().await;
            apply(&mut state, &ticket, outcome);
        });

        if let Err(e) = handle.await {
            tracing::error!("Load task for request #{} did not finish: {}", seq, e);
        }
    }
}

async fn fetch(source: &dyn RecipeSource, request: &RecipeRequest) -> Result<RecipeList> {
    match request {
        RecipeRequest::Listing { page, limit } => source.fetch_recipes(*page, *limit).await,
        RecipeRequest::Search(filters) => source.search_recipes(filters).await,
    }
}

fn apply(state: &mut TableState, ticket: &Ticket, outcome: Result<RecipeList>) {
    let failure = outcome.as_ref().err().map(|e| e.to_string());

    match (state.complete(ticket, outcome), failure) {
        (Completion::Applied, None) => {
            tracing::debug!("Applied request #{}: {} rows", ticket.seq(), state.recipes().len());
        }
        (Completion::Applied, Some(e)) => {
            tracing::error!("Failed to load recipes ({}): {}", ticket.request().path_and_query(), e);
        }
        (Completion::Stale, None) => {
            tracing::debug!("Dropped stale response for request #{}", ticket.seq());
        }
        (Completion::Stale, Some(e)) => {
            tracing::debug!("Dropped stale failure for request #{}: {}", ticket.seq(), e);
        }
    }
}
