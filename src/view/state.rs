//! In-memory state of the recipe table.
//!
//! `TableState` is plain data plus the transition rules. It never performs
//! I/O: a load is started with [`TableState::begin_listing`] or
//! [`TableState::begin_search`], which hand out a [`Ticket`], and finished
//! with [`TableState::complete`]. Only the completion of the most recently
//! issued ticket is applied, so a slow response for an old page can never
//! overwrite the rows of a newer one.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::client::{FilterField, PageSize, Recipe, RecipeFilters, RecipeList, RecipeRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// Nothing requested yet
    Idle,
    /// The latest request is in flight
    Loading,
    /// The latest request succeeded
    Loaded,
    /// The latest request failed; rows from earlier loads are still shown
    Failed(String),
}

/// Which endpoint produced the rows currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOrigin {
    /// One page of the plain listing
    Listing { page: u32 },
    Search,
}

/// Handle for one issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    request: RecipeRequest,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn request(&self) -> &RecipeRequest {
        &self.request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request was issued after this one; the result was dropped
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    current_page: u32,
    page_size: PageSize,
    filters: RecipeFilters,
    recipes: Vec<Recipe>,
    total: Option<u64>,
    origin: Option<ResultOrigin>,
    status: LoadStatus,
    selected: Option<Recipe>,
    issued: u64,
    loaded_at: Option<DateTime<Utc>>,
}

impl TableState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            current_page: 1,
            page_size,
            filters: RecipeFilters::default(),
            recipes: Vec::new(),
            total: None,
            origin: None,
            status: LoadStatus::Idle,
            selected: None,
            issued: 0,
            loaded_at: None,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn filters(&self) -> &RecipeFilters {
        &self.filters
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn origin(&self) -> Option<ResultOrigin> {
        self.origin
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn selected(&self) -> Option<&Recipe> {
        self.selected.as_ref()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Number of pages in the catalog, once the listing endpoint has reported a total.
    pub fn total_pages(&self) -> Option<u32> {
        let limit = u64::from(self.page_size.get());
        self.total
            .map(|total| u32::try_from(total.div_ceil(limit)).unwrap_or(u32::MAX))
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.total_pages()
            .is_some_and(|pages| self.current_page >= pages)
    }

    pub fn listing_request(&self) -> RecipeRequest {
        RecipeRequest::Listing {
            page: self.current_page,
            limit: self.page_size.get(),
        }
    }

    pub fn begin_listing(&mut self) -> Ticket {
        let request = self.listing_request();
        self.begin(request)
    }

    pub fn begin_search(&mut self) -> Ticket {
        let request = RecipeRequest::Search(self.filters.clone());
        self.begin(request)
    }

    fn begin(&mut self, request: RecipeRequest) -> Ticket {
        self.issued += 1;
        self.status = LoadStatus::Loading;
        Ticket {
            seq: self.issued,
            request,
        }
    }

    /// Apply the outcome of `ticket` if it is still the latest request.
    pub fn complete(&mut self, ticket: &Ticket, outcome: Result<RecipeList>) -> Completion {
        if ticket.seq != self.issued {
            return Completion::Stale;
        }

        match outcome {
            Ok(list) => {
                if list.total.is_some() {
                    self.total = list.total;
                }
                self.recipes = list.data;
                self.origin = Some(match &ticket.request {
                    RecipeRequest::Listing { page, .. } => ResultOrigin::Listing { page: *page },
                    RecipeRequest::Search(_) => ResultOrigin::Search,
                });
                self.status = LoadStatus::Loaded;
                self.loaded_at = Some(Utc::now());
            }
            Err(e) => {
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
        Completion::Applied
    }

    /// Advance one page. Returns whether the page changed.
    pub fn next_page(&mut self) -> bool {
        if self.is_last_page() {
            return false;
        }
        self.current_page = self.current_page.saturating_add(1);
        true
    }

    /// Go back one page, never below page 1. Returns whether the page changed.
    pub fn previous_page(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.current_page -= 1;
        true
    }

    pub fn go_to_page(&mut self, page: u32) -> Result<bool> {
        if page == 0 {
            anyhow::bail!("Page numbers start at 1");
        }
        if let Some(pages) = self.total_pages() {
            if page > pages.max(1) {
                anyhow::bail!("Page {} is past the last page ({})", page, pages.max(1));
            }
        }
        let changed = page != self.current_page;
        self.current_page = page;
        Ok(changed)
    }

    /// Returns whether the page size changed.
    pub fn set_page_size(&mut self, page_size: PageSize) -> bool {
        let changed = page_size != self.page_size;
        self.page_size = page_size;
        changed
    }

    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) {
        self.filters.set(field, value);
    }

    pub fn clear_filters(&mut self) {
        self.filters = RecipeFilters::default();
    }

    /// Select the recipe shown in the given 1-based row.
    pub fn select_row(&mut self, row: usize) -> Result<&Recipe> {
        let recipe = row
            .checked_sub(1)
            .and_then(|index| self.recipes.get(index))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No row {} in the table ({} rows shown)", row, self.recipes.len()))?;
        Ok(&*self.selected.insert(recipe))
    }

    /// Select the displayed recipe with the given id.
    pub fn select_id(&mut self, id: i64) -> Result<&Recipe> {
        let recipe = self
            .recipes
            .iter()
            .find(|recipe| recipe.id == Some(id))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Recipe {} is not in the displayed rows", id))?;
        Ok(&*self.selected.insert(recipe))
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }
}
