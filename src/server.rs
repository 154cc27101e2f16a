use std::sync::Arc;
use std::future::Future;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde_json::json;

use crate::client::{FilterField, PageSize, RecipeSource};
use crate::view::RecipeTable;

// Parameter structs for tools
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GoToPageParams {
    pub page: u32,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SetPageSizeParams {
    /// One of 15, 25 or 50
    pub limit: u32,
}

#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct SetFiltersParams {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub min_rating: Option<String>,
    #[serde(default)]
    pub max_total_time: Option<String>,
    /// Comparison such as "<=400" or ">=200"
    #[serde(default)]
    pub calories: Option<String>,
    #[serde(default)]
    pub max_rating: Option<String>,
    #[serde(default)]
    pub min_total_time: Option<String>,
}

impl SetFiltersParams {
    /// Fields present in the call, in query parameter order.
    pub fn edits(&self) -> Vec<(FilterField, &str)> {
        FilterField::ALL
            .iter()
            .filter_map(|field| {
                let value = match field {
                    FilterField::Title => &self.title,
                    FilterField::Cuisine => &self.cuisine,
                    FilterField::MinRating => &self.min_rating,
                    FilterField::MaxTotalTime => &self.max_total_time,
                    FilterField::Calories => &self.calories,
                    FilterField::MaxRating => &self.max_rating,
                    FilterField::MinTotalTime => &self.min_total_time,
                };
                value.as_deref().map(|v| (*field, v))
            })
            .collect()
    }
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SelectRecipeParams {
    /// Recipe id
    #[serde(default)]
    pub id: Option<i64>,
    /// 1-based row number in the displayed table
    #[serde(default)]
    pub row: Option<usize>,
}

#[derive(Clone)]
pub struct RecipeBrowserServer {
    table: Arc<RecipeTable>,
    tool_router: ToolRouter<RecipeBrowserServer>,
}

#[tool_router]
impl RecipeBrowserServer {
    pub fn new(source: Arc<dyn RecipeSource>, page_size: PageSize) -> Self {
        Self {
            table: Arc::new(RecipeTable::new(source, page_size)),
            tool_router: Self::tool_router(),
        }
    }

    pub fn table(&self) -> &RecipeTable {
        &self.table
    }

    async fn view_result(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(self.table.render().await)]))
    }

    fn error_result(message: &str, details: impl ToString) -> Result<CallToolResult, McpError> {
        let error = json!({
            "error": message,
            "details": details.to_string()
        });
        Ok(CallToolResult::error(vec![Content::text(error.to_string())]))
    }

    #[tool(description = "Show the recipe table, loading the first page on first use")]
    async fn show_recipes(&self) -> Result<CallToolResult, McpError> {
        tracing::debug!("MCP tool call: show_recipes");
        self.table.mount().await;
        self.view_result().await
    }

    #[tool(description = "Reload the current page of the recipe catalog")]
    async fn reload_recipes(&self) -> Result<CallToolResult, McpError> {
        self.table.reload().await;
        self.view_result().await
    }

    #[tool(description = "Go to the next page of recipes")]
    async fn next_page(&self) -> Result<CallToolResult, McpError> {
        if !self.table.next_page().await {
            tracing::debug!("Page unchanged: already on the last page or not yet loaded");
        }
        self.view_result().await
    }

    #[tool(description = "Go to the previous page of recipes (stays on page 1 if already there)")]
    async fn previous_page(&self) -> Result<CallToolResult, McpError> {
        if !self.table.previous_page().await {
            tracing::debug!("Page unchanged: already on the first page or not yet loaded");
        }
        self.view_result().await
    }

    #[tool(description = "Jump to a specific page of recipes")]
    async fn go_to_page(
        &self,
        Parameters(params): Parameters<GoToPageParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.table.go_to_page(params.page).await {
            Ok(_) => self.view_result().await,
            Err(e) => Self::error_result("Invalid page", e),
        }
    }

    #[tool(description = "Change how many recipes are shown per page (15, 25 or 50)")]
    async fn set_page_size(
        &self,
        Parameters(params): Parameters<SetPageSizeParams>,
    ) -> Result<CallToolResult, McpError> {
        match PageSize::try_from(params.limit) {
            Ok(page_size) => {
                self.table.set_page_size(page_size).await;
                self.view_result().await
            }
            Err(e) => Self::error_result("Invalid page size", e),
        }
    }

    #[tool(description = "Edit search filters (title, cuisine, min_rating, max_total_time, calories, max_rating, min_total_time). Empty string clears a filter. Does not search.")]
    async fn set_filters(
        &self,
        Parameters(params): Parameters<SetFiltersParams>,
    ) -> Result<CallToolResult, McpError> {
        for (field, value) in params.edits() {
            self.table.set_filter(field, value).await;
        }
        self.view_result().await
    }

    #[tool(description = "Clear all search filters. Does not search.")]
    async fn clear_filters(&self) -> Result<CallToolResult, McpError> {
        self.table.clear_filters().await;
        self.view_result().await
    }

    #[tool(description = "Search recipes using the current filters")]
    async fn search_recipes(&self) -> Result<CallToolResult, McpError> {
        tracing::debug!("MCP tool call: search_recipes");
        self.table.search().await;
        self.view_result().await
    }

    #[tool(description = "Open the detail drawer for a recipe, by id or by 1-based row number")]
    async fn select_recipe(
        &self,
        Parameters(params): Parameters<SelectRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let selected = match (params.id, params.row) {
            (Some(id), _) => self.table.select_recipe(id).await,
            (None, Some(row)) => self.table.select_row(row).await,
            (None, None) => return Self::error_result("Invalid selection", "Provide either id or row"),
        };

        match selected {
            Ok(()) => self.view_result().await,
            Err(e) => Self::error_result("Recipe not found", e),
        }
    }

    #[tool(description = "Close the recipe detail drawer")]
    async fn close_recipe_details(&self) -> Result<CallToolResult, McpError> {
        self.table.close_details().await;
        self.view_result().await
    }
}

#[tool_handler]
impl ServerHandler for RecipeBrowserServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some("This server presents a paginated recipe catalog as a table. Call show_recipes first, then page with next_page/previous_page/go_to_page, change the page size with set_page_size, narrow results with set_filters followed by search_recipes, and open a recipe's details with select_recipe. Every tool returns the updated table.".to_string()),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        Ok(self.get_info())
    }
}
