use std::sync::Arc;

use recipe_browser::client::{RecipeApiClient, RecipeSource};
use recipe_browser::config::BrowserConfig;
use recipe_browser::server::RecipeBrowserServer;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BrowserConfig::from_env()?;
    let client = Arc::new(RecipeApiClient::new(config.api_base_url.clone()));

    // The table works without the backend (it shows the error), so only warn here
    tracing::info!("Checking recipe API at {}...", config.api_base_url);
    match client.fetch_recipes(1, config.page_size.get()).await {
        Ok(page) => {
            let total = page.total.map_or_else(|| "unknown".to_string(), |t| t.to_string());
            tracing::info!("Recipe API reachable ({} recipes in catalog)", total);
        }
        Err(e) => {
            tracing::warn!("Recipe API check failed: {}", e);
            tracing::warn!("Please verify:");
            tracing::warn!("  - RECIPE_API_BASE_URL is correct: {}", config.api_base_url);
            tracing::warn!("  - The recipe backend is running and accessible");
        }
    }

    let sse_config = SseServerConfig {
        bind: config.bind_addr,
        sse_path: "/sse".to_string(),
        post_path: "/message".to_string(),
        ct: tokio_util::sync::CancellationToken::new(),
        sse_keep_alive: None,
    };

    tracing::info!("Recipe browser MCP server listening on {}", sse_config.bind);

    // serve_with_config handles binding, axum server setup, and graceful shutdown internally
    let sse_server = SseServer::serve_with_config(sse_config).await?;

    // Each session gets its own table over the shared client
    let page_size = config.page_size;
    let ct = sse_server.with_service(move || {
        let source: Arc<dyn RecipeSource> = client.clone();
        RecipeBrowserServer::new(source, page_size)
    });

    tracing::info!("Recipe browser MCP server started successfully");

    // Wait for Ctrl+C
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    ct.cancel();

    Ok(())
}
