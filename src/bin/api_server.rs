use std::sync::Arc;

use book_catalog::infra::config;
use book_catalog::transport;
use book_catalog::{BookStore, CatalogService, PgBookStore};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config::log_filter()))
        .with_target(true)
        .init();

    // --- Store Initialization ---
    let database_url = config::database_url()?;
    let max_connections = config::max_connections()?;
    info!(max_connections, "connecting to PostgreSQL");
    let store = PgBookStore::connect(&database_url, max_connections).await?;
    let books = store.count().await?;
    info!(books, "book store ready");

    // --- API Server Initialization ---
    let app_state = transport::http::AppState::new(
        CatalogService::new(Arc::new(store)),
        config::max_upload_bytes()?,
    );
    let app = transport::http::create_router(app_state).merge(
        SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()),
    );

    let bind_addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "catalog listening; open /book/ in a browser, API docs at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("server stopped");
    Ok(())
}
