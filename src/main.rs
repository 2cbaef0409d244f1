// src/main.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use verihub::config::CONFIG;
use verihub::server::db;
use verihub::state::AppState;
use verihub::tools::{FakeTransformTool, ToolRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting verihub backend");
    info!("Database: {}", CONFIG.database_url);
    info!("Project storage: {}", CONFIG.projects_dir);

    // Database pool + schema
    let pool = db::create_pool(&CONFIG.database_url).await?;
    db::run_migrations(&pool, Path::new(&CONFIG.migrations_dir)).await?;

    // Tool registry, injected into the engine rather than looked up through
    // a process-wide default.
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(FakeTransformTool::default()));

    let (app_state, worker) = AppState::assemble(
        pool,
        PathBuf::from(&CONFIG.projects_dir),
        registry,
    );
    info!(
        "Registered tools: {}",
        app_state
            .registry
            .list_available()
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let app = verihub::api::http::http_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let bind_address = format!("{}:{}", CONFIG.host, CONFIG.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    let server_future = axum::serve(listener, app);

    tokio::select! {
        result = server_future => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = worker => {
            error!("Operation worker unexpectedly terminated");
        }
    }

    Ok(())
}
