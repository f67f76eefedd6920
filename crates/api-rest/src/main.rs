//! Standalone REST API server binary.
//!
//! Serves the body-site taxonomy and stateless navigation over HTTP, with OpenAPI/Swagger UI at
//! `/swagger-ui`.

use std::sync::Arc;

use api_rest::{router, AppState};
use ipc_core::{CoreConfig, DEFAULT_REST_ADDR, REST_ADDR_ENV_VAR, TAXONOMY_ENV_VAR};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the IPC REST API server
///
/// # Environment Variables
/// - `IPC_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `IPC_BODY_SITE_TAXONOMY`: Override taxonomy YAML file (default: built-in taxonomy)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the taxonomy override is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("ipc_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var(REST_ADDR_ENV_VAR).unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = CoreConfig::from_env_value(std::env::var(TAXONOMY_ENV_VAR).ok())?;
    let taxonomy = Arc::new(cfg.load_taxonomy()?.into_owned());
    tracing::info!(
        "-- Loaded body-site taxonomy: {} root regions, {} sites",
        taxonomy.roots().len(),
        taxonomy.leaves().count()
    );

    tracing::info!("-- Starting IPC REST API on {}", addr);

    let app = router(AppState::new(taxonomy));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
