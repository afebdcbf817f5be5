pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod source;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export the core entry points
pub use error::InspectError;
pub use logic::{build_tree, decode_attributes, decode_value};

// Export all model types
pub use model::*;

// Export source types
pub use source::{HttpSource, InspectionSource, ResourceQuery};

// Function for integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with INFO level only (suppress DEBUG logs)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    // Load configuration
    let config = crate::config::AppConfig::load()?;

    let source = Arc::new(crate::source::HttpSource::new(&config.agents)?);

    // Create router with state
    let app = crate::api::routes::create_router().with_state(source);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}
