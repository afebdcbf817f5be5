use axum::serve;
use resmon::api::routes::create_router;
use resmon::config::AppConfig;
use resmon::source::HttpSource;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress reqwest debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Warn)
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    log::info!(
        "configuration loaded: server={}:{}, {} agent(s) registered",
        config.server.host,
        config.server.port,
        config.agents.len()
    );

    let source = Arc::new(HttpSource::new(&config.agents)?);

    // Create router with state
    let app = create_router().with_state(source);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("listening on {}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
