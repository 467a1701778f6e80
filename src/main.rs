use lp_returns::{api, config::Config, DataSource, MidgardDataSource, ReturnsOrchestrator};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    let datasource: Arc<dyn DataSource> = match MidgardDataSource::new(
        config.midgard_api_url.clone(),
        config.request_timeout,
    ) {
        Ok(ds) => Arc::new(ds),
        Err(e) => {
            eprintln!("Failed to build Midgard client: {}", e);
            std::process::exit(1);
        }
    };
    let orchestrator = Arc::new(ReturnsOrchestrator::new(datasource, config.clone()));

    // Create router
    let app = api::create_router(api::AppState::new(config.clone(), orchestrator));

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {} (midgard: {})", addr, config.midgard_api_url);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
