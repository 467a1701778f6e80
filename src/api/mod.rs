pub mod health;
pub mod returns;

use crate::config::Config;
use crate::orchestration::ReturnsOrchestrator;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: Arc<ReturnsOrchestrator>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Arc<ReturnsOrchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/returns", get(returns::get_returns))
        .layer(cors)
        .with_state(state)
}
