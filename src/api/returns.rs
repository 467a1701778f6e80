use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{Address, Asset, PoolReturnSummary};
use crate::error::AppError;
use crate::report::PositionReport;

#[derive(Debug, Deserialize)]
pub struct ReturnsQuery {
    pub address: Option<String>,
    pub pool: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReturnsResponse {
    pub address: String,
    pub pool: String,
    pub summary: PoolReturnSummary,
    pub report: PositionReport,
}

fn required(value: Option<&str>, name: &str) -> Result<String, AppError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", name)))
}

pub async fn get_returns(
    Query(params): Query<ReturnsQuery>,
    State(state): State<AppState>,
) -> Result<Json<ReturnsResponse>, AppError> {
    let address = Address::new(required(params.address.as_deref(), "address")?);
    let pool = Asset::new(required(params.pool.as_deref(), "pool")?);

    let returns = state.orchestrator.pool_returns(&address, &pool).await?;
    let report = PositionReport::from_summary(&returns.summary)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(ReturnsResponse {
        address: address.to_string(),
        pool: pool.to_string(),
        summary: returns.summary,
        report,
    }))
}
