use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::orchestration::OrchestrationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<OrchestrationError> for AppError {
    fn from(err: OrchestrationError) -> Self {
        match err {
            OrchestrationError::PositionNotFound { .. } => AppError::NotFound(err.to_string()),
            OrchestrationError::DataSource(_) | OrchestrationError::Computation(_) => {
                tracing::warn!("Returns computation failed: {}", err);
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, Asset};
    use crate::engine::ComputationError;

    #[test]
    fn test_orchestration_error_mapping() {
        let not_found = OrchestrationError::PositionNotFound {
            address: Address::new("thor1abc".to_string()),
            pool: Asset::new("BTC.BTC".to_string()),
        };
        let response = AppError::from(not_found).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let computation = OrchestrationError::Computation(ComputationError::DivisionByZero {
            context: "redeemable rune".to_string(),
        });
        let err = AppError::from(computation);
        assert_eq!(
            err.to_string(),
            "Internal server error: division by zero computing redeemable rune"
        );
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
