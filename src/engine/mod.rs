//! Pure computation engine for LP returns.
//!
//! Synchronous and side-effect free: every call to [`compute`] builds its
//! accumulator from scratch and returns a fresh [`PoolReturnSummary`].

use crate::domain::{ActionType, TimeNs, TimeSecs};
use thiserror::Error;

pub mod accumulator;
pub mod calculator;
pub mod checked;
pub mod reconcile;
pub mod valuation;

pub use accumulator::{ActionOutcome, Flow, FlowAccumulator, FlowTotals, SkipReason};
pub use calculator::compute;
pub use reconcile::{build_summary, Redeemable};
pub use valuation::{value_coin, PriceAt, Valuation};

/// Unit of account a value or price is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Denomination {
    Rune,
    Asset,
    Usd,
}

impl std::fmt::Display for Denomination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Denomination::Rune => write!(f, "rune"),
            Denomination::Asset => write!(f, "asset"),
            Denomination::Usd => write!(f, "usd"),
        }
    }
}

/// Reasons a computation fails as a whole. No partial summary is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputationError {
    #[error("missing {denomination} price sample at {at} for {action_type} action dated {date}")]
    MissingPriceSample {
        action_type: ActionType,
        date: TimeNs,
        at: TimeSecs,
        denomination: Denomination,
    },
    #[error("division by zero computing {context}")]
    DivisionByZero { context: String },
    #[error("malformed {action_type} action dated {date}: missing `{field}`")]
    MalformedAction {
        action_type: ActionType,
        date: TimeNs,
        field: &'static str,
    },
    #[error("arithmetic overflow computing {context}")]
    Overflow { context: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computation_error_display() {
        let err = ComputationError::MissingPriceSample {
            action_type: ActionType::Withdraw,
            date: TimeNs::new(1_650_000_000_500_000_000),
            at: TimeSecs::new(1_650_000_000),
            denomination: Denomination::Usd,
        };
        assert_eq!(
            err.to_string(),
            "missing usd price sample at 1650000000 for withdraw action dated 1650000000500000000"
        );

        let err = ComputationError::MalformedAction {
            action_type: ActionType::AddLiquidity,
            date: TimeNs::new(7),
            field: "in",
        };
        assert_eq!(
            err.to_string(),
            "malformed addLiquidity action dated 7: missing `in`"
        );
    }
}
