//! Return summary produced by the engine.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of a position's flows and returns.
///
/// All fields are in the ledger's 1e8 fixed-point scale; descaling is left to
/// the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolReturnSummary {
    pub added_rune: Decimal,
    pub added_asset: Decimal,
    pub added_value_in_rune: Decimal,
    pub added_value_in_asset: Decimal,
    pub added_value_in_usd: Decimal,

    pub withdrawn_rune: Decimal,
    pub withdrawn_asset: Decimal,
    pub withdrawn_value_in_rune: Decimal,
    pub withdrawn_value_in_asset: Decimal,
    pub withdrawn_value_in_usd: Decimal,

    pub redeemable_rune: Decimal,
    pub redeemable_asset: Decimal,
    pub redeemable_value_in_rune: Decimal,
    pub redeemable_value_in_asset: Decimal,
    pub redeemable_value_in_usd: Decimal,

    pub realized_return_value_in_rune: Decimal,
    pub realized_return_value_in_asset: Decimal,
    pub realized_return_value_in_usd: Decimal,

    pub total_return_value_in_rune: Decimal,
    pub total_return_value_in_asset: Decimal,
    pub total_return_value_in_usd: Decimal,
}
