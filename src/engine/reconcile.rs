//! Blends accumulated historical flows with the position's current share of
//! the pool.
//!
//! Redeemable value uses the pool's current spot price, while the flows were
//! valued at each action's own historical price.

use super::accumulator::FlowTotals;
use super::checked::{self, Checked};
use super::valuation::Valuation;
use super::ComputationError;
use crate::domain::{Decimal, PoolReturnSummary, PoolState, Position};

/// The position's claim on current pool reserves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Redeemable {
    pub rune: Decimal,
    pub asset: Decimal,
    pub value: Valuation,
}

impl Redeemable {
    /// Pro-rata share of current reserves, valued at the current spot price.
    pub fn of(position: &Position, pool: &PoolState) -> Result<Self, ComputationError> {
        let rune =
            checked::pro_rata(position.liquidity_units, pool.rune_depth, pool.liquidity_units)
                .map_err(|e| e.context(format!("redeemable rune of {}", position.pool)))?;
        let asset =
            checked::pro_rata(position.liquidity_units, pool.asset_depth, pool.liquidity_units)
                .map_err(|e| e.context(format!("redeemable asset of {}", position.pool)))?;
        let value = spot_value(rune, asset, pool)
            .map_err(|e| e.context(format!("redeemable value of {}", position.pool)))?;
        Ok(Self { rune, asset, value })
    }
}

fn spot_value(rune: Decimal, asset: Decimal, pool: &PoolState) -> Checked<Valuation> {
    let rune_in_asset = checked::div(rune, pool.asset_price)?;
    Ok(Valuation {
        in_rune: checked::add(rune, checked::mul(asset, pool.asset_price)?)?,
        in_asset: checked::add(rune_in_asset, asset)?,
        in_usd: checked::add(
            checked::mul(rune_in_asset, pool.asset_price_usd)?,
            checked::mul(asset, pool.asset_price_usd)?,
        )?,
    })
}

/// Assemble the final summary from the flows and the redeemable position.
pub fn build_summary(
    totals: &FlowTotals,
    redeemable: &Redeemable,
) -> Result<PoolReturnSummary, ComputationError> {
    let added = &totals.added;
    let withdrawn = &totals.withdrawn;

    let realized = withdrawn
        .value
        .checked_sub(added.value)
        .map_err(|e| e.context("realized return"))?;
    let total = realized
        .checked_add(redeemable.value)
        .map_err(|e| e.context("total return"))?;

    Ok(PoolReturnSummary {
        added_rune: added.rune,
        added_asset: added.asset,
        added_value_in_rune: added.value.in_rune,
        added_value_in_asset: added.value.in_asset,
        added_value_in_usd: added.value.in_usd,

        withdrawn_rune: withdrawn.rune,
        withdrawn_asset: withdrawn.asset,
        withdrawn_value_in_rune: withdrawn.value.in_rune,
        withdrawn_value_in_asset: withdrawn.value.in_asset,
        withdrawn_value_in_usd: withdrawn.value.in_usd,

        redeemable_rune: redeemable.rune,
        redeemable_asset: redeemable.asset,
        redeemable_value_in_rune: redeemable.value.in_rune,
        redeemable_value_in_asset: redeemable.value.in_asset,
        redeemable_value_in_usd: redeemable.value.in_usd,

        realized_return_value_in_rune: realized.in_rune,
        realized_return_value_in_asset: realized.in_asset,
        realized_return_value_in_usd: realized.in_usd,

        total_return_value_in_rune: total.in_rune,
        total_return_value_in_asset: total.in_asset,
        total_return_value_in_usd: total.in_usd,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Asset;

    fn pool_state(units: u128) -> PoolState {
        PoolState {
            liquidity_units: units,
            rune_depth: 1_000_000_000_000,
            asset_depth: 50_000_000_000,
            asset_price: Decimal::from(20),
            asset_price_usd: Decimal::from(40_000),
        }
    }

    fn position(units: u128) -> Position {
        Position::new(Asset::new("BTC.BTC".to_string()), units)
    }

    #[test]
    fn test_redeemable_pro_rata() {
        let r = Redeemable::of(&position(10), &pool_state(100)).unwrap();
        assert_eq!(r.rune, Decimal::from(100_000_000_000));
        assert_eq!(r.asset, Decimal::from(5_000_000_000));
        // 1e11 + 5e9 * 20
        assert_eq!(r.value.in_rune, Decimal::from(200_000_000_000));
        // 1e11 / 20 + 5e9
        assert_eq!(r.value.in_asset, Decimal::from(10_000_000_000));
        // 5e9 * 40000 + 5e9 * 40000
        assert_eq!(r.value.in_usd, Decimal::from(400_000_000_000_000));
    }

    #[test]
    fn test_redeemable_zero_pool_units() {
        let err = Redeemable::of(&position(10), &pool_state(0)).unwrap_err();
        assert!(matches!(err, ComputationError::DivisionByZero { .. }));
    }

    #[test]
    fn test_redeemable_empty_position() {
        let r = Redeemable::of(&position(0), &pool_state(0)).unwrap();
        assert_eq!(r, Redeemable::default());
    }

    #[test]
    fn test_redeemable_zero_spot_price() {
        let mut state = pool_state(100);
        state.asset_price = Decimal::zero();
        let err = Redeemable::of(&position(10), &state).unwrap_err();
        assert!(matches!(err, ComputationError::DivisionByZero { .. }));
    }

    #[test]
    fn test_build_summary_identities() {
        let mut totals = FlowTotals::default();
        totals.added.value = Valuation {
            in_rune: Decimal::from(300),
            in_asset: Decimal::from(15),
            in_usd: Decimal::from(600),
        };
        totals.withdrawn.value = Valuation {
            in_rune: Decimal::from(100),
            in_asset: Decimal::from(4),
            in_usd: Decimal::from(250),
        };
        let redeemable = Redeemable {
            rune: Decimal::from(120),
            asset: Decimal::from(6),
            value: Valuation {
                in_rune: Decimal::from(240),
                in_asset: Decimal::from(12),
                in_usd: Decimal::from(480),
            },
        };

        let s = build_summary(&totals, &redeemable).unwrap();
        assert_eq!(s.realized_return_value_in_rune, Decimal::from(-200));
        assert_eq!(s.realized_return_value_in_asset, Decimal::from(-11));
        assert_eq!(s.realized_return_value_in_usd, Decimal::from(-350));
        assert_eq!(s.total_return_value_in_rune, Decimal::from(40));
        assert_eq!(s.total_return_value_in_asset, Decimal::from(1));
        assert_eq!(s.total_return_value_in_usd, Decimal::from(130));
        assert_eq!(s.redeemable_rune, Decimal::from(120));
    }
}
