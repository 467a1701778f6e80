use super::accumulator::{ActionOutcome, FlowAccumulator};
use super::reconcile::{build_summary, Redeemable};
use super::ComputationError;
use crate::domain::{Action, PoolReturnSummary, PoolState, Position, PriceSeries};
use tracing::debug;

/// Compute the return summary of `position` in its pool.
///
/// `actions` may be in any order and may include unsuccessful or unrelated
/// actions; they are filtered here. `price_in_rune` and `price_in_usd` must
/// hold a sample for the second of every action that moves position coins.
///
/// # Errors
/// Fails on the first missing price sample, malformed action, zero divisor or
/// overflow. No partial summary is returned.
pub fn compute(
    position: &Position,
    pool_state: &PoolState,
    actions: &[Action],
    price_in_rune: &PriceSeries,
    price_in_usd: &PriceSeries,
) -> Result<PoolReturnSummary, ComputationError> {
    let mut accumulator = FlowAccumulator::new(&position.pool, price_in_rune, price_in_usd);

    let mut counted = 0usize;
    for action in actions {
        match accumulator.process_action(action)? {
            ActionOutcome::Added | ActionOutcome::Withdrawn => counted += 1,
            ActionOutcome::Skipped(reason) => {
                debug!(
                    "Skipping {} action dated {}: {:?}",
                    action.action_type, action.date, reason
                );
            }
        }
    }
    debug!(
        "Accumulated {} of {} actions for pool {}",
        counted,
        actions.len(),
        position.pool
    );

    let totals = accumulator.into_totals();
    let redeemable = Redeemable::of(position, pool_state)?;
    build_summary(&totals, &redeemable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ActionStatus, ActionType, Asset, Coin, Decimal, TimeNs, TimeSecs, Transfer,
    };

    fn btc() -> Asset {
        Asset::new("BTC.BTC".to_string())
    }

    fn empty_pool() -> PoolState {
        PoolState {
            liquidity_units: 0,
            rune_depth: 0,
            asset_depth: 0,
            asset_price: Decimal::zero(),
            asset_price_usd: Decimal::zero(),
        }
    }

    #[test]
    fn test_no_actions_no_position() {
        let summary = compute(
            &Position::new(btc(), 0),
            &empty_pool(),
            &[],
            &PriceSeries::new(),
            &PriceSeries::new(),
        )
        .unwrap();
        assert_eq!(summary, PoolReturnSummary::default());
    }

    #[test]
    fn test_error_aborts_whole_computation() {
        let good = Action::new(
            ActionType::AddLiquidity,
            ActionStatus::Success,
            TimeNs::new(1_000_000_000),
            btc(),
        )
        .with_input(Transfer::of(vec![Coin::new(btc(), Decimal::from(1))]));
        let unpriced = Action::new(
            ActionType::Withdraw,
            ActionStatus::Success,
            TimeNs::new(2_000_000_000),
            btc(),
        )
        .with_output(Transfer::of(vec![Coin::new(Asset::rune(), Decimal::from(1))]));

        let in_rune = PriceSeries::new().with(TimeSecs::new(1), Decimal::from(20));
        let in_usd = PriceSeries::new().with(TimeSecs::new(1), Decimal::from(40));

        let result = compute(
            &Position::new(btc(), 0),
            &empty_pool(),
            &[good, unpriced],
            &in_rune,
            &in_usd,
        );
        assert!(matches!(
            result,
            Err(ComputationError::MissingPriceSample { at: TimeSecs(2), .. })
        ));
    }
}
