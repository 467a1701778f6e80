use super::checked::{self, ArithmeticError, Checked};
use super::valuation::{is_position_coin, value_coin, PriceAt, Valuation};
use super::{ComputationError, Denomination};
use crate::domain::{Action, ActionType, Asset, Decimal, PriceSeries, Transfer};

/// Native amounts and valuations of one direction of flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flow {
    pub rune: Decimal,
    pub asset: Decimal,
    pub value: Valuation,
}

impl Flow {
    pub fn checked_add(self, other: Flow) -> Checked<Flow> {
        Ok(Flow {
            rune: checked::add(self.rune, other.rune)?,
            asset: checked::add(self.asset, other.asset)?,
            value: self.value.checked_add(other.value)?,
        })
    }

    pub fn checked_sub(self, other: Flow) -> Checked<Flow> {
        Ok(Flow {
            rune: checked::sub(self.rune, other.rune)?,
            asset: checked::sub(self.asset, other.asset)?,
            value: self.value.checked_sub(other.value)?,
        })
    }
}

/// Running totals of everything added to and withdrawn from a pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowTotals {
    pub added: Flow,
    pub withdrawn: Flow,
}

/// What processing one action did to the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Added,
    Withdrawn,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotSuccessful,
    /// Touches another pool, or more than one pool.
    OtherPools,
    UnsupportedType,
}

/// Classifies actions and sums their net flows into the added and withdrawn
/// buckets. Only historical prices are consulted; the pool's current state
/// never enters here.
pub struct FlowAccumulator<'a> {
    pool: &'a Asset,
    price_in_rune: &'a PriceSeries,
    price_in_usd: &'a PriceSeries,
    totals: FlowTotals,
}

impl<'a> FlowAccumulator<'a> {
    pub fn new(
        pool: &'a Asset,
        price_in_rune: &'a PriceSeries,
        price_in_usd: &'a PriceSeries,
    ) -> Self {
        Self {
            pool,
            price_in_rune,
            price_in_usd,
            totals: FlowTotals::default(),
        }
    }

    /// Process a single action, updating the running totals.
    ///
    /// On error the totals are left untouched for this action.
    pub fn process_action(&mut self, action: &Action) -> Result<ActionOutcome, ComputationError> {
        if !action.is_success() {
            return Ok(ActionOutcome::Skipped(SkipReason::NotSuccessful));
        }
        match action.touches_only(self.pool) {
            None => return Err(malformed(action, "pools")),
            Some(false) => return Ok(ActionOutcome::Skipped(SkipReason::OtherPools)),
            Some(true) => {}
        }
        if let ActionType::Other(_) = action.action_type {
            return Ok(ActionOutcome::Skipped(SkipReason::UnsupportedType));
        }

        let inputs = action.inputs.as_deref().ok_or_else(|| malformed(action, "in"))?;
        let outputs = action.outputs.as_deref().ok_or_else(|| malformed(action, "out"))?;

        let price = if self.has_priced_flow(inputs) || self.has_priced_flow(outputs) {
            Some(self.price_at(action)?)
        } else {
            None
        };

        let inflow = self
            .sum_transfers(inputs, price.as_ref())
            .map_err(|e| e.context(describe(action, "inbound flow")))?;
        let outflow = self
            .sum_transfers(outputs, price.as_ref())
            .map_err(|e| e.context(describe(action, "outbound flow")))?;

        match action.action_type {
            ActionType::Withdraw => {
                // Withdraws may carry inbound dust (the memo transaction itself).
                self.totals.withdrawn = outflow
                    .checked_sub(inflow)
                    .and_then(|net| self.totals.withdrawn.checked_add(net))
                    .map_err(|e| e.context(describe(action, "withdrawn totals")))?;
                Ok(ActionOutcome::Withdrawn)
            }
            ActionType::AddLiquidity => {
                self.totals.added = inflow
                    .checked_sub(outflow)
                    .and_then(|net| self.totals.added.checked_add(net))
                    .map_err(|e| e.context(describe(action, "added totals")))?;
                Ok(ActionOutcome::Added)
            }
            ActionType::Other(_) => Ok(ActionOutcome::Skipped(SkipReason::UnsupportedType)),
        }
    }

    pub fn totals(&self) -> &FlowTotals {
        &self.totals
    }

    pub fn into_totals(self) -> FlowTotals {
        self.totals
    }

    /// A price is only needed when a nonzero position coin moves.
    fn has_priced_flow(&self, transfers: &[Transfer]) -> bool {
        transfers
            .iter()
            .flat_map(|t| t.coins.iter())
            .any(|c| is_position_coin(c, self.pool) && !c.amount.is_zero())
    }

    fn price_at(&self, action: &Action) -> Result<PriceAt, ComputationError> {
        let at = action.date.to_secs();
        let missing = |denomination| ComputationError::MissingPriceSample {
            action_type: action.action_type.clone(),
            date: action.date,
            at,
            denomination,
        };
        let in_rune = self
            .price_in_rune
            .get(at)
            .ok_or_else(|| missing(Denomination::Rune))?;
        let in_usd = self
            .price_in_usd
            .get(at)
            .ok_or_else(|| missing(Denomination::Usd))?;
        Ok(PriceAt { in_rune, in_usd })
    }

    fn sum_transfers(
        &self,
        transfers: &[Transfer],
        price: Option<&PriceAt>,
    ) -> Result<Flow, ArithmeticError> {
        let mut flow = Flow::default();
        for coin in transfers.iter().flat_map(|t| t.coins.iter()) {
            if coin.asset.is_rune() {
                flow.rune = checked::add(flow.rune, coin.amount)?;
            } else if &coin.asset == self.pool {
                flow.asset = checked::add(flow.asset, coin.amount)?;
            }
            // Without a price every position coin in this action is zero.
            if let Some(price) = price {
                let value = value_coin(coin, self.pool, price)?;
                flow.value = flow.value.checked_add(value)?;
            }
        }
        Ok(flow)
    }
}

fn malformed(action: &Action, field: &'static str) -> ComputationError {
    ComputationError::MalformedAction {
        action_type: action.action_type.clone(),
        date: action.date,
        field,
    }
}

fn describe(action: &Action, what: &str) -> String {
    format!("{} of {} action dated {}", what, action.action_type, action.date)
}
