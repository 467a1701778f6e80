//! Display-ready rendering of a [`PoolReturnSummary`].

use crate::domain::{Decimal, PoolReturnSummary};
use crate::engine::checked::{self, Checked};
use crate::engine::ComputationError;
use serde::Serialize;

/// Amounts of one pool side, descaled to whole units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideReport {
    pub added: String,
    pub withdrawn: String,
    pub redeemable: String,
    /// `redeemable + withdrawn - added`
    pub gain: String,
    /// Percentage gain over what was added; absent when nothing was added.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain_percent: Option<String>,
}

/// Values in one denomination, descaled to whole units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueReport {
    pub added: String,
    pub withdrawn: String,
    pub redeemable: String,
    pub realized_return: String,
    pub total_return: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub rune: SideReport,
    pub asset: SideReport,
    pub value_in_rune: ValueReport,
    pub value_in_asset: ValueReport,
    pub value_in_usd: ValueReport,
}

impl PositionReport {
    pub fn from_summary(summary: &PoolReturnSummary) -> Result<Self, ComputationError> {
        let s = summary;
        Ok(PositionReport {
            rune: SideReport::new(s.added_rune, s.withdrawn_rune, s.redeemable_rune)
                .map_err(|e| e.context("rune gain"))?,
            asset: SideReport::new(s.added_asset, s.withdrawn_asset, s.redeemable_asset)
                .map_err(|e| e.context("asset gain"))?,
            value_in_rune: ValueReport {
                added: render(s.added_value_in_rune),
                withdrawn: render(s.withdrawn_value_in_rune),
                redeemable: render(s.redeemable_value_in_rune),
                realized_return: render(s.realized_return_value_in_rune),
                total_return: render(s.total_return_value_in_rune),
            },
            value_in_asset: ValueReport {
                added: render(s.added_value_in_asset),
                withdrawn: render(s.withdrawn_value_in_asset),
                redeemable: render(s.redeemable_value_in_asset),
                realized_return: render(s.realized_return_value_in_asset),
                total_return: render(s.total_return_value_in_asset),
            },
            value_in_usd: ValueReport {
                added: render(s.added_value_in_usd),
                withdrawn: render(s.withdrawn_value_in_usd),
                redeemable: render(s.redeemable_value_in_usd),
                realized_return: render(s.realized_return_value_in_usd),
                total_return: render(s.total_return_value_in_usd),
            },
        })
    }
}

impl SideReport {
    fn new(added: Decimal, withdrawn: Decimal, redeemable: Decimal) -> Checked<Self> {
        let (added, withdrawn, redeemable) =
            (added.descaled(), withdrawn.descaled(), redeemable.descaled());
        let held = checked::add(redeemable, withdrawn)?;
        let gain = checked::sub(held, added)?;
        let gain_percent = if added.is_zero() {
            None
        } else {
            let ratio = checked::div(held, added)?;
            let pct = checked::mul(checked::sub(ratio, Decimal::one())?, Decimal::hundred())?;
            Some(pct.to_canonical_string())
        };
        Ok(SideReport {
            added: added.to_canonical_string(),
            withdrawn: withdrawn.to_canonical_string(),
            redeemable: redeemable.to_canonical_string(),
            gain: gain.to_canonical_string(),
            gain_percent,
        })
    }
}

fn render(value: Decimal) -> String {
    value.descaled().to_canonical_string()
}
