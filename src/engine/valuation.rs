//! Per-coin valuation in the three units of account.

use super::checked::{self, Checked};
use crate::domain::{Asset, Coin, Decimal};

/// Prices in effect at one action's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceAt {
    /// Paired-asset price in base-asset units.
    pub in_rune: Decimal,
    /// Paired-asset price in fiat.
    pub in_usd: Decimal,
}

/// A value expressed in base asset, paired asset and fiat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Valuation {
    pub in_rune: Decimal,
    pub in_asset: Decimal,
    pub in_usd: Decimal,
}

impl Valuation {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn checked_add(self, other: Valuation) -> Checked<Valuation> {
        Ok(Valuation {
            in_rune: checked::add(self.in_rune, other.in_rune)?,
            in_asset: checked::add(self.in_asset, other.in_asset)?,
            in_usd: checked::add(self.in_usd, other.in_usd)?,
        })
    }

    pub fn checked_sub(self, other: Valuation) -> Checked<Valuation> {
        Ok(Valuation {
            in_rune: checked::sub(self.in_rune, other.in_rune)?,
            in_asset: checked::sub(self.in_asset, other.in_asset)?,
            in_usd: checked::sub(self.in_usd, other.in_usd)?,
        })
    }

    /// Value of a base-asset amount.
    pub fn of_rune(amount: Decimal, price: &PriceAt) -> Checked<Valuation> {
        let in_asset = checked::div(amount, price.in_rune)?;
        Ok(Valuation {
            in_rune: amount,
            in_asset,
            in_usd: checked::mul(in_asset, price.in_usd)?,
        })
    }

    /// Value of a paired-asset amount.
    pub fn of_asset(amount: Decimal, price: &PriceAt) -> Checked<Valuation> {
        Ok(Valuation {
            in_rune: checked::mul(amount, price.in_rune)?,
            in_asset: amount,
            in_usd: checked::mul(amount, price.in_usd)?,
        })
    }
}

/// Whether a coin is part of the position's flows in `pool`.
pub fn is_position_coin(coin: &Coin, pool: &Asset) -> bool {
    coin.asset.is_rune() || &coin.asset == pool
}

/// Value a single coin moved in `pool`.
///
/// Coins of any asset other than the base asset and the pool's paired asset
/// are worth zero here.
pub fn value_coin(coin: &Coin, pool: &Asset, price: &PriceAt) -> Checked<Valuation> {
    if coin.asset.is_rune() {
        Valuation::of_rune(coin.amount, price)
    } else if &coin.asset == pool {
        Valuation::of_asset(coin.amount, price)
    } else {
        Ok(Valuation::zero())
    }
}
