//! Member position and pool state records.

use crate::domain::{Address, Asset, Decimal};
use serde::{Deserialize, Serialize};

/// A member's stake in one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub pool: Asset,
    pub liquidity_units: u128,
}

impl Position {
    pub fn new(pool: Asset, liquidity_units: u128) -> Self {
        Self {
            pool,
            liquidity_units,
        }
    }
}

/// A member's entry for one pool, as listed by the member endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPool {
    pub position: Position,
    pub rune_address: Option<Address>,
    pub asset_address: Option<Address>,
    /// Ledger-side totals, used only to cross-check the computed flows.
    pub rune_added: Decimal,
    pub asset_added: Decimal,
    pub rune_withdrawn: Decimal,
    pub asset_withdrawn: Decimal,
}

impl MemberPool {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            rune_address: None,
            asset_address: None,
            rune_added: Decimal::zero(),
            asset_added: Decimal::zero(),
            rune_withdrawn: Decimal::zero(),
            asset_withdrawn: Decimal::zero(),
        }
    }

    pub fn with_addresses(mut self, rune: Option<Address>, asset: Option<Address>) -> Self {
        self.rune_address = rune;
        self.asset_address = asset;
        self
    }

    pub fn pool(&self) -> &Asset {
        &self.position.pool
    }

    /// Addresses whose actions make up this position, starting from the queried one.
    ///
    /// The queried address stands in for its own side; the member record
    /// supplies the other side. Empty and duplicate entries are dropped.
    pub fn action_addresses(&self, queried: &Address) -> Vec<Address> {
        let (rune, asset) = if queried.is_rune_address() {
            (Some(queried), self.asset_address.as_ref())
        } else {
            (self.rune_address.as_ref(), Some(queried))
        };

        let mut addresses: Vec<Address> = Vec::with_capacity(2);
        for addr in [rune, asset].into_iter().flatten() {
            if !addr.as_str().trim().is_empty() && !addresses.contains(addr) {
                addresses.push(addr.clone());
            }
        }
        addresses
    }
}

/// Current reserves, shares and spot prices of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolState {
    pub liquidity_units: u128,
    pub rune_depth: u128,
    pub asset_depth: u128,
    /// Paired-asset price in base-asset units.
    pub asset_price: Decimal,
    /// Paired-asset price in fiat.
    #[serde(rename = "assetPriceUSD")]
    pub asset_price_usd: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> MemberPool {
        MemberPool::new(Position::new(Asset::new("BTC.BTC".to_string()), 10)).with_addresses(
            Some(Address::new("thor1member".to_string())),
            Some(Address::new("bc1member".to_string())),
        )
    }

    #[test]
    fn test_action_addresses_from_rune_side() {
        let addrs = member().action_addresses(&Address::new("thor1member".to_string()));
        assert_eq!(
            addrs,
            vec![
                Address::new("thor1member".to_string()),
                Address::new("bc1member".to_string())
            ]
        );
    }

    #[test]
    fn test_action_addresses_from_asset_side() {
        let addrs = member().action_addresses(&Address::new("bc1member".to_string()));
        assert_eq!(
            addrs,
            vec![
                Address::new("thor1member".to_string()),
                Address::new("bc1member".to_string())
            ]
        );
    }

    #[test]
    fn test_action_addresses_drops_empty_side() {
        let m = member().with_addresses(
            Some(Address::new("thor1member".to_string())),
            Some(Address::new(String::new())),
        );
        let addrs = m.action_addresses(&Address::new("thor1member".to_string()));
        assert_eq!(addrs, vec![Address::new("thor1member".to_string())]);
    }

    #[test]
    fn test_pool_state_serializes_usd_price_name() {
        let state = PoolState {
            liquidity_units: 1,
            rune_depth: 2,
            asset_depth: 3,
            asset_price: Decimal::from(2),
            asset_price_usd: Decimal::from(40),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["assetPriceUSD"], serde_json::json!("40"));
        assert_eq!(json["liquidityUnits"], serde_json::json!(1));
    }
}
