//! Liquidity-affecting actions as reported by the ledger indexer.

use crate::domain::{Address, Asset, Decimal, TimeNs};
use serde::{Deserialize, Serialize};

/// Kind of action. Only adds and withdraws affect a position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    AddLiquidity,
    Withdraw,
    /// Any other action kind (swap, refund, ...), kept verbatim.
    Other(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::AddLiquidity => "addLiquidity",
            ActionType::Withdraw => "withdraw",
            ActionType::Other(s) => s,
        }
    }
}

impl From<&str> for ActionType {
    fn from(s: &str) -> Self {
        match s {
            "addLiquidity" => ActionType::AddLiquidity,
            "withdraw" => ActionType::Withdraw,
            other => ActionType::Other(other.to_string()),
        }
    }
}

impl From<String> for ActionType {
    fn from(s: String) -> Self {
        ActionType::from(s.as_str())
    }
}

impl From<ActionType> for String {
    fn from(t: ActionType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement status of an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionStatus {
    Success,
    Pending,
    Other(String),
}

impl ActionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ActionStatus::Success => "success",
            ActionStatus::Pending => "pending",
            ActionStatus::Other(s) => s,
        }
    }
}

impl From<&str> for ActionStatus {
    fn from(s: &str) -> Self {
        match s {
            "success" => ActionStatus::Success,
            "pending" => ActionStatus::Pending,
            other => ActionStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ActionStatus {
    fn from(s: String) -> Self {
        ActionStatus::from(s.as_str())
    }
}

impl From<ActionStatus> for String {
    fn from(s: ActionStatus) -> Self {
        s.as_str().to_string()
    }
}

/// An amount of a single asset, in the ledger's 1e8 fixed-point scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub asset: Asset,
    pub amount: Decimal,
}

impl Coin {
    pub fn new(asset: Asset, amount: Decimal) -> Self {
        Self { asset, amount }
    }
}

/// One leg of an action: the coins moved from or to an address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transfer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(rename = "txID", default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    pub coins: Vec<Coin>,
}

impl Transfer {
    pub fn of(coins: Vec<Coin>) -> Self {
        Self {
            address: None,
            tx_id: None,
            coins,
        }
    }
}

/// A single liquidity-affecting event.
///
/// `pools`, `in` and `out` are optional so that an incomplete record can be
/// reported as malformed rather than failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub status: ActionStatus,
    pub date: TimeNs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(default)]
    pub pools: Option<Vec<Asset>>,
    #[serde(rename = "in", default)]
    pub inputs: Option<Vec<Transfer>>,
    #[serde(rename = "out", default)]
    pub outputs: Option<Vec<Transfer>>,
}

impl Action {
    /// Create a complete action; the builders below adjust it.
    pub fn new(action_type: ActionType, status: ActionStatus, date: TimeNs, pool: Asset) -> Self {
        Self {
            action_type,
            status,
            date,
            height: None,
            pools: Some(vec![pool]),
            inputs: Some(Vec::new()),
            outputs: Some(Vec::new()),
        }
    }

    pub fn with_input(mut self, transfer: Transfer) -> Self {
        self.inputs.get_or_insert_with(Vec::new).push(transfer);
        self
    }

    pub fn with_output(mut self, transfer: Transfer) -> Self {
        self.outputs.get_or_insert_with(Vec::new).push(transfer);
        self
    }

    pub fn with_pools(mut self, pools: Option<Vec<Asset>>) -> Self {
        self.pools = pools;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Success
    }

    /// True when the action touches exactly `pool` and nothing else.
    ///
    /// Returns `None` when the action carries no pool list at all.
    pub fn touches_only(&self, pool: &Asset) -> Option<bool> {
        self.pools
            .as_ref()
            .map(|pools| pools.len() == 1 && &pools[0] == pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn btc() -> Asset {
        Asset::new("BTC.BTC".to_string())
    }

    #[test]
    fn test_action_type_wire_strings() {
        assert_eq!(ActionType::from("addLiquidity"), ActionType::AddLiquidity);
        assert_eq!(ActionType::from("withdraw"), ActionType::Withdraw);
        assert_eq!(
            ActionType::from("swap"),
            ActionType::Other("swap".to_string())
        );
        assert_eq!(ActionType::Other("swap".to_string()).to_string(), "swap");
    }

    #[test]
    fn test_action_deserializes_with_missing_legs() {
        let json = serde_json::json!({
            "type": "withdraw",
            "status": "success",
            "date": 1_650_000_000_000_000_000i64,
            "pools": ["BTC.BTC"],
        });
        let action: Action = serde_json::from_value(json).unwrap();
        assert_eq!(action.action_type, ActionType::Withdraw);
        assert!(action.is_success());
        assert_eq!(action.inputs, None);
        assert_eq!(action.outputs, None);
    }

    #[test]
    fn test_action_serializes_wire_names() {
        let action = Action::new(
            ActionType::AddLiquidity,
            ActionStatus::Success,
            TimeNs::new(5),
            btc(),
        )
        .with_input(Transfer::of(vec![Coin::new(btc(), Decimal::from(1))]));
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "addLiquidity");
        assert_eq!(json["status"], "success");
        assert_eq!(json["in"][0]["coins"][0]["asset"], "BTC.BTC");
    }

    #[test]
    fn test_touches_only() {
        let action = Action::new(
            ActionType::AddLiquidity,
            ActionStatus::Success,
            TimeNs::new(0),
            btc(),
        );
        assert_eq!(action.touches_only(&btc()), Some(true));
        assert_eq!(
            action.touches_only(&Asset::new("ETH.ETH".to_string())),
            Some(false)
        );

        let multi = action
            .clone()
            .with_pools(Some(vec![btc(), Asset::new("ETH.ETH".to_string())]));
        assert_eq!(multi.touches_only(&btc()), Some(false));

        let missing = action.with_pools(None);
        assert_eq!(missing.touches_only(&btc()), None);
    }
}
