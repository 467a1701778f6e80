//! Domain primitives: TimeNs, TimeSecs, Address, Asset.

use serde::{Deserialize, Serialize};

/// Identifier of the network's base asset, the pricing numeraire of every pool.
pub const RUNE_ASSET: &str = "THOR.RUNE";

/// Action timestamp in nanoseconds since Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeNs(pub i64);

impl TimeNs {
    pub fn new(ns: i64) -> Self {
        TimeNs(ns)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Truncate to whole seconds (floor, also for pre-epoch values).
    pub fn to_secs(&self) -> TimeSecs {
        TimeSecs(self.0.div_euclid(1_000_000_000))
    }
}

impl std::fmt::Display for TimeNs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Second-resolution timestamp keying historical price samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSecs(pub i64);

impl TimeSecs {
    pub fn new(secs: i64) -> Self {
        TimeSecs(secs)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TimeSecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Member wallet address on either side of a pool.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: String) -> Self {
        Address(addr)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rune-side addresses carry the network's `thor` prefix.
    pub fn is_rune_address(&self) -> bool {
        self.0.starts_with("thor")
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Asset identifier in `CHAIN.SYMBOL` form (e.g., "BTC.BTC", "THOR.RUNE").
///
/// A pool is identified by its paired asset, so this also serves as pool id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Asset(pub String);

impl Asset {
    pub fn new(asset: String) -> Self {
        Asset(asset)
    }

    pub fn rune() -> Self {
        Asset(RUNE_ASSET.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_rune(&self) -> bool {
        self.0 == RUNE_ASSET
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
