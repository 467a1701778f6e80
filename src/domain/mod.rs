//! Domain types for LP return computation.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: TimeNs, TimeSecs, Address, Asset
//! - Action, position, pool and price records as consumed by the engine
//! - The PoolReturnSummary the engine produces

pub mod action;
pub mod decimal;
pub mod pool;
pub mod price;
pub mod primitives;
pub mod summary;

pub use action::{Action, ActionStatus, ActionType, Coin, Transfer};
pub use decimal::{Decimal, LEDGER_SCALE};
pub use pool::{MemberPool, PoolState, Position};
pub use price::{PriceSample, PriceSeries};
pub use primitives::{Address, Asset, TimeNs, TimeSecs, RUNE_ASSET};
pub use summary::PoolReturnSummary;
