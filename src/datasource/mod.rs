//! Data source abstraction for fetching member, pool, action and price records.

use crate::domain::{Action, Address, Asset, MemberPool, PoolState, PriceSample, TimeSecs};
use async_trait::async_trait;
use std::fmt;

pub mod midgard;
pub mod mock;

pub use midgard::MidgardDataSource;
pub use mock::MockDataSource;

/// Action types that change a liquidity position.
pub const LIQUIDITY_ACTION_TYPES: &[&str] = &["addLiquidity", "withdraw"];

/// One page of the action listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionsPage {
    pub actions: Vec<Action>,
    /// Total number of matching actions across all pages.
    pub count: usize,
}

/// Data source trait for the records an LP return computation needs.
///
/// Implementations must handle retry/backoff and rate limiting. Pagination is
/// exposed to the caller so pages can be fetched concurrently.
#[async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Fetch the pools a member has positions in.
    ///
    /// # Arguments
    /// * `address` - Rune-side or asset-side address of the member
    async fn fetch_member(&self, address: &Address) -> Result<Vec<MemberPool>, DataSourceError>;

    /// Fetch the current state of a pool.
    async fn fetch_pool(&self, pool: &Asset) -> Result<PoolState, DataSourceError>;

    /// Fetch one page of liquidity actions involving any of `addresses`.
    ///
    /// # Arguments
    /// * `addresses` - Addresses to match (logical OR)
    /// * `limit` - Page size
    /// * `offset` - Number of actions to skip
    async fn fetch_actions(
        &self,
        addresses: &[Address],
        limit: usize,
        offset: usize,
    ) -> Result<ActionsPage, DataSourceError>;

    /// Fetch the pool's prices at one second.
    async fn fetch_price_sample(
        &self,
        pool: &Asset,
        at: TimeSecs,
    ) -> Result<PriceSample, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 5xx server error, 4xx client error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded (caller should implement backoff)
    RateLimited,
    /// The requested member or pool does not exist
    NotFound(String),
    /// Other error
    Other(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::RateLimited => write!(f, "Rate limited"),
            DataSourceError::NotFound(what) => write!(f, "Not found: {}", what),
            DataSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}
