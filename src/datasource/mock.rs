//! Mock data source for testing without network calls.

use super::{ActionsPage, DataSource, DataSourceError};
use crate::domain::{Action, Address, Asset, MemberPool, PoolState, PriceSample, TimeSecs};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock data source that returns predefined test data.
///
/// Actions are served in insertion order regardless of address; tests that
/// need address filtering set up only the relevant actions.
#[derive(Debug, Clone, Default)]
pub struct MockDataSource {
    members: HashMap<Address, Vec<MemberPool>>,
    pools: HashMap<Asset, PoolState>,
    actions: Vec<Action>,
    prices: HashMap<(Asset, TimeSecs), PriceSample>,
    price_requests: Arc<AtomicUsize>,
    action_requests: Arc<AtomicUsize>,
}

impl MockDataSource {
    /// Create a new mock data source with empty data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member's pool entry under `address`.
    pub fn with_member(mut self, address: Address, member: MemberPool) -> Self {
        self.members.entry(address).or_default().push(member);
        self
    }

    /// Set the current state of a pool.
    pub fn with_pool(mut self, pool: Asset, state: PoolState) -> Self {
        self.pools.insert(pool, state);
        self
    }

    /// Add an action to the mock data source.
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Add multiple actions to the mock data source.
    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Add a price sample for `pool`.
    pub fn with_price(mut self, pool: Asset, sample: PriceSample) -> Self {
        self.prices.insert((pool, sample.at), sample);
        self
    }

    /// Number of price samples requested so far.
    pub fn price_requests(&self) -> usize {
        self.price_requests.load(Ordering::SeqCst)
    }

    /// Number of action pages requested so far.
    pub fn action_requests(&self) -> usize {
        self.action_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch_member(&self, address: &Address) -> Result<Vec<MemberPool>, DataSourceError> {
        self.members
            .get(address)
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound(format!("member {}", address)))
    }

    async fn fetch_pool(&self, pool: &Asset) -> Result<PoolState, DataSourceError> {
        self.pools
            .get(pool)
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound(format!("pool {}", pool)))
    }

    async fn fetch_actions(
        &self,
        _addresses: &[Address],
        limit: usize,
        offset: usize,
    ) -> Result<ActionsPage, DataSourceError> {
        self.action_requests.fetch_add(1, Ordering::SeqCst);
        Ok(ActionsPage {
            actions: self.actions.iter().skip(offset).take(limit).cloned().collect(),
            count: self.actions.len(),
        })
    }

    async fn fetch_price_sample(
        &self,
        pool: &Asset,
        at: TimeSecs,
    ) -> Result<PriceSample, DataSourceError> {
        self.price_requests.fetch_add(1, Ordering::SeqCst);
        self.prices
            .get(&(pool.clone(), at))
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound(format!("depth history {} at {}", pool, at)))
    }
}
