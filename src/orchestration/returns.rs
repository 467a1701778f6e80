use crate::config::Config;
use crate::datasource::{DataSource, DataSourceError};
use crate::domain::{
    Action, ActionType, Address, Asset, MemberPool, PoolReturnSummary, PoolState, PriceSample,
    PriceSeries, TimeSecs,
};
use crate::engine::{self, ComputationError};
use futures::future::try_join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Inputs gathered for one computation together with its result.
#[derive(Debug, Clone)]
pub struct PoolReturns {
    pub address: Address,
    pub member: MemberPool,
    pub pool_state: PoolState,
    pub actions_fetched: usize,
    pub price_samples: usize,
    pub summary: PoolReturnSummary,
}

/// Fetches everything a return computation needs, then runs the engine.
#[derive(Clone)]
pub struct ReturnsOrchestrator {
    datasource: Arc<dyn DataSource>,
    config: Config,
}

impl ReturnsOrchestrator {
    pub fn new(datasource: Arc<dyn DataSource>, config: Config) -> Self {
        Self { datasource, config }
    }

    /// Compute the returns of `address`'s position in `pool`.
    ///
    /// All fetching completes before the engine runs; the engine sees fully
    /// materialized inputs only.
    pub async fn pool_returns(
        &self,
        address: &Address,
        pool: &Asset,
    ) -> Result<PoolReturns, OrchestrationError> {
        let (members, pool_state) = tokio::try_join!(
            self.datasource.fetch_member(address),
            self.datasource.fetch_pool(pool),
        )
        .map_err(|e| match e {
            DataSourceError::NotFound(_) => OrchestrationError::PositionNotFound {
                address: address.clone(),
                pool: pool.clone(),
            },
            other => OrchestrationError::DataSource(other),
        })?;

        let member = members
            .into_iter()
            .find(|m| m.pool() == pool)
            .ok_or_else(|| OrchestrationError::PositionNotFound {
                address: address.clone(),
                pool: pool.clone(),
            })?;

        let addresses = member.action_addresses(address);
        let actions = self.fetch_all_actions(&addresses).await?;
        let (price_in_rune, price_in_usd, price_samples) =
            self.fetch_prices(pool, &actions).await?;

        let summary = engine::compute(
            &member.position,
            &pool_state,
            &actions,
            &price_in_rune,
            &price_in_usd,
        )?;

        info!(
            address = %address,
            pool = %pool,
            actions = actions.len(),
            price_samples,
            "Computed LP returns"
        );
        if differs_from_ledger(&summary, &member) {
            debug!(
                "Totals differ from member record for {} in {}: added rune {} vs {}, \
                 added asset {} vs {}, withdrawn rune {} vs {}, withdrawn asset {} vs {}",
                address,
                pool,
                summary.added_rune,
                member.rune_added,
                summary.added_asset,
                member.asset_added,
                summary.withdrawn_rune,
                member.rune_withdrawn,
                summary.withdrawn_asset,
                member.asset_withdrawn
            );
        }

        Ok(PoolReturns {
            address: address.clone(),
            member,
            pool_state,
            actions_fetched: actions.len(),
            price_samples,
            summary,
        })
    }

    /// Fetch the first page, then every remaining page concurrently.
    async fn fetch_all_actions(
        &self,
        addresses: &[Address],
    ) -> Result<Vec<Action>, DataSourceError> {
        let limit = self.config.actions_page_limit;
        let first = self.datasource.fetch_actions(addresses, limit, 0).await?;
        let pages = page_count(first.count, limit);
        debug!("Fetching {} action pages of {} ({} actions)", pages, limit, first.count);

        let rest = try_join_all(
            (1..pages).map(|page| self.datasource.fetch_actions(addresses, limit, page * limit)),
        )
        .await?;

        let mut actions = first.actions;
        for page in rest {
            actions.extend(page.actions);
        }
        Ok(actions)
    }

    /// Fetch one price sample per distinct second among the actions the engine
    /// will value.
    ///
    /// A sample the source does not have is skipped with a warning so that the
    /// engine reports it against the affected action.
    async fn fetch_prices(
        &self,
        pool: &Asset,
        actions: &[Action],
    ) -> Result<(PriceSeries, PriceSeries, usize), DataSourceError> {
        let seconds: BTreeSet<TimeSecs> = actions
            .iter()
            .filter(|a| {
                a.is_success()
                    && a.touches_only(pool) == Some(true)
                    && !matches!(a.action_type, ActionType::Other(_))
            })
            .map(|a| a.date.to_secs())
            .collect();

        let samples: Vec<Option<PriceSample>> = stream::iter(seconds)
            .map(|at| async move {
                match self.datasource.fetch_price_sample(pool, at).await {
                    Ok(sample) => {
                        if sample.at != at {
                            debug!(
                                "Depth history for {} at {} reported start {}",
                                pool, at, sample.at
                            );
                        }
                        // Keyed by the requested second.
                        Ok(Some(PriceSample { at, ..sample }))
                    }
                    Err(DataSourceError::NotFound(what)) => {
                        warn!("No price sample for {} at {}: {}", pool, at, what);
                        Ok(None)
                    }
                    Err(e) => Err(e),
                }
            })
            .buffer_unordered(self.config.price_fetch_concurrency)
            .try_collect()
            .await?;

        let samples: Vec<PriceSample> = samples.into_iter().flatten().collect();
        let (in_rune, in_usd) = PriceSeries::from_samples(&samples);
        Ok((in_rune, in_usd, samples.len()))
    }
}

/// True when the computed flows disagree with Midgard's own member ledger.
pub fn differs_from_ledger(summary: &PoolReturnSummary, member: &MemberPool) -> bool {
    summary.added_rune != member.rune_added
        || summary.added_asset != member.asset_added
        || summary.withdrawn_rune != member.rune_withdrawn
        || summary.withdrawn_asset != member.asset_withdrawn
}

/// Number of pages needed to list `count` items, `limit` per page.
pub fn page_count(count: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    count.div_ceil(limit)
}

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    #[error(transparent)]
    Computation(#[from] ComputationError),
    #[error("No position in {pool} for {address}")]
    PositionNotFound { address: Address, pool: Asset },
}
