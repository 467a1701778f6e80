//! Historical price samples keyed by second-resolution timestamp.

use crate::domain::{Decimal, TimeSecs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One depth-history observation of a pool's prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSample {
    pub at: TimeSecs,
    /// Paired-asset price in base-asset units.
    pub asset_price: Decimal,
    /// Paired-asset price in fiat.
    #[serde(rename = "assetPriceUSD")]
    pub asset_price_usd: Decimal,
}

/// Sparse series of prices, one entry per sampled second.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSeries(BTreeMap<TimeSecs, Decimal>);

impl PriceSeries {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, at: TimeSecs, price: Decimal) {
        self.0.insert(at, price);
    }

    pub fn with(mut self, at: TimeSecs, price: Decimal) -> Self {
        self.insert(at, price);
        self
    }

    /// Exact-second lookup; no interpolation between samples.
    pub fn get(&self, at: TimeSecs) -> Option<Decimal> {
        self.0.get(&at).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split samples into the base-asset and fiat series.
    pub fn from_samples<'a, I>(samples: I) -> (PriceSeries, PriceSeries)
    where
        I: IntoIterator<Item = &'a PriceSample>,
    {
        let mut in_rune = PriceSeries::new();
        let mut in_usd = PriceSeries::new();
        for sample in samples {
            in_rune.insert(sample.at, sample.asset_price);
            in_usd.insert(sample.at, sample.asset_price_usd);
        }
        (in_rune, in_usd)
    }
}

impl FromIterator<(TimeSecs, Decimal)> for PriceSeries {
    fn from_iter<T: IntoIterator<Item = (TimeSecs, Decimal)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_exact_second() {
        let series = PriceSeries::new().with(TimeSecs::new(100), Decimal::from(20));
        assert_eq!(series.get(TimeSecs::new(100)), Some(Decimal::from(20)));
        assert_eq!(series.get(TimeSecs::new(101)), None);
        assert_eq!(series.get(TimeSecs::new(99)), None);
    }

    #[test]
    fn test_from_samples_splits_denominations() {
        let samples = vec![
            PriceSample {
                at: TimeSecs::new(1),
                asset_price: Decimal::from(20),
                asset_price_usd: Decimal::from(40_000),
            },
            PriceSample {
                at: TimeSecs::new(2),
                asset_price: Decimal::from(25),
                asset_price_usd: Decimal::from(45_000),
            },
        ];
        let (in_rune, in_usd) = PriceSeries::from_samples(&samples);
        assert_eq!(in_rune.len(), 2);
        assert_eq!(in_rune.get(TimeSecs::new(2)), Some(Decimal::from(25)));
        assert_eq!(in_usd.get(TimeSecs::new(1)), Some(Decimal::from(40_000)));
    }
}
