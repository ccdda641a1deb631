//! Asset and asset-pair reference data
//!
//! Immutable lookup data: every numeric computation in the engine rounds
//! according to the accuracies defined here.

use crate::ids::{AssetId, PairId};
use crate::numeric;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single asset (currency) with its display accuracy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    /// Decimal places for amounts of this asset
    pub accuracy: u32,
}

impl Asset {
    pub fn new(id: impl Into<AssetId>, accuracy: u32) -> Self {
        Self {
            id: id.into(),
            accuracy,
        }
    }
}

/// A tradable base/quote asset combination (instrument)
///
/// Defines the rounding rules for all computations on that instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPair {
    pub id: PairId,
    pub base_asset_id: AssetId,
    pub quote_asset_id: AssetId,
    /// Decimal places for prices on this instrument
    pub price_accuracy: u32,
    /// Decimal places for volumes on this instrument
    pub volume_accuracy: u32,
    /// Explicit minimum tradable volume; when absent, one volume quantum
    pub min_volume: Option<Decimal>,
}

impl AssetPair {
    pub fn new(
        id: impl Into<PairId>,
        base: impl Into<AssetId>,
        quote: impl Into<AssetId>,
        price_accuracy: u32,
        volume_accuracy: u32,
    ) -> Self {
        Self {
            id: id.into(),
            base_asset_id: base.into(),
            quote_asset_id: quote.into(),
            price_accuracy,
            volume_accuracy,
            min_volume: None,
        }
    }

    pub fn with_min_volume(mut self, min_volume: Decimal) -> Self {
        self.min_volume = Some(min_volume);
        self
    }

    /// Minimum tradable quantity on this instrument
    ///
    /// Residual volumes below this threshold are dust.
    pub fn min_tradable_volume(&self) -> Decimal {
        self.min_volume
            .unwrap_or_else(|| numeric::quantum(self.volume_accuracy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_asset_creation() {
        let usd = Asset::new("USD", 2);
        assert_eq!(usd.id.as_str(), "USD");
        assert_eq!(usd.accuracy, 2);
    }

    #[test]
    fn test_pair_default_min_volume() {
        let pair = AssetPair::new("EURUSD", "EUR", "USD", 5, 5);
        assert_eq!(
            pair.min_tradable_volume(),
            Decimal::from_str("0.00001").unwrap()
        );
    }

    #[test]
    fn test_pair_explicit_min_volume() {
        let min = Decimal::from_str("0.001").unwrap();
        let pair = AssetPair::new("BTCEUR", "BTC", "EUR", 8, 8).with_min_volume(min);
        assert_eq!(pair.min_tradable_volume(), min);
    }

    #[test]
    fn test_pair_serialization() {
        let pair = AssetPair::new("EURUSD", "EUR", "USD", 5, 5);
        let json = serde_json::to_string(&pair).unwrap();
        let deserialized: AssetPair = serde_json::from_str(&json).unwrap();
        assert_eq!(pair, deserialized);
    }
}
