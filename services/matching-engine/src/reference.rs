//! Instrument and asset reference data
//!
//! A read-mostly directory of assets and asset pairs. The engine resolves
//! every incoming order against this directory before touching the books;
//! an unknown asset or pair rejects the command without side effects.

use std::collections::HashMap;
use types::asset::{Asset, AssetPair};
use types::errors::ReferenceError;
use types::ids::{AssetId, PairId};

/// Lookup directory for assets and tradable pairs
#[derive(Debug, Clone, Default)]
pub struct InstrumentDirectory {
    assets: HashMap<AssetId, Asset>,
    pairs: HashMap<PairId, AssetPair>,
}

impl InstrumentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_asset(&mut self, asset: Asset) {
        self.assets.insert(asset.id.clone(), asset);
    }

    pub fn insert_pair(&mut self, pair: AssetPair) {
        self.pairs.insert(pair.id.clone(), pair);
    }

    pub fn asset(&self, id: &AssetId) -> Result<&Asset, ReferenceError> {
        self.assets
            .get(id)
            .ok_or_else(|| ReferenceError::UnknownAsset(id.clone()))
    }

    pub fn asset_pair(&self, id: &PairId) -> Result<&AssetPair, ReferenceError> {
        self.pairs
            .get(id)
            .ok_or_else(|| ReferenceError::UnknownAssetPair(id.clone()))
    }

    /// Replace the whole directory contents with a fresh snapshot
    pub fn replace(&mut self, assets: Vec<Asset>, pairs: Vec<AssetPair>) {
        self.assets = assets.into_iter().map(|a| (a.id.clone(), a)).collect();
        self.pairs = pairs.into_iter().map(|p| (p.id.clone(), p)).collect();
    }
}
