//! Error taxonomy for the matching core

use crate::ids::{AssetId, ClientId, PairId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Balance ledger errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("insufficient funds for {client}/{asset}: required {required}, available {available}")]
    InsufficientFunds {
        client: ClientId,
        asset: AssetId,
        required: Decimal,
        available: Decimal,
    },
}

/// Reference data lookup errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceError {
    #[error("unknown asset: {0}")]
    UnknownAsset(AssetId),

    #[error("unknown asset pair: {0}")]
    UnknownAssetPair(PairId),
}

/// Top-level engine error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("reference error: {0}")]
    Reference(#[from] ReferenceError),
}
