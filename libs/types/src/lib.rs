//! Types library for the spot matching core
//!
//! This library provides all core type definitions shared by the matching
//! engine, ensuring type safety and deterministic decimal behavior.
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, TradeId, ClientId, AssetId, PairId)
//! - `numeric`: Decimal rounding helpers
//! - `asset`: Asset and asset-pair reference data
//! - `order`: Limit order lifecycle types
//! - `trade`: Trade execution types
//! - `wallet`: Per-asset balance and reservation types
//! - `errors`: Error taxonomy

// Public modules
pub mod asset;
pub mod errors;
pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod wallet;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::asset::*;
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
    pub use crate::wallet::*;
}
