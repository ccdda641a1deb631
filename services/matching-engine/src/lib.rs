//! Spot limit-order matching engine
//!
//! Receives limit order commands, matches them against per-instrument
//! order books under price-time priority, moves client balances, and
//! emits execution reports.
//!
//! # Architecture
//! - `reference`: instrument and asset lookup
//! - `ledger`: client balances and reservations
//! - `book`: per-instrument order books and the cross-book registry
//! - `matching`: the core crossing loop
//! - `process`: command processors (single, multi, cancel)
//! - `report`: execution reports, sinks, and the order/trade store
//! - `engine`: the facade tying everything together

pub mod book;
pub mod command;
pub mod config;
pub mod engine;
pub mod ledger;
pub mod matching;
pub mod process;
pub mod reference;
pub mod report;

pub use command::{CancelOrder, Command, PlaceMultiOrder, PlaceOrder, VolumePrice};
pub use config::EngineConfig;
pub use engine::MatchingEngine;
pub use report::PassReport;
