//! Execution reports and output sinks
//!
//! Every processed command yields a `PassReport`: the final state of each
//! order the command touched plus the trades it produced. Reports fan out
//! to registered sinks; orders and trades also go to the store.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use types::ids::PairId;
use types::order::LimitOrder;
use types::trade::Trade;

/// Outcome of one processed command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassReport {
    /// Final state of every order the command touched, each exactly once
    pub orders: Vec<LimitOrder>,
    pub trades: Vec<Trade>,
}

/// Point-in-time view of one book's top levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub pair_id: PairId,
    pub timestamp: i64,
    pub bids: Vec<LimitOrder>,
    pub asks: Vec<LimitOrder>,
}

/// Downstream consumer of execution reports
pub trait ReportSink: Send + Sync {
    fn append(&self, report: &PassReport);
    fn publish_book(&self, snapshot: &BookSnapshot);
}

/// Durable order and trade storage
pub trait OrderStore: Send + Sync {
    fn save_orders(&self, orders: &[LimitOrder]);
    fn save_trades(&self, trades: &[Trade]);
}

/// In-memory sink, used in tests and as a default wiring
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<PassReport>>,
    snapshots: Mutex<Vec<BookSnapshot>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<PassReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn snapshots(&self) -> Vec<BookSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }
}

impl ReportSink for MemorySink {
    fn append(&self, report: &PassReport) {
        self.reports.lock().unwrap().push(report.clone());
    }

    fn publish_book(&self, snapshot: &BookSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot.clone());
    }
}

/// In-memory store, used in tests and as a default wiring
#[derive(Debug, Default)]
pub struct MemoryStore {
    orders: Mutex<Vec<LimitOrder>>,
    trades: Mutex<Vec<Trade>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> Vec<LimitOrder> {
        self.orders.lock().unwrap().clone()
    }

    pub fn trades(&self) -> Vec<Trade> {
        self.trades.lock().unwrap().clone()
    }
}

impl OrderStore for MemoryStore {
    fn save_orders(&self, orders: &[LimitOrder]) {
        self.orders.lock().unwrap().extend_from_slice(orders);
    }

    fn save_trades(&self, trades: &[Trade]) {
        self.trades.lock().unwrap().extend_from_slice(trades);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects_reports() {
        let sink = MemorySink::new();
        sink.append(&PassReport::default());
        sink.append(&PassReport::default());
        assert_eq!(sink.reports().len(), 2);
    }

    #[test]
    fn test_memory_store_accumulates() {
        let store = MemoryStore::new();
        store.save_orders(&[]);
        store.save_trades(&[]);
        assert!(store.orders().is_empty());
        assert!(store.trades().is_empty());
    }
}
