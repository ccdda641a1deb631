//! Engine facade
//!
//! Owns the books, the ledger, the reference data, and the trade sequence.
//! Commands are processed strictly one at a time; each pass produces a
//! report that is persisted and fanned out to the registered sinks along
//! with a fresh snapshot of the affected book.

use std::sync::Arc;

use types::errors::EngineError;
use types::ids::PairId;

use crate::book::{OrderBook, OrderBookRegistry};
use crate::command::Command;
use crate::config::EngineConfig;
use crate::ledger::BalanceLedger;
use crate::process;
use crate::reference::InstrumentDirectory;
use crate::report::{BookSnapshot, MemoryStore, OrderStore, PassReport, ReportSink};

/// Book levels included in published snapshots
const SNAPSHOT_DEPTH: usize = 100;

pub struct MatchingEngine {
    registry: OrderBookRegistry,
    ledger: BalanceLedger,
    directory: InstrumentDirectory,
    config: EngineConfig,
    sequence: u64,
    sinks: Vec<Arc<dyn ReportSink>>,
    store: Arc<dyn OrderStore>,
}

impl MatchingEngine {
    pub fn new(directory: InstrumentDirectory, config: EngineConfig, starting_sequence: u64) -> Self {
        Self {
            registry: OrderBookRegistry::new(),
            ledger: BalanceLedger::new(),
            directory,
            config,
            sequence: starting_sequence,
            sinks: Vec::new(),
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn OrderStore>) -> Self {
        self.store = store;
        self
    }

    pub fn add_sink(&mut self, sink: Arc<dyn ReportSink>) {
        self.sinks.push(sink);
    }

    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    /// Mutable ledger access for deposits and balance administration
    pub fn ledger_mut(&mut self) -> &mut BalanceLedger {
        &mut self.ledger
    }

    pub fn book(&self, pair_id: &PairId) -> Option<&OrderBook> {
        self.registry.book(pair_id)
    }

    /// Swap in a new reference data snapshot
    pub fn replace_reference(&mut self, directory: InstrumentDirectory) {
        self.directory = directory;
    }

    pub fn book_snapshot(&self, pair_id: &PairId, timestamp: i64) -> BookSnapshot {
        use types::order::Side;
        let (bids, asks) = match self.registry.book(pair_id) {
            Some(book) => (
                book.depth(Side::Buy, SNAPSHOT_DEPTH),
                book.depth(Side::Sell, SNAPSHOT_DEPTH),
            ),
            None => (vec![], vec![]),
        };
        BookSnapshot {
            pair_id: pair_id.clone(),
            timestamp,
            bids,
            asks,
        }
    }

    /// Process one command at the given wall-clock time (Unix nanos)
    pub fn process(&mut self, command: Command, now: i64) -> Result<PassReport, EngineError> {
        let (report, pair_id) = match command {
            Command::PlaceOrder(cmd) => {
                let pair_id = cmd.pair_id.clone();
                let report = process::single::process(
                    cmd,
                    &mut self.registry,
                    &mut self.ledger,
                    &self.directory,
                    &self.config,
                    &mut self.sequence,
                    now,
                )?;
                (report, Some(pair_id))
            }
            Command::PlaceMultiOrder(cmd) => {
                let pair_id = cmd.pair_id.clone();
                let report = process::multi::process(
                    cmd,
                    &mut self.registry,
                    &mut self.ledger,
                    &self.directory,
                    &self.config,
                    &mut self.sequence,
                    now,
                )?;
                (report, Some(pair_id))
            }
            Command::CancelOrder(cmd) => {
                let report = process::cancel::process(
                    cmd,
                    &mut self.registry,
                    &mut self.ledger,
                    &self.directory,
                    now,
                )?;
                let pair_id = report.orders.first().map(|o| o.pair_id.clone());
                (report, pair_id)
            }
        };

        tracing::info!(
            orders = report.orders.len(),
            trades = report.trades.len(),
            "pass complete"
        );

        self.store.save_orders(&report.orders);
        self.store.save_trades(&report.trades);

        for sink in &self.sinks {
            sink.append(&report);
        }
        if let Some(pair_id) = pair_id {
            let snapshot = self.book_snapshot(&pair_id, now);
            for sink in &self.sinks {
                sink.publish_book(&snapshot);
            }
        }

        Ok(report)
    }
}
