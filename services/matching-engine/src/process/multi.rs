//! Multi-order batch processor
//!
//! A batch is one client's set of orders on one instrument, optionally
//! replacing that client's previous orders there. Orders match
//! sequentially in submission order against the live book, so later
//! batch orders can trade against earlier ones that came to rest.

use std::collections::{HashMap, HashSet};
use types::errors::EngineError;
use types::ids::OrderId;
use types::numeric::round_half_up;
use types::order::{LimitOrder, OrderStatus};

use crate::book::OrderBookRegistry;
use crate::command::PlaceMultiOrder;
use crate::config::EngineConfig;
use crate::ledger::BalanceLedger;
use crate::matching::{self, MatchContext};
use crate::reference::InstrumentDirectory;
use crate::report::PassReport;

/// Process a batch of limit orders for one client
///
/// The report holds the orders cancelled by the replace phase (when
/// configured), the final state of every submitted order, and every
/// pre-existing maker the batch filled, each exactly once.
#[allow(clippy::too_many_arguments)]
pub fn process(
    cmd: PlaceMultiOrder,
    registry: &mut OrderBookRegistry,
    ledger: &mut BalanceLedger,
    directory: &InstrumentDirectory,
    config: &EngineConfig,
    sequence: &mut u64,
    now: i64,
) -> Result<PassReport, EngineError> {
    let ctx = MatchContext::resolve(directory, &cmd.pair_id)?;

    tracing::debug!(
        client = %cmd.client_id,
        pair = %cmd.pair_id,
        count = cmd.orders.len(),
        cancel_previous = cmd.cancel_previous,
        "processing multi order"
    );

    let mut cancelled = Vec::new();
    if cmd.cancel_previous {
        for id in registry.client_orders(&cmd.pair_id, &cmd.client_id) {
            if let Some(mut order) = registry.remove_order(&id) {
                matching::release_reservation(&mut order, ledger, &ctx);
                order.cancel(now);
                cancelled.push(order);
            }
        }
    }

    let mut trades = Vec::new();
    let mut submitted_ids = Vec::new();
    let mut dispositions: HashMap<OrderId, LimitOrder> = HashMap::new();
    let mut removed_map: HashMap<OrderId, LimitOrder> = HashMap::new();
    // Maker ids in the order they were first filled
    let mut maker_sequence: Vec<OrderId> = Vec::new();
    let mut maker_seen: HashSet<OrderId> = HashSet::new();

    for entry in cmd.orders {
        let id = OrderId::generate();
        let price = round_half_up(entry.price, ctx.pair.price_accuracy);
        let volume = round_half_up(entry.volume, ctx.pair.volume_accuracy);
        let mut order = LimitOrder::new(
            id.clone(),
            cmd.pair_id.clone(),
            cmd.client_id.clone(),
            price,
            volume,
            now,
        );
        submitted_ids.push(id.clone());

        if order.abs_remaining() < ctx.pair.min_tradable_volume() {
            order.reject(OrderStatus::Dust, now);
            dispositions.insert(id, order);
            continue;
        }

        if !config.is_trusted(&order.client_id) {
            if let Err(err) = matching::check_funds(ledger, &order, &ctx) {
                tracing::warn!(order_id = %order.id, %err, "batch order rejected");
                order.reject(OrderStatus::NotEnoughFunds, now);
                dispositions.insert(id, order);
                continue;
            }
        }

        let book = registry.book_mut(&ctx.pair.id);
        let outcome = matching::match_taker(&mut order, book, ledger, &ctx, config, sequence, now);
        for removed in outcome.removed {
            registry.unindex(&removed.id);
            if maker_seen.insert(removed.id.clone()) {
                maker_sequence.push(removed.id.clone());
            }
            removed_map.insert(removed.id.clone(), removed);
        }
        for id in outcome.touched {
            if maker_seen.insert(id.clone()) {
                maker_sequence.push(id);
            }
        }
        trades.extend(outcome.trades);

        let order = matching::dispose_residual(order, registry, ledger, &ctx, config, now);
        dispositions.insert(id, order);
    }

    let mut orders = Vec::new();
    if config.report_cancelled_in_batch {
        orders.extend(cancelled);
    }

    // Submitted orders report their end-of-batch state: a later order in
    // the batch may have filled an earlier one that came to rest.
    let book = registry.book(&cmd.pair_id);
    for id in &submitted_ids {
        let record = book
            .and_then(|b| b.get(id))
            .cloned()
            .or_else(|| removed_map.get(id).cloned())
            .or_else(|| dispositions.get(id).cloned());
        if let Some(order) = record {
            orders.push(order);
        }
    }

    // Pre-existing makers follow, in the order the batch filled them,
    // each carrying its end-of-batch state.
    let submitted: HashSet<&OrderId> = submitted_ids.iter().collect();
    for id in &maker_sequence {
        if submitted.contains(id) {
            continue;
        }
        let record = book
            .and_then(|b| b.get(id))
            .cloned()
            .or_else(|| removed_map.get(id).cloned());
        if let Some(order) = record {
            orders.push(order);
        }
    }

    Ok(PassReport { orders, trades })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::VolumePrice;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use types::asset::{Asset, AssetPair};
    use types::ids::{AssetId, ClientId, PairId};

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn directory() -> InstrumentDirectory {
        let mut dir = InstrumentDirectory::new();
        dir.insert_asset(Asset::new("EUR", 2));
        dir.insert_asset(Asset::new("USD", 2));
        dir.insert_pair(AssetPair::new("EURUSD", "EUR", "USD", 5, 5));
        dir
    }

    fn batch(client: &str, orders: &[(&str, &str)], cancel_previous: bool) -> PlaceMultiOrder {
        PlaceMultiOrder {
            client_id: ClientId::new(client),
            pair_id: PairId::new("EURUSD"),
            orders: orders
                .iter()
                .map(|(v, p)| VolumePrice {
                    volume: d(v),
                    price: d(p),
                })
                .collect(),
            cancel_previous,
        }
    }

    #[test]
    fn test_batch_rests_and_reserves_per_order() {
        let dir = directory();
        let mut registry = OrderBookRegistry::new();
        let mut ledger = BalanceLedger::new();
        let config = EngineConfig::default();
        let mut seq = 0u64;
        ledger.deposit(&ClientId::new("c1"), &AssetId::new("USD"), d("1000"));

        let report = process(
            batch("c1", &[("100", "1.2"), ("100", "1.3")], false),
            &mut registry,
            &mut ledger,
            &dir,
            &config,
            &mut seq,
            1,
        )
        .unwrap();

        assert_eq!(report.orders.len(), 2);
        assert!(report
            .orders
            .iter()
            .all(|o| o.status == OrderStatus::InOrderBook));
        // 120 + 130 reserved
        assert_eq!(ledger.reserved(&ClientId::new("c1"), &AssetId::new("USD")), d("250"));
        assert_eq!(ledger.available(&ClientId::new("c1"), &AssetId::new("USD")), d("750"));
    }

    #[test]
    fn test_funds_checked_against_running_availability() {
        let dir = directory();
        let mut registry = OrderBookRegistry::new();
        let mut ledger = BalanceLedger::new();
        let config = EngineConfig::default();
        let mut seq = 0u64;
        ledger.deposit(&ClientId::new("c1"), &AssetId::new("USD"), d("200"));

        let report = process(
            batch("c1", &[("100", "1.2"), ("100", "1.3")], false),
            &mut registry,
            &mut ledger,
            &dir,
            &config,
            &mut seq,
            1,
        )
        .unwrap();

        // First order reserved 120, leaving 80 available; second needs 130
        assert_eq!(report.orders[0].status, OrderStatus::InOrderBook);
        assert_eq!(report.orders[1].status, OrderStatus::NotEnoughFunds);
        assert_eq!(ledger.reserved(&ClientId::new("c1"), &AssetId::new("USD")), d("120"));
    }

    #[test]
    fn test_cancel_previous_releases_and_reports() {
        let dir = directory();
        let mut registry = OrderBookRegistry::new();
        let mut ledger = BalanceLedger::new();
        let config = EngineConfig::default();
        let mut seq = 0u64;
        ledger.deposit(&ClientId::new("c1"), &AssetId::new("USD"), d("1000"));

        process(
            batch("c1", &[("100", "1.2")], false),
            &mut registry,
            &mut ledger,
            &dir,
            &config,
            &mut seq,
            1,
        )
        .unwrap();
        assert_eq!(ledger.reserved(&ClientId::new("c1"), &AssetId::new("USD")), d("120"));

        let report = process(
            batch("c1", &[("100", "1.1")], true),
            &mut registry,
            &mut ledger,
            &dir,
            &config,
            &mut seq,
            2,
        )
        .unwrap();

        let cancelled: Vec<_> = report
            .orders
            .iter()
            .filter(|o| o.status == OrderStatus::Cancelled)
            .collect();
        assert_eq!(cancelled.len(), 1);
        // Only the requote's reservation remains
        assert_eq!(ledger.reserved(&ClientId::new("c1"), &AssetId::new("USD")), d("110"));
    }

    #[test]
    fn test_cancel_with_no_previous_orders_is_noop() {
        let dir = directory();
        let mut registry = OrderBookRegistry::new();
        let mut ledger = BalanceLedger::new();
        let config = EngineConfig::default();
        let mut seq = 0u64;
        ledger.deposit(&ClientId::new("c1"), &AssetId::new("USD"), d("1000"));

        let report = process(
            batch("c1", &[("100", "1.2")], true),
            &mut registry,
            &mut ledger,
            &dir,
            &config,
            &mut seq,
            1,
        )
        .unwrap();

        assert_eq!(report.orders.len(), 1);
        assert_eq!(report.orders[0].status, OrderStatus::InOrderBook);
    }

    #[test]
    fn test_cancelled_excluded_when_configured() {
        let dir = directory();
        let mut registry = OrderBookRegistry::new();
        let mut ledger = BalanceLedger::new();
        let config = EngineConfig {
            report_cancelled_in_batch: false,
            ..EngineConfig::default()
        };
        let mut seq = 0u64;
        ledger.deposit(&ClientId::new("c1"), &AssetId::new("USD"), d("1000"));

        process(
            batch("c1", &[("100", "1.2")], false),
            &mut registry,
            &mut ledger,
            &dir,
            &config,
            &mut seq,
            1,
        )
        .unwrap();

        let report = process(
            batch("c1", &[("100", "1.1")], true),
            &mut registry,
            &mut ledger,
            &dir,
            &config,
            &mut seq,
            2,
        )
        .unwrap();

        assert!(report
            .orders
            .iter()
            .all(|o| o.status != OrderStatus::Cancelled));
        assert_eq!(report.orders.len(), 1);
    }

    #[test]
    fn test_batch_matches_resting_orders() {
        let dir = directory();
        let mut registry = OrderBookRegistry::new();
        let mut ledger = BalanceLedger::new();
        let config = EngineConfig::default();
        let mut seq = 0u64;
        ledger.deposit(&ClientId::new("maker"), &AssetId::new("USD"), d("1000"));
        ledger.deposit(&ClientId::new("taker"), &AssetId::new("EUR"), d("1000"));

        process(
            batch("maker", &[("100", "1.3"), ("100", "1.2")], false),
            &mut registry,
            &mut ledger,
            &dir,
            &config,
            &mut seq,
            1,
        )
        .unwrap();

        // Sell 150 at 1.25: fills the 1.3 bid fully, leaves 50 unmatched
        let report = process(
            batch("taker", &[("-150", "1.25")], false),
            &mut registry,
            &mut ledger,
            &dir,
            &config,
            &mut seq,
            2,
        )
        .unwrap();

        assert_eq!(report.trades.len(), 1);
        assert_eq!(report.trades[0].price, d("1.3"));
        assert_eq!(report.trades[0].volume, d("100"));

        let taker_order = report
            .orders
            .iter()
            .find(|o| o.client_id == ClientId::new("taker"))
            .unwrap();
        assert_eq!(taker_order.status, OrderStatus::Processing);
        assert_eq!(taker_order.remaining_volume, d("-50"));

        let maker_order = report
            .orders
            .iter()
            .find(|o| o.client_id == ClientId::new("maker"))
            .unwrap();
        assert_eq!(maker_order.status, OrderStatus::Matched);

        assert_eq!(ledger.balance(&ClientId::new("maker"), &AssetId::new("USD")), d("870"));
        assert_eq!(ledger.balance(&ClientId::new("maker"), &AssetId::new("EUR")), d("100"));
        assert_eq!(ledger.balance(&ClientId::new("taker"), &AssetId::new("USD")), d("130"));
        assert_eq!(ledger.balance(&ClientId::new("taker"), &AssetId::new("EUR")), d("900"));
        // Residual 50 EUR reserved for the resting remainder
        assert_eq!(ledger.reserved(&ClientId::new("taker"), &AssetId::new("EUR")), d("50"));
    }
}
