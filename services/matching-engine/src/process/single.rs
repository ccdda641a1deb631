//! Single limit order processor

use types::errors::EngineError;
use types::ids::OrderId;
use types::numeric::round_half_up;
use types::order::{LimitOrder, OrderStatus};

use crate::book::OrderBookRegistry;
use crate::command::PlaceOrder;
use crate::config::EngineConfig;
use crate::ledger::BalanceLedger;
use crate::matching::{self, MatchContext};
use crate::reference::InstrumentDirectory;
use crate::report::PassReport;

/// Process one limit order: validate, match, rest or reject the residual
///
/// The report holds the final state of the incoming order, every maker it
/// touched, and the trades produced.
#[allow(clippy::too_many_arguments)]
pub fn process(
    cmd: PlaceOrder,
    registry: &mut OrderBookRegistry,
    ledger: &mut BalanceLedger,
    directory: &InstrumentDirectory,
    config: &EngineConfig,
    sequence: &mut u64,
    now: i64,
) -> Result<PassReport, EngineError> {
    let ctx = MatchContext::resolve(directory, &cmd.pair_id)?;

    let id = cmd.id.unwrap_or_else(OrderId::generate);
    let price = round_half_up(cmd.price, ctx.pair.price_accuracy);
    let volume = round_half_up(cmd.volume, ctx.pair.volume_accuracy);
    let mut order = LimitOrder::new(id, cmd.pair_id, cmd.client_id, price, volume, now);

    tracing::debug!(order_id = %order.id, client = %order.client_id, %price, %volume, "processing limit order");

    if order.abs_remaining() < ctx.pair.min_tradable_volume() {
        order.reject(OrderStatus::Dust, now);
        return Ok(PassReport {
            orders: vec![order],
            trades: vec![],
        });
    }

    if !config.is_trusted(&order.client_id) {
        if let Err(err) = matching::check_funds(ledger, &order, &ctx) {
            tracing::warn!(order_id = %order.id, %err, "order rejected");
            order.reject(OrderStatus::NotEnoughFunds, now);
            return Ok(PassReport {
                orders: vec![order],
                trades: vec![],
            });
        }
    }

    let book = registry.book_mut(&ctx.pair.id);
    let outcome = matching::match_taker(&mut order, book, ledger, &ctx, config, sequence, now);
    let touched = matching::touched_records(&outcome, book);
    for removed in &outcome.removed {
        registry.unindex(&removed.id);
    }

    let order = matching::dispose_residual(order, registry, ledger, &ctx, config, now);

    // Taker first, then makers in the order they were matched
    let mut orders = vec![order];
    orders.extend(outcome.removed);
    orders.extend(touched);

    Ok(PassReport {
        orders,
        trades: outcome.trades,
    })
}
