//! Cancel order processor

use types::errors::EngineError;

use crate::book::OrderBookRegistry;
use crate::command::CancelOrder;
use crate::ledger::BalanceLedger;
use crate::matching::{self, MatchContext};
use crate::reference::InstrumentDirectory;
use crate::report::PassReport;

/// Cancel a resting order, releasing whatever reservation backs it
///
/// Cancelling an unknown or already-removed order is a no-op with an
/// empty report, so retried cancels are safe.
pub fn process(
    cmd: CancelOrder,
    registry: &mut OrderBookRegistry,
    ledger: &mut BalanceLedger,
    directory: &InstrumentDirectory,
    now: i64,
) -> Result<PassReport, EngineError> {
    let Some(resting) = registry.find(&cmd.order_id) else {
        tracing::warn!(order_id = %cmd.order_id, "cancel target not found");
        return Ok(PassReport::default());
    };

    // Resolve before detaching: an unknown pair leaves the order and its
    // reservation untouched.
    let ctx = MatchContext::resolve(directory, &resting.pair_id)?;
    let mut order = registry
        .remove_order(&cmd.order_id)
        .unwrap_or_else(|| unreachable!("indexed order is in its book"));
    matching::release_reservation(&mut order, ledger, &ctx);
    order.cancel(now);

    tracing::debug!(order_id = %order.id, client = %order.client_id, "order cancelled");

    Ok(PassReport {
        orders: vec![order],
        trades: vec![],
    })
}
