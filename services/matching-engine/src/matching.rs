//! Core crossing loop
//!
//! Matches one incoming (taker) order against the opposite side of its
//! book under price-time priority. Every fill executes at the resting
//! (maker) order's price and settles both balance legs immediately.

use rust_decimal::Decimal;
use types::asset::{Asset, AssetPair};
use types::errors::{LedgerError, ReferenceError};
use types::ids::{AssetId, OrderId, PairId};
use types::numeric::{round_half_up, round_up};
use types::order::{LimitOrder, OrderStatus, Side};
use types::trade::Trade;

use crate::book::{OrderBook, OrderBookRegistry};
use crate::config::EngineConfig;
use crate::ledger::BalanceLedger;
use crate::reference::InstrumentDirectory;

/// Resolved reference data for one matching pass
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub pair: &'a AssetPair,
    pub base: &'a Asset,
    pub quote: &'a Asset,
}

impl<'a> MatchContext<'a> {
    pub fn resolve(
        directory: &'a InstrumentDirectory,
        pair_id: &PairId,
    ) -> Result<Self, ReferenceError> {
        let pair = directory.asset_pair(pair_id)?;
        let base = directory.asset(&pair.base_asset_id)?;
        let quote = directory.asset(&pair.quote_asset_id)?;
        Ok(Self { pair, base, quote })
    }
}

/// Whether a taker at `taker_price` crosses a maker at `maker_price`
pub fn crosses(taker_side: Side, taker_price: Decimal, maker_price: Decimal) -> bool {
    match taker_side {
        Side::Buy => maker_price <= taker_price,
        Side::Sell => maker_price >= taker_price,
    }
}

/// Asset and amount a resting order must hold in reserve
///
/// Buys reserve the quote leg at the order's own limit price, rounded up
/// so the reservation covers any execution at or below that price. Sells
/// reserve the base quantity exactly.
pub fn required_reservation(order: &LimitOrder, ctx: &MatchContext) -> (AssetId, Decimal) {
    match order.side() {
        Side::Buy => (
            ctx.pair.quote_asset_id.clone(),
            round_up(order.price * order.abs_remaining(), ctx.quote.accuracy),
        ),
        Side::Sell => (ctx.pair.base_asset_id.clone(), order.abs_remaining()),
    }
}

/// Check the client can cover the order's full remaining volume
pub fn check_funds(
    ledger: &BalanceLedger,
    order: &LimitOrder,
    ctx: &MatchContext,
) -> Result<(), LedgerError> {
    let (asset, required) = required_reservation(order, ctx);
    let available = ledger.available(&order.client_id, &asset);
    if available < required {
        return Err(LedgerError::InsufficientFunds {
            client: order.client_id.clone(),
            asset,
            required,
            available,
        });
    }
    Ok(())
}

/// What one crossing pass did to the book
#[derive(Debug, Default)]
pub struct MatchOutcome {
    pub trades: Vec<Trade>,
    /// Makers partially filled and still resting
    pub touched: Vec<OrderId>,
    /// Makers fully consumed and removed from the book
    pub removed: Vec<LimitOrder>,
}

/// Match `taker` against the opposite side of `book` until its price no
/// longer crosses or its volume is exhausted
///
/// Settles every fill as it happens. Maker reservations are recomputed
/// from the remaining volume after each fill; the difference is released
/// as part of settlement.
pub fn match_taker(
    taker: &mut LimitOrder,
    book: &mut OrderBook,
    ledger: &mut BalanceLedger,
    ctx: &MatchContext,
    config: &EngineConfig,
    sequence: &mut u64,
    now: i64,
) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();
    let taker_side = taker.side();
    let maker_side = taker_side.opposite();

    while taker.abs_remaining() > Decimal::ZERO {
        let Some(best) = book.best_price(maker_side) else {
            break;
        };
        if !crosses(taker_side, taker.price, best) {
            break;
        }

        let maker = book
            .front_mut(maker_side)
            .unwrap_or_else(|| unreachable!("non-empty level has a front order"));
        let fill = taker.abs_remaining().min(maker.abs_remaining());
        let price = maker.price;
        let quote_amount = round_half_up(price * fill, ctx.quote.accuracy);

        let old_reserved = maker.reserved_volume;
        maker.apply_fill(fill, now);
        let new_reserved = if config.is_trusted(&maker.client_id)
            || maker.status == OrderStatus::Matched
        {
            Decimal::ZERO
        } else {
            required_reservation(maker, ctx).1
        };
        maker.reserved_volume = new_reserved;
        let maker_decrement = (old_reserved - new_reserved).max(Decimal::ZERO);

        let maker_id = maker.id.clone();
        let maker_client = maker.client_id.clone();
        let maker_done = maker.status == OrderStatus::Matched;
        let maker_is_buy = maker.is_buy();

        tracing::debug!(taker = %taker.id, maker = %maker_id, %price, %fill, "fill");

        taker.apply_fill(fill, now);

        let (buyer, seller, buy_id, sell_id, buyer_dec, seller_dec) = if maker_is_buy {
            (
                maker_client,
                taker.client_id.clone(),
                maker_id.clone(),
                taker.id.clone(),
                maker_decrement,
                Decimal::ZERO,
            )
        } else {
            (
                taker.client_id.clone(),
                maker_client,
                taker.id.clone(),
                maker_id.clone(),
                Decimal::ZERO,
                maker_decrement,
            )
        };

        ledger.settle(
            &buyer,
            &seller,
            &ctx.pair.base_asset_id,
            &ctx.pair.quote_asset_id,
            fill,
            quote_amount,
            buyer_dec,
            seller_dec,
        );

        *sequence += 1;
        outcome.trades.push(Trade::new(
            *sequence,
            ctx.pair.id.clone(),
            buy_id,
            sell_id,
            buyer,
            seller,
            price,
            fill,
            quote_amount,
            now,
        ));

        if maker_done {
            let removed = book
                .pop_front(maker_side)
                .unwrap_or_else(|| unreachable!("matched maker is at the front"));
            outcome.removed.push(removed);
        } else {
            outcome.touched.push(maker_id);
        }
    }

    outcome
}

/// Put the taker's residual to rest, reject it as dust, or reject it for
/// lack of funds
///
/// Fully matched takers are left as-is. Residuals below the instrument's
/// minimum tradable volume become `Dust`. Otherwise the residual is
/// reserved (unless the client is trusted) and inserted into the book,
/// keeping `Processing` when fills already happened.
pub fn dispose_residual(
    mut taker: LimitOrder,
    registry: &mut OrderBookRegistry,
    ledger: &mut BalanceLedger,
    ctx: &MatchContext,
    config: &EngineConfig,
    now: i64,
) -> LimitOrder {
    if taker.status == OrderStatus::Matched {
        return taker;
    }

    if taker.abs_remaining() < ctx.pair.min_tradable_volume() {
        taker.reject(OrderStatus::Dust, now);
        return taker;
    }

    if !config.is_trusted(&taker.client_id) {
        let (asset, amount) = required_reservation(&taker, ctx);
        if let Err(err) = ledger.reserve(&taker.client_id, &asset, amount) {
            tracing::warn!(order_id = %taker.id, %err, "residual reservation failed");
            taker.reject(OrderStatus::NotEnoughFunds, now);
            return taker;
        }
        taker.reserved_volume = amount;
    }

    registry.insert_order(taker.clone());
    taker
}

/// Release whatever reservation still backs an order
pub fn release_reservation(order: &mut LimitOrder, ledger: &mut BalanceLedger, ctx: &MatchContext) {
    if order.reserved_volume > Decimal::ZERO {
        let asset = match order.side() {
            Side::Buy => &ctx.pair.quote_asset_id,
            Side::Sell => &ctx.pair.base_asset_id,
        };
        ledger.release(&order.client_id, asset, order.reserved_volume);
        order.reserved_volume = Decimal::ZERO;
    }
}

/// Current book state of the makers a pass partially filled
pub fn touched_records(outcome: &MatchOutcome, book: &OrderBook) -> Vec<LimitOrder> {
    outcome
        .touched
        .iter()
        .filter_map(|id| book.get(id).cloned())
        .collect()
}
