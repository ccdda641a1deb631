//! Per-instrument order book
//!
//! Two price-keyed maps of FIFO queues, one per side. Best bid is the
//! highest bid price; best ask is the lowest ask price. Within a price
//! level, orders keep arrival order.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, VecDeque};
use types::ids::{ClientId, OrderId};
use types::order::{LimitOrder, Side};

/// A single instrument's resting orders
#[derive(Debug, Default)]
pub struct OrderBook {
    bids: BTreeMap<Decimal, VecDeque<LimitOrder>>,
    asks: BTreeMap<Decimal, VecDeque<LimitOrder>>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn levels(&self, side: Side) -> &BTreeMap<Decimal, VecDeque<LimitOrder>> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn levels_mut(&mut self, side: Side) -> &mut BTreeMap<Decimal, VecDeque<LimitOrder>> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Best price on a side: highest bid or lowest ask
    pub fn best_price(&self, side: Side) -> Option<Decimal> {
        match side {
            Side::Buy => self.bids.keys().next_back().copied(),
            Side::Sell => self.asks.keys().next().copied(),
        }
    }

    /// Mutable access to the order at the front of the best level
    pub fn front_mut(&mut self, side: Side) -> Option<&mut LimitOrder> {
        let price = self.best_price(side)?;
        self.levels_mut(side).get_mut(&price)?.front_mut()
    }

    /// Remove and return the order at the front of the best level,
    /// dropping the level when it empties
    pub fn pop_front(&mut self, side: Side) -> Option<LimitOrder> {
        let price = self.best_price(side)?;
        let levels = self.levels_mut(side);
        let queue = levels.get_mut(&price)?;
        let order = queue.pop_front();
        if queue.is_empty() {
            levels.remove(&price);
        }
        order
    }

    /// Insert an order at the back of its price level
    pub fn insert(&mut self, order: LimitOrder) {
        let side = order.side();
        self.levels_mut(side)
            .entry(order.price)
            .or_default()
            .push_back(order);
    }

    /// Remove an order by id, scanning both sides
    pub fn remove(&mut self, id: &OrderId) -> Option<LimitOrder> {
        for levels in [&mut self.bids, &mut self.asks] {
            let found = levels.iter().find_map(|(price, queue)| {
                queue
                    .iter()
                    .position(|o| &o.id == id)
                    .map(|pos| (*price, pos))
            });
            if let Some((price, pos)) = found {
                let queue = levels.get_mut(&price)?;
                let order = queue.remove(pos);
                if queue.is_empty() {
                    levels.remove(&price);
                }
                return order;
            }
        }
        None
    }

    pub fn get(&self, id: &OrderId) -> Option<&LimitOrder> {
        self.bids
            .values()
            .chain(self.asks.values())
            .flat_map(|q| q.iter())
            .find(|o| &o.id == id)
    }

    /// Iterate one side in priority order (best first)
    pub fn iter(&self, side: Side) -> Box<dyn Iterator<Item = &LimitOrder> + '_> {
        match side {
            Side::Buy => Box::new(self.bids.values().rev().flat_map(|q| q.iter())),
            Side::Sell => Box::new(self.asks.values().flat_map(|q| q.iter())),
        }
    }

    /// Top `n` orders of a side in priority order
    pub fn depth(&self, side: Side, n: usize) -> Vec<LimitOrder> {
        self.iter(side).take(n).cloned().collect()
    }

    /// A client's live orders on this book, both sides
    pub fn client_orders(&self, client: &ClientId) -> Vec<OrderId> {
        self.iter(Side::Buy)
            .chain(self.iter(Side::Sell))
            .filter(|o| &o.client_id == client)
            .map(|o| o.id.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
