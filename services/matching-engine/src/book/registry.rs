//! Cross-instrument order book registry
//!
//! Owns one book per instrument plus a global id index so cancels can find
//! an order without knowing its instrument.

use std::collections::HashMap;
use types::ids::{ClientId, OrderId, PairId};
use types::order::LimitOrder;

use super::OrderBook;

#[derive(Debug, Default)]
pub struct OrderBookRegistry {
    books: HashMap<PairId, OrderBook>,
    index: HashMap<OrderId, PairId>,
}

impl OrderBookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book for an instrument, created on first use
    pub fn book_mut(&mut self, pair_id: &PairId) -> &mut OrderBook {
        self.books.entry(pair_id.clone()).or_default()
    }

    pub fn book(&self, pair_id: &PairId) -> Option<&OrderBook> {
        self.books.get(pair_id)
    }

    /// Insert a resting order and index it for cancel lookup
    pub fn insert_order(&mut self, order: LimitOrder) {
        self.index.insert(order.id.clone(), order.pair_id.clone());
        self.book_mut(&order.pair_id.clone()).insert(order);
    }

    /// Remove an order wherever it rests
    pub fn remove_order(&mut self, id: &OrderId) -> Option<LimitOrder> {
        let pair_id = self.index.remove(id)?;
        self.books.get_mut(&pair_id)?.remove(id)
    }

    /// Drop an id from the index after the book entry is already gone
    pub fn unindex(&mut self, id: &OrderId) {
        self.index.remove(id);
    }

    pub fn find(&self, id: &OrderId) -> Option<&LimitOrder> {
        let pair_id = self.index.get(id)?;
        self.books.get(pair_id)?.get(id)
    }

    /// Ids of a client's live orders on one instrument
    pub fn client_orders(&self, pair_id: &PairId, client: &ClientId) -> Vec<OrderId> {
        self.books
            .get(pair_id)
            .map(|b| b.client_orders(client))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn order(id: &str, pair: &str, volume: &str, price: &str) -> LimitOrder {
        LimitOrder::new(
            OrderId::new(id),
            PairId::new(pair),
            ClientId::new("c1"),
            Decimal::from_str(price).unwrap(),
            Decimal::from_str(volume).unwrap(),
            1,
        )
    }

    #[test]
    fn test_insert_and_find_across_books() {
        let mut registry = OrderBookRegistry::new();
        registry.insert_order(order("o1", "EURUSD", "100", "1.2"));
        registry.insert_order(order("o2", "BTCUSD", "-1", "50000"));

        assert_eq!(
            registry.find(&OrderId::new("o2")).unwrap().pair_id,
            PairId::new("BTCUSD")
        );
    }

    #[test]
    fn test_remove_unindexes() {
        let mut registry = OrderBookRegistry::new();
        registry.insert_order(order("o1", "EURUSD", "100", "1.2"));

        let removed = registry.remove_order(&OrderId::new("o1")).unwrap();
        assert_eq!(removed.id, OrderId::new("o1"));
        assert!(registry.remove_order(&OrderId::new("o1")).is_none());
        assert!(registry.find(&OrderId::new("o1")).is_none());
    }

    #[test]
    fn test_client_orders_scoped_to_pair() {
        let mut registry = OrderBookRegistry::new();
        registry.insert_order(order("o1", "EURUSD", "100", "1.2"));
        registry.insert_order(order("o2", "BTCUSD", "1", "50000"));

        let ids = registry.client_orders(&PairId::new("EURUSD"), &ClientId::new("c1"));
        assert_eq!(ids, vec![OrderId::new("o1")]);
    }
}
