//! Trade execution types
//!
//! One trade per matched pair per fill event; an incoming order crossing
//! three resting orders produces three trades. Immutable once created.

use crate::ids::{ClientId, OrderId, PairId, TradeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An executed fill between a buy and a sell order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    /// Global monotonic sequence
    pub sequence: u64,
    pub pair_id: PairId,

    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buy_client_id: ClientId,
    pub sell_client_id: ClientId,

    /// Execution price (the resting order's price)
    pub price: Decimal,
    /// Executed base volume, always positive
    pub volume: Decimal,
    /// Quote leg exchanged for `volume`, rounded to the quote asset accuracy
    pub quote_volume: Decimal,

    pub executed_at: i64, // Unix nanos
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        pair_id: PairId,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        buy_client_id: ClientId,
        sell_client_id: ClientId,
        price: Decimal,
        volume: Decimal,
        quote_volume: Decimal,
        executed_at: i64,
    ) -> Self {
        assert!(volume > Decimal::ZERO, "trade volume must be positive");
        Self {
            id: TradeId::new(),
            sequence,
            pair_id,
            buy_order_id,
            sell_order_id,
            buy_client_id,
            sell_client_id,
            price,
            volume,
            quote_volume,
            executed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_trade(sequence: u64) -> Trade {
        Trade::new(
            sequence,
            PairId::new("EURUSD"),
            OrderId::new("b1"),
            OrderId::new("s1"),
            ClientId::new("Client1"),
            ClientId::new("Client2"),
            d("1.3"),
            d("100"),
            d("130"),
            1708123456789000000,
        )
    }

    #[test]
    fn test_trade_creation() {
        let trade = make_trade(42);
        assert_eq!(trade.sequence, 42);
        assert_eq!(trade.volume, d("100"));
        assert_eq!(trade.quote_volume, d("130"));
    }

    #[test]
    #[should_panic(expected = "trade volume must be positive")]
    fn test_negative_volume_panics() {
        Trade::new(
            0,
            PairId::new("EURUSD"),
            OrderId::new("b1"),
            OrderId::new("s1"),
            ClientId::new("Client1"),
            ClientId::new("Client2"),
            d("1.3"),
            d("-100"),
            d("130"),
            0,
        );
    }

    #[test]
    fn test_trade_serialization() {
        let trade = make_trade(1);
        let json = serde_json::to_string(&trade).unwrap();
        let deserialized: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deserialized);
    }
}
