//! Engine input commands

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{ClientId, OrderId, PairId};

/// Place a single limit order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrder {
    /// Client-supplied id; generated when absent
    pub id: Option<OrderId>,
    pub client_id: ClientId,
    pub pair_id: PairId,
    pub price: Decimal,
    /// Signed volume: positive = buy, negative = sell
    pub volume: Decimal,
}

/// One order of a multi-order batch
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumePrice {
    pub volume: Decimal,
    pub price: Decimal,
}

/// Place a batch of limit orders for one client on one instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceMultiOrder {
    pub client_id: ClientId,
    pub pair_id: PairId,
    pub orders: Vec<VolumePrice>,
    /// Cancel the client's live orders on this instrument first
    pub cancel_previous: bool,
}

/// Cancel a resting order by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOrder {
    pub order_id: OrderId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    PlaceOrder(PlaceOrder),
    PlaceMultiOrder(PlaceMultiOrder),
    CancelOrder(CancelOrder),
}
