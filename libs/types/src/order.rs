//! Limit order lifecycle types
//!
//! Volume is signed: positive = buy (bid), negative = sell (ask). The sign
//! encodes the side, the magnitude is the quantity. `remaining_volume`
//! carries the same sign and shrinks in magnitude as fills occur; it never
//! crosses zero.

use crate::ids::{ClientId, OrderId, PairId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side, derived from the volume sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Limit order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Resting in the book, unfilled (non-terminal)
    InOrderBook,
    /// Partially filled; keeps this status while resting with fills (non-terminal)
    Processing,
    /// Fully filled (terminal)
    Matched,
    /// Removed before full fill (terminal)
    Cancelled,
    /// Rejected: required reservation exceeds available balance (terminal)
    NotEnoughFunds,
    /// Rejected: remaining volume below the instrument's minimum (terminal)
    Dust,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Matched
                | OrderStatus::Cancelled
                | OrderStatus::NotEnoughFunds
                | OrderStatus::Dust
        )
    }
}

/// A limit order with signed volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitOrder {
    pub id: OrderId,
    pub pair_id: PairId,
    pub client_id: ClientId,
    pub price: Decimal,
    /// Signed volume: positive = buy, negative = sell
    pub volume: Decimal,
    /// Same sign as `volume`; magnitude shrinks with fills
    pub remaining_volume: Decimal,
    /// Balance currently reserved for this order (quote asset for buys,
    /// base asset for sells); zero for reservation-exempt clients
    pub reserved_volume: Decimal,
    pub status: OrderStatus,
    pub created_at: i64, // Unix nanos
    pub updated_at: i64, // Unix nanos
}

impl LimitOrder {
    pub fn new(
        id: OrderId,
        pair_id: PairId,
        client_id: ClientId,
        price: Decimal,
        volume: Decimal,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            pair_id,
            client_id,
            price,
            volume,
            remaining_volume: volume,
            reserved_volume: Decimal::ZERO,
            status: OrderStatus::InOrderBook,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Side implied by the volume sign
    pub fn side(&self) -> Side {
        if self.volume > Decimal::ZERO {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    pub fn is_buy(&self) -> bool {
        self.side() == Side::Buy
    }

    /// Unsigned remaining quantity
    pub fn abs_remaining(&self) -> Decimal {
        self.remaining_volume.abs()
    }

    /// Check volume invariants: `|remaining| <= |volume|`, signs agree
    pub fn check_invariant(&self) -> bool {
        self.remaining_volume.abs() <= self.volume.abs()
            && (self.remaining_volume.is_zero()
                || self.remaining_volume.is_sign_positive() == self.volume.is_sign_positive())
    }

    /// Shrink the remaining volume by a positive fill amount
    ///
    /// Sets status to `Matched` when fully consumed, `Processing` otherwise.
    ///
    /// # Panics
    /// Panics if the fill is non-positive or exceeds the remaining volume.
    pub fn apply_fill(&mut self, fill: Decimal, timestamp: i64) {
        assert!(fill > Decimal::ZERO, "fill must be positive");
        assert!(fill <= self.abs_remaining(), "fill exceeds remaining volume");

        self.remaining_volume = match self.side() {
            Side::Buy => self.remaining_volume - fill,
            Side::Sell => self.remaining_volume + fill,
        };
        self.status = if self.remaining_volume.is_zero() {
            OrderStatus::Matched
        } else {
            OrderStatus::Processing
        };
        self.updated_at = timestamp;

        assert!(self.check_invariant(), "invariant violated after fill");
    }

    /// Cancel the order
    ///
    /// # Panics
    /// Panics if the order is already in a terminal state.
    pub fn cancel(&mut self, timestamp: i64) {
        assert!(!self.status.is_terminal(), "cannot cancel terminal order");
        self.status = OrderStatus::Cancelled;
        self.updated_at = timestamp;
    }

    /// Reject the order with a terminal rejection status
    pub fn reject(&mut self, status: OrderStatus, timestamp: i64) {
        assert!(
            matches!(status, OrderStatus::NotEnoughFunds | OrderStatus::Dust),
            "not a rejection status"
        );
        self.status = status;
        self.updated_at = timestamp;
    }
}
