//! Per-asset balance and reservation types
//!
//! `balance` is the client's total holding of an asset; `reserved` is the
//! portion set aside to guarantee resting orders can settle. The spendable
//! amount is `balance - reserved`.
//!
//! Invariant: `balance >= 0` and `reserved >= 0` after every operation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balance of a single asset for one client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetBalance {
    pub balance: Decimal,
    pub reserved: Decimal,
}

impl AssetBalance {
    pub fn new(balance: Decimal, reserved: Decimal) -> Self {
        assert!(balance >= Decimal::ZERO, "balance must be non-negative");
        assert!(reserved >= Decimal::ZERO, "reserved must be non-negative");
        Self { balance, reserved }
    }

    /// Spendable amount: total minus reservations
    pub fn available(&self) -> Decimal {
        self.balance - self.reserved
    }

    pub fn check_invariant(&self) -> bool {
        self.balance >= Decimal::ZERO && self.reserved >= Decimal::ZERO
    }

    /// Increase the total balance
    pub fn credit(&mut self, amount: Decimal) {
        assert!(amount >= Decimal::ZERO, "credit must be non-negative");
        self.balance += amount;
    }

    /// Decrease the total balance
    ///
    /// # Panics
    /// Panics if the balance would go negative; matching never spends more
    /// than a client holds, so this indicates a logic defect.
    pub fn debit(&mut self, amount: Decimal) {
        assert!(amount >= Decimal::ZERO, "debit must be non-negative");
        assert!(self.balance >= amount, "balance underflow");
        self.balance -= amount;
    }

    /// Decrease the total balance, allowing it to go negative
    ///
    /// Settlement legs not backed by a reservation use this: takers are
    /// funds-checked before matching, and reservation-exempt clients may
    /// run a negative balance.
    pub fn force_debit(&mut self, amount: Decimal) {
        assert!(amount >= Decimal::ZERO, "debit must be non-negative");
        self.balance -= amount;
    }

    /// Set aside part of the balance
    ///
    /// # Panics
    /// Panics when the available amount does not cover the reservation;
    /// callers check availability first and report `InsufficientFunds`.
    pub fn reserve(&mut self, amount: Decimal) {
        assert!(amount >= Decimal::ZERO, "reservation must be non-negative");
        assert!(self.available() >= amount, "reservation exceeds available");
        self.reserved += amount;
    }

    /// Release part of the reservation, clamped at zero; never fails
    pub fn release(&mut self, amount: Decimal) {
        assert!(amount >= Decimal::ZERO, "release must be non-negative");
        self.reserved = (self.reserved - amount).max(Decimal::ZERO);
    }
}
