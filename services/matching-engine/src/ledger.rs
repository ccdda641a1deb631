//! Client balance ledger
//!
//! Holds every client's per-asset balances and reservations. Missing
//! entries read as zero and are created lazily on first write. Settlement
//! moves both legs of a trade atomically; a settlement that would drive a
//! balance negative panics, because matching only executes trades that
//! reservations or funds checks already cover.

use rust_decimal::Decimal;
use std::collections::HashMap;
use types::errors::LedgerError;
use types::ids::{AssetId, ClientId};
use types::wallet::AssetBalance;

/// All client balances known to the engine
#[derive(Debug, Default)]
pub struct BalanceLedger {
    wallets: HashMap<ClientId, HashMap<AssetId, AssetBalance>>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, client: &ClientId, asset: &AssetId) -> &mut AssetBalance {
        self.wallets
            .entry(client.clone())
            .or_default()
            .entry(asset.clone())
            .or_default()
    }

    fn get(&self, client: &ClientId, asset: &AssetId) -> AssetBalance {
        self.wallets
            .get(client)
            .and_then(|w| w.get(asset))
            .copied()
            .unwrap_or_default()
    }

    pub fn balance(&self, client: &ClientId, asset: &AssetId) -> Decimal {
        self.get(client, asset).balance
    }

    pub fn reserved(&self, client: &ClientId, asset: &AssetId) -> Decimal {
        self.get(client, asset).reserved
    }

    pub fn available(&self, client: &ClientId, asset: &AssetId) -> Decimal {
        self.get(client, asset).available()
    }

    /// Credit funds from outside the engine
    pub fn deposit(&mut self, client: &ClientId, asset: &AssetId, amount: Decimal) {
        self.entry(client, asset).credit(amount);
    }

    /// Reserve `amount` of the client's available balance
    pub fn reserve(
        &mut self,
        client: &ClientId,
        asset: &AssetId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let entry = self.entry(client, asset);
        if entry.available() < amount {
            return Err(LedgerError::InsufficientFunds {
                client: client.clone(),
                asset: asset.clone(),
                required: amount,
                available: entry.available(),
            });
        }
        entry.reserve(amount);
        Ok(())
    }

    /// Release part of a reservation; clamped, never fails
    pub fn release(&mut self, client: &ClientId, asset: &AssetId, amount: Decimal) {
        self.entry(client, asset).release(amount);
    }

    /// Settle one trade: buyer pays `quote_amount` and receives
    /// `base_amount`, seller the inverse. Each side's reservation is
    /// reduced by the given decrement (zero when no reservation backs
    /// that side).
    ///
    /// Payer legs may go negative: funds checks and reservations keep
    /// ordinary clients covered, while reservation-exempt clients are
    /// allowed to run a deficit.
    #[allow(clippy::too_many_arguments)]
    pub fn settle(
        &mut self,
        buyer: &ClientId,
        seller: &ClientId,
        base: &AssetId,
        quote: &AssetId,
        base_amount: Decimal,
        quote_amount: Decimal,
        buyer_reserved: Decimal,
        seller_reserved: Decimal,
    ) {
        let buyer_quote = self.entry(buyer, quote);
        buyer_quote.release(buyer_reserved);
        buyer_quote.force_debit(quote_amount);
        self.entry(buyer, base).credit(base_amount);

        let seller_base = self.entry(seller, base);
        seller_base.release(seller_reserved);
        seller_base.force_debit(base_amount);
        self.entry(seller, quote).credit(quote_amount);
    }

    /// Sum of every client's balance of one asset
    pub fn total_balance(&self, asset: &AssetId) -> Decimal {
        self.wallets
            .values()
            .filter_map(|w| w.get(asset))
            .map(|b| b.balance)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn usd() -> AssetId {
        AssetId::new("USD")
    }

    fn eur() -> AssetId {
        AssetId::new("EUR")
    }

    #[test]
    fn test_missing_entries_read_zero() {
        let ledger = BalanceLedger::new();
        let c = ClientId::new("nobody");
        assert_eq!(ledger.balance(&c, &usd()), Decimal::ZERO);
        assert_eq!(ledger.available(&c, &usd()), Decimal::ZERO);
    }

    #[test]
    fn test_reserve_rejects_over_available() {
        let mut ledger = BalanceLedger::new();
        let c = ClientId::new("Client1");
        ledger.deposit(&c, &usd(), d("100"));
        let err = ledger.reserve(&c, &usd(), d("150")).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        // Nothing was reserved
        assert_eq!(ledger.reserved(&c, &usd()), Decimal::ZERO);
    }

    #[test]
    fn test_settle_moves_both_legs() {
        let mut ledger = BalanceLedger::new();
        let buyer = ClientId::new("Client1");
        let seller = ClientId::new("Client2");
        ledger.deposit(&buyer, &usd(), d("1000"));
        ledger.deposit(&seller, &eur(), d("1000"));
        ledger.reserve(&seller, &eur(), d("100")).unwrap();

        // Seller's resting ask filled for 100 EUR at 1.3
        ledger.settle(
            &buyer,
            &seller,
            &eur(),
            &usd(),
            d("100"),
            d("130"),
            Decimal::ZERO,
            d("100"),
        );

        assert_eq!(ledger.balance(&buyer, &usd()), d("870"));
        assert_eq!(ledger.balance(&buyer, &eur()), d("100"));
        assert_eq!(ledger.balance(&seller, &eur()), d("900"));
        assert_eq!(ledger.balance(&seller, &usd()), d("130"));
        assert_eq!(ledger.reserved(&seller, &eur()), Decimal::ZERO);
    }

    #[test]
    fn test_total_balance_conserved_by_settle() {
        let mut ledger = BalanceLedger::new();
        let buyer = ClientId::new("a");
        let seller = ClientId::new("b");
        ledger.deposit(&buyer, &usd(), d("500"));
        ledger.deposit(&seller, &eur(), d("200"));
        ledger.settle(
            &buyer,
            &seller,
            &eur(),
            &usd(),
            d("50"),
            d("60"),
            Decimal::ZERO,
            Decimal::ZERO,
        );
        assert_eq!(ledger.total_balance(&usd()), d("500"));
        assert_eq!(ledger.total_balance(&eur()), d("200"));
    }

    #[test]
    fn test_settle_unfunded_payer_goes_negative() {
        let mut ledger = BalanceLedger::new();
        let buyer = ClientId::new("a");
        let seller = ClientId::new("b");
        ledger.deposit(&seller, &eur(), d("100"));
        ledger.settle(
            &buyer,
            &seller,
            &eur(),
            &usd(),
            d("50"),
            d("60"),
            Decimal::ZERO,
            Decimal::ZERO,
        );
        assert_eq!(ledger.balance(&buyer, &usd()), d("-60"));
        assert_eq!(ledger.balance(&buyer, &eur()), d("50"));
    }
}
