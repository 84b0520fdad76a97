use std::collections::HashMap;

use alloy::primitives::Address;
use bigdecimal::{BigDecimal, Zero};
use holders_common::transfer::{BalanceEntry, TransferEvent};

/// Signed running totals per address. Addresses keep the position of their
/// first appearance, which is what breaks ties when sorting balances.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    totals: Vec<(Address, BigDecimal)>,
    index: HashMap<Address, usize>,
}

impl Ledger {
    fn slot(&mut self, address: Address) -> &mut BigDecimal {
        let position = match self.index.get(&address) {
            Some(&position) => position,
            None => {
                self.totals.push((address, BigDecimal::zero()));
                self.index.insert(address, self.totals.len() - 1);
                self.totals.len() - 1
            }
        };
        &mut self.totals[position].1
    }

    pub fn apply(&mut self, transfer: &TransferEvent) {
        *self.slot(transfer.from) -= &transfer.amount;
        *self.slot(transfer.to) += &transfer.amount;
    }

    pub fn balance_of(&self, address: &Address) -> Option<&BigDecimal> {
        self.index.get(address).map(|&i| &self.totals[i].1)
    }

    /// Number of addresses ever touched, including those at or below zero.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum of every signed total. Each transfer moves value without creating it,
    /// so this is zero for any stream.
    pub fn net_total(&self) -> BigDecimal {
        self.totals.iter().map(|(_, amount)| amount).sum()
    }

    /// Holders with a strictly positive total (and at least `cutoff`), largest first.
    pub fn balances(&self, cutoff: Option<&BigDecimal>) -> Vec<BalanceEntry> {
        let zero = BigDecimal::zero();
        let mut balances: Vec<BalanceEntry> = self
            .totals
            .iter()
            .filter(|(_, amount)| *amount > zero)
            .filter(|(_, amount)| cutoff.map_or(true, |cutoff| amount >= cutoff))
            .map(|(address, amount)| BalanceEntry {
                address: *address,
                amount: amount.clone(),
            })
            .collect();

        balances.sort_by(|a, b| b.amount.abs().cmp(&a.amount.abs()));
        balances
    }
}

/// A [`Ledger`] folded over a block-ordered stream up to some height, which can
/// be moved forward without re-walking the prefix.
#[derive(Clone, Debug)]
pub struct LedgerCursor<'a> {
    transfers: &'a [TransferEvent],
    next: usize,
    ledger: Ledger,
}

impl<'a> LedgerCursor<'a> {
    pub fn new(transfers: &'a [TransferEvent]) -> Self {
        Self {
            transfers,
            next: 0,
            ledger: Ledger::default(),
        }
    }

    /// Applies every remaining transfer with `block_height <= to_block` (all of
    /// them when `to_block` is `None`). Stops at the first later transfer since
    /// nothing after it can be at or below `to_block`.
    pub fn advance_to(&mut self, to_block: Option<u64>) -> &Ledger {
        while let Some(transfer) = self.transfers.get(self.next) {
            if to_block.is_some_and(|to_block| transfer.block_height > to_block) {
                break;
            }
            self.ledger.apply(transfer);
            self.next += 1;
        }
        &self.ledger
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }
}

/// Balances after replaying `transfers` (sorted by block) up to and including
/// `to_block`, keeping only positive totals that reach `cutoff`.
pub fn compute_balances(
    transfers: &[TransferEvent],
    to_block: Option<u64>,
    cutoff: Option<&BigDecimal>,
) -> Vec<BalanceEntry> {
    let mut cursor = LedgerCursor::new(transfers);
    cursor.advance_to(to_block);
    cursor.ledger().balances(cutoff)
}
