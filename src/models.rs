// src/models.rs
use alloy::primitives::{Address, U256};
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A decoded token Transfer from a receipt log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Option<Address>,
    pub amount: U256,  // raw token units
    pub index: usize,  // position of the log in the receipt
}

/// Accumulated totals for one address
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerEntry {
    pub amount_wei: U256,   // authoritative
    pub amount_num: String, // amount_wei / scale in decimal notation, display only
}

/// Per-address totals, ordered by address so output is deterministic
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ledger {
    entries: BTreeMap<Address, LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &Address) -> Option<&LedgerEntry> {
        self.entries.get(address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &LedgerEntry)> {
        self.entries.iter()
    }

    pub(crate) fn entry_mut(&mut self, address: Address) -> &mut LedgerEntry {
        self.entries.entry(address).or_default()
    }

    /// Sum of all raw amounts, `None` on uint256 overflow
    pub fn total_wei(&self) -> Option<U256> {
        self.entries
            .values()
            .try_fold(U256::ZERO, |acc, e| acc.checked_add(e.amount_wei))
    }
}

/// Output shape of one ledger entry
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct VictimRecord<'a> {
    amount_num: &'a str,
    amount_wei: String, // exact integer as string, JSON numbers lose precision
}

impl Serialize for Ledger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(address, entry)| {
            (
                address.to_string(),
                VictimRecord {
                    amount_num: &entry.amount_num,
                    amount_wei: entry.amount_wei.to_string(),
                },
            )
        }))
    }
}
