//! # Domain Entities
//!
//! Mutable state owned by the drop service: the collection counter, the
//! per-holder issuance records, the sale-phase state machine, and the
//! custody vault's provenance records.

use super::errors::DropError;
use super::value_objects::{Address, ItemId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supply accounting for the collection.
///
/// Invariant: `issued_count <= capacity` at every issuance. Capacity may be
/// lowered below `issued_count` by the administrator; that only blocks
/// further issuance, it never retires issued items.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    /// Maximum number of items that may ever be issued.
    pub capacity: u64,
    /// Items issued so far.
    pub issued_count: u64,
}

impl Collection {
    /// Create an empty collection with the given capacity.
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            issued_count: 0,
        }
    }

    /// Remaining issuable supply.
    pub fn remaining(&self) -> u64 {
        self.capacity.saturating_sub(self.issued_count)
    }

    /// Record `amount` newly issued items.
    pub fn record_issued(&mut self, amount: u64) {
        self.issued_count = self.issued_count.saturating_add(amount);
    }

    /// Reverse a `record_issued` after a failed registry call.
    pub fn roll_back(&mut self, amount: u64) {
        self.issued_count = self.issued_count.saturating_sub(amount);
    }
}

/// Per-holder issuance counters.
///
/// Created implicitly on a holder's first issuance, never deleted, and only
/// ever grows. The public and allowlist counters are independent: a holder
/// may exhaust both allowances separately.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HolderRecord {
    /// Items issued to this holder during the public phase.
    pub public_issued: u64,
    /// Items issued to this holder during the allowlist phase.
    pub allowlist_issued: u64,
}

/// Sale phase state machine.
///
/// The administrator may set any phase at any time; no transition ordering
/// is enforced. Raw values outside the three variants are rejected.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[repr(u8)]
pub enum SalePhase {
    /// No issuance permitted.
    #[default]
    Closed = 0,
    /// Allowlist issuance only.
    Allowlist = 1,
    /// Public issuance only.
    Public = 2,
}

impl TryFrom<u8> for SalePhase {
    type Error = DropError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SalePhase::Closed),
            1 => Ok(SalePhase::Allowlist),
            2 => Ok(SalePhase::Public),
            other => Err(DropError::InvalidPhaseValue(other)),
        }
    }
}

/// Provenance record for a staked item.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StakeRecord {
    /// Account that deposited the item and may reclaim it.
    pub depositor: Address,
    /// Deposit time. Always non-zero for a live record.
    pub deposited_at: Timestamp,
}

/// Custody bookkeeping for staked items.
///
/// The vault is the sole authority on who may reclaim a held item; the
/// external registry's holder field is irrelevant while an item is inside
/// (the vault itself is the registry-visible holder). Absence of a record
/// means "not currently staked".
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vault {
    records: HashMap<ItemId, StakeRecord>,
}

impl Vault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the provenance record for an item.
    pub fn record(&self, item: ItemId) -> Option<&StakeRecord> {
        self.records.get(&item)
    }

    /// True if the item is currently staked.
    pub fn contains(&self, item: ItemId) -> bool {
        self.records.contains_key(&item)
    }

    /// Record a deposit. Overwrites nothing: the caller must have
    /// established that the item is not already staked.
    pub fn deposit(&mut self, item: ItemId, depositor: Address, at: Timestamp) {
        self.records.insert(
            item,
            StakeRecord {
                depositor,
                deposited_at: at,
            },
        );
    }

    /// Delete and return the record for an item, if any.
    pub fn release(&mut self, item: ItemId) -> Option<StakeRecord> {
        self.records.remove(&item)
    }

    /// Number of items currently staked.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no item is staked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
