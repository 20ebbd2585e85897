//! # Outbound Ports
//!
//! Traits for external collaborators: the authoritative item registry and
//! the payment outlet. The core never implements these concerns itself; it
//! calls into them to move custody and value.

use crate::domain::{Address, Amount, DropError, ItemId};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Authoritative item registry — outbound port.
///
/// Maps item identifiers to their current holder and effects creation and
/// custody transfers on the service's behalf.
pub trait ItemRegistry: Send + Sync {
    /// Create `count` new items owned by `owner`, returning their ids.
    ///
    /// The batch is atomic inside the registry: either all items exist
    /// afterwards or none do.
    fn create_many(&self, owner: Address, count: u64) -> Result<Vec<ItemId>, DropError>;

    /// Current holder of an item, `None` if the item does not exist.
    fn holder_of(&self, item: ItemId) -> Option<Address>;

    /// Move custody of `item` from `from` to `to`.
    fn transfer(&self, item: ItemId, from: Address, to: Address) -> Result<(), DropError>;

    /// Is `operator` authorized to move items held by `owner`?
    fn is_operator(&self, owner: Address, operator: Address) -> bool;
}

/// Outbound value transfer — outbound port.
///
/// Called strictly after state effects are applied (check-effects-then-
/// external-call), so a re-entering payee never observes intermediate state.
pub trait PaymentOutlet: Send + Sync {
    /// Transfer `amount` to `to`.
    fn pay(&self, to: Address, amount: Amount) -> Result<(), DropError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

#[derive(Debug, Default)]
struct MockRegistryState {
    next_id: ItemId,
    holders: HashMap<ItemId, Address>,
    operators: HashSet<(Address, Address)>,
}

/// Mock registry for service tests, with injectable failures.
#[derive(Debug, Default)]
pub struct MockRegistry {
    state: Mutex<MockRegistryState>,
    /// Fail every mutating call?
    pub should_fail: bool,
}

impl MockRegistry {
    /// Create an empty mock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock registry whose mutating calls all fail.
    pub fn failing() -> Self {
        Self {
            state: Mutex::default(),
            should_fail: true,
        }
    }

    /// Seed an item owned by `owner` directly, bypassing `create_many`.
    pub fn seed_item(&self, item: ItemId, owner: Address) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.holders.insert(item, owner);
        state.next_id = state.next_id.max(item);
    }

    /// Grant or revoke operator approval.
    pub fn set_operator(&self, owner: Address, operator: Address, approved: bool) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if approved {
            state.operators.insert((owner, operator));
        } else {
            state.operators.remove(&(owner, operator));
        }
    }
}

impl ItemRegistry for MockRegistry {
    fn create_many(&self, owner: Address, count: u64) -> Result<Vec<ItemId>, DropError> {
        if self.should_fail {
            return Err(DropError::Registry("mock failure".to_string()));
        }
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let mut ids = Vec::with_capacity(count as usize);
        for _ in 0..count {
            state.next_id += 1;
            let id = state.next_id;
            state.holders.insert(id, owner);
            ids.push(id);
        }
        Ok(ids)
    }

    fn holder_of(&self, item: ItemId) -> Option<Address> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.holders.get(&item).copied()
    }

    fn transfer(&self, item: ItemId, from: Address, to: Address) -> Result<(), DropError> {
        if self.should_fail {
            return Err(DropError::Registry("mock failure".to_string()));
        }
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match state.holders.get(&item) {
            Some(holder) if *holder == from => {
                state.holders.insert(item, to);
                Ok(())
            }
            _ => Err(DropError::Registry(format!(
                "item {item} not held by transferor"
            ))),
        }
    }

    fn is_operator(&self, owner: Address, operator: Address) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.operators.contains(&(owner, operator))
    }
}

/// Mock payment outlet with injectable failures.
#[derive(Debug, Default)]
pub struct MockPaymentOutlet {
    payments: Mutex<Vec<(Address, Amount)>>,
    /// Fail every transfer?
    pub should_fail: bool,
}

impl MockPaymentOutlet {
    /// Create a mock outlet that accepts every transfer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock outlet that rejects every transfer.
    pub fn failing() -> Self {
        Self {
            payments: Mutex::default(),
            should_fail: true,
        }
    }

    /// Transfers recorded so far.
    pub fn payments(&self) -> Vec<(Address, Amount)> {
        self.payments
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl PaymentOutlet for MockPaymentOutlet {
    fn pay(&self, to: Address, amount: Amount) -> Result<(), DropError> {
        if self.should_fail {
            return Err(DropError::PaymentFailed("mock failure".to_string()));
        }
        self.payments
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((to, amount));
        Ok(())
    }
}
