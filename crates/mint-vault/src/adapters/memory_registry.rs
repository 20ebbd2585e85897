//! # In-Memory Item Registry
//!
//! Reference [`ItemRegistry`] adapter: sequential item ids, a holder map,
//! and operator approvals. Item ids start at 1 so id 0 never names an item.

use crate::domain::{Address, DropError, ItemId};
use crate::ports::ItemRegistry;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct RegistryState {
    next_id: ItemId,
    holders: HashMap<ItemId, Address>,
    operators: HashSet<(Address, Address)>,
}

/// In-memory authoritative registry of items and holders.
#[derive(Debug, Default)]
pub struct InMemoryItemRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryItemRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant or revoke `operator`'s right to move items held by `owner`.
    pub fn set_operator(&self, owner: Address, operator: Address, approved: bool) {
        let mut state = self.lock_state();
        if approved {
            state.operators.insert((owner, operator));
        } else {
            state.operators.remove(&(owner, operator));
        }
    }

    /// Items currently held by `owner`, in ascending id order.
    pub fn items_of(&self, owner: Address) -> Vec<ItemId> {
        let state = self.lock_state();
        let mut items: Vec<ItemId> = state
            .holders
            .iter()
            .filter(|(_, holder)| **holder == owner)
            .map(|(item, _)| *item)
            .collect();
        items.sort_unstable();
        items
    }

    /// Total number of items in existence.
    pub fn total_items(&self) -> usize {
        self.lock_state().holders.len()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ItemRegistry for InMemoryItemRegistry {
    fn create_many(&self, owner: Address, count: u64) -> Result<Vec<ItemId>, DropError> {
        let mut state = self.lock_state();

        // Reserve the whole id run before touching the holder map, so the
        // batch is all-or-nothing.
        let last = state
            .next_id
            .checked_add(count)
            .ok_or_else(|| DropError::Registry("item id space exhausted".to_string()))?;

        let first = state.next_id + 1;
        state.next_id = last;

        let ids: Vec<ItemId> = (first..=last).collect();
        for id in &ids {
            state.holders.insert(*id, owner);
        }
        Ok(ids)
    }

    fn holder_of(&self, item: ItemId) -> Option<Address> {
        self.lock_state().holders.get(&item).copied()
    }

    fn transfer(&self, item: ItemId, from: Address, to: Address) -> Result<(), DropError> {
        let mut state = self.lock_state();
        match state.holders.get(&item) {
            Some(holder) if *holder == from => {
                state.holders.insert(item, to);
                Ok(())
            }
            Some(_) => Err(DropError::Registry(format!(
                "item {item} not held by transferor"
            ))),
            None => Err(DropError::Registry(format!("item {item} does not exist"))),
        }
    }

    fn is_operator(&self, owner: Address, operator: Address) -> bool {
        self.lock_state().operators.contains(&(owner, operator))
    }
}
