//! # Drop Service
//!
//! Application service coupling the issuance ledger and the custody vault.
//!
//! All mutable state lives behind one mutex per service instance. Every
//! public operation acquires it exactly once, validates its preconditions,
//! applies its effects, and releases — so no interleaving of two operations
//! on the same state is observable and each operation is all-or-nothing.
//! Two calls racing for the last capacity unit resolve by lock order: the
//! loser re-validates against the updated count and fails. The only work
//! performed outside the lock is the outbound value transfer of
//! `withdraw_funds`, which runs strictly after the balance has been zeroed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::algorithms::{leaf_hash, verify_membership};
use crate::config::DropConfig;
use crate::domain::{
    invariant_allocation_within_capacity, invariant_allowlist_cap, invariant_holder_quota,
    invariant_payment_covers, invariant_phase_open, invariant_supply_cap, Address, Amount, Caller,
    Collection, DropError, DropStats, Hash, HolderRecord, ItemId, MembershipProof, SalePhase,
    StakeOutcome, StakeRecord, Timestamp, Vault,
};
use crate::events::{self, VaultEvent};
use crate::ports::{AdminApi, DropApi, ItemRegistry, PaymentOutlet};

/// Mutable state guarded by the service mutex.
struct DropState {
    config: DropConfig,
    phase: SalePhase,
    collection: Collection,
    holders: HashMap<Address, HolderRecord>,
    vault: Vault,
    balance: Amount,
    registry: Arc<dyn ItemRegistry>,
}

/// Drop service - issuance under phased eligibility plus custody vault.
pub struct DropService {
    admin: Address,
    payments: Arc<dyn PaymentOutlet>,
    inner: Mutex<DropState>,
}

impl DropService {
    /// Create a new drop service. The sale starts `Closed` with nothing
    /// issued; `admin` is fixed for the lifetime of the instance.
    pub fn new(
        admin: Address,
        config: DropConfig,
        registry: Arc<dyn ItemRegistry>,
        payments: Arc<dyn PaymentOutlet>,
    ) -> Self {
        let collection = Collection::new(config.capacity);
        Self {
            admin,
            payments,
            inner: Mutex::new(DropState {
                config,
                phase: SalePhase::default(),
                collection,
                holders: HashMap::new(),
                vault: Vault::new(),
                balance: 0,
                registry,
            }),
        }
    }

    /// The administrator address.
    pub fn admin(&self) -> Address {
        self.admin
    }

    fn state(&self) -> Result<MutexGuard<'_, DropState>, DropError> {
        self.inner.lock().map_err(|_| DropError::StatePoisoned)
    }

    fn require_admin(&self, caller: Address) -> Result<(), DropError> {
        if caller != self.admin {
            return Err(DropError::NotAuthorized);
        }
        Ok(())
    }

    /// Wall-clock seconds, floored to 1 so a live record never carries the
    /// reserved zero timestamp.
    fn now() -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(1)
            .max(1)
    }
}

impl DropApi for DropService {
    fn issue_public(
        &self,
        caller: Caller,
        amount: u64,
        payment: Amount,
    ) -> Result<Vec<ItemId>, DropError> {
        if !caller.is_direct() {
            return Err(DropError::NotAuthorized);
        }
        if amount == 0 {
            return Err(DropError::InvalidAmount);
        }

        let mut state = self.state()?;

        // Check order is load-bearing: quota, then capacity, then phase,
        // then payment. It decides which error surfaces when several
        // preconditions fail at once.
        let record = state
            .holders
            .get(&caller.address)
            .copied()
            .unwrap_or_default();
        invariant_holder_quota(
            record.public_issued,
            amount,
            state.config.public_max_per_holder,
        )?;
        invariant_supply_cap(
            state.collection.issued_count,
            amount,
            state.collection.capacity,
        )?;
        invariant_phase_open(state.phase, SalePhase::Public)?;
        let required = state.config.public_price.saturating_mul(amount as Amount);
        invariant_payment_covers(payment, required)?;

        state.collection.record_issued(amount);
        let registry = Arc::clone(&state.registry);
        let ids = match registry.create_many(caller.address, amount) {
            Ok(ids) => ids,
            Err(e) => {
                state.collection.roll_back(amount);
                return Err(e);
            }
        };
        let entry = state.holders.entry(caller.address).or_default();
        entry.public_issued += amount;
        // Overpayment is kept, not refunded
        state.balance = state.balance.saturating_add(payment);

        tracing::info!(
            amount,
            issued = state.collection.issued_count,
            "public issuance"
        );
        Ok(ids)
    }

    fn issue_allowlist(
        &self,
        caller: Caller,
        amount: u64,
        payment: Amount,
        proof: &MembershipProof,
    ) -> Result<Vec<ItemId>, DropError> {
        if !caller.is_direct() {
            return Err(DropError::NotAuthorized);
        }
        if amount == 0 {
            return Err(DropError::InvalidAmount);
        }

        let mut state = self.state()?;

        let record = state
            .holders
            .get(&caller.address)
            .copied()
            .unwrap_or_default();
        invariant_holder_quota(
            record.allowlist_issued,
            amount,
            state.config.allowlist_max_per_holder,
        )?;
        invariant_allowlist_cap(
            state.collection.issued_count,
            amount,
            state.config.allowlist_allocation,
        )?;
        invariant_phase_open(state.phase, SalePhase::Allowlist)?;
        let required = state.config.allowlist_price.saturating_mul(amount as Amount);
        invariant_payment_covers(payment, required)?;

        let leaf = leaf_hash(&caller.address);
        if !verify_membership(&leaf, proof, &state.config.allowlist_root) {
            return Err(DropError::InvalidMembershipProof);
        }

        // The per-holder counter moves before item creation so the audit
        // trail orders the claim ahead of the items it produced; the mutex
        // keeps the pair atomic regardless.
        state
            .holders
            .entry(caller.address)
            .or_default()
            .allowlist_issued += amount;
        state.collection.record_issued(amount);

        let registry = Arc::clone(&state.registry);
        let ids = match registry.create_many(caller.address, amount) {
            Ok(ids) => ids,
            Err(e) => {
                state.collection.roll_back(amount);
                if let Some(entry) = state.holders.get_mut(&caller.address) {
                    entry.allowlist_issued -= amount;
                }
                return Err(e);
            }
        };
        state.balance = state.balance.saturating_add(payment);

        tracing::info!(
            amount,
            issued = state.collection.issued_count,
            "allowlist issuance"
        );
        Ok(ids)
    }

    fn deposit_many(
        &self,
        caller: Address,
        items: &[ItemId],
    ) -> Result<Vec<StakeOutcome>, DropError> {
        let mut state = self.state()?;

        if !state.config.staking_enabled {
            return Err(DropError::StakingDisabled);
        }
        let vault_address = state.config.vault_address;
        let registry = Arc::clone(&state.registry);
        if !registry.is_operator(caller, vault_address) {
            return Err(DropError::NotAuthorized);
        }

        let mut outcomes = Vec::with_capacity(items.len());
        let mut processed: Vec<ItemId> = Vec::new();
        let mut notifications = Vec::new();

        for &item in items {
            // Only items the caller currently holds are processed; the rest
            // are skipped silently, by design. An item already in custody is
            // also skipped: the registry shows the vault as its holder, so it
            // could only pass the holder check when the vault address itself
            // is the caller, and that must not overwrite the depositor's
            // provenance record.
            if state.vault.contains(item) || registry.holder_of(item) != Some(caller) {
                outcomes.push(StakeOutcome::Skipped { item });
                continue;
            }

            if let Err(e) = registry.transfer(item, caller, vault_address) {
                // A registry failure is a failed precondition: discard the
                // whole batch, including already-processed items. If a
                // compensating transfer fails too, the record is retained:
                // the vault still holds the item in the registry, and the
                // record is what lets a forced withdrawal return it later.
                for &done in &processed {
                    match registry.transfer(done, vault_address, caller) {
                        Ok(()) => {
                            state.vault.release(done);
                        }
                        Err(err) => {
                            tracing::warn!(
                                item = done,
                                %err,
                                "rollback transfer failed; stake record retained"
                            );
                        }
                    }
                }
                return Err(e);
            }

            let at = Self::now();
            state.vault.deposit(item, caller, at);
            processed.push(item);
            notifications.push(VaultEvent::Staked {
                holder: caller,
                item,
                timestamp: at,
            });
            outcomes.push(StakeOutcome::Processed { item, at });
        }

        for event in &notifications {
            events::emit(event);
        }
        tracing::debug!(
            requested = items.len(),
            processed = processed.len(),
            "deposit batch"
        );
        Ok(outcomes)
    }

    fn withdraw_many(
        &self,
        caller: Address,
        items: &[ItemId],
    ) -> Result<Vec<StakeOutcome>, DropError> {
        let mut state = self.state()?;
        let vault_address = state.config.vault_address;
        let registry = Arc::clone(&state.registry);

        let mut outcomes = Vec::with_capacity(items.len());
        let mut processed: Vec<(ItemId, StakeRecord)> = Vec::new();
        let mut notifications = Vec::new();

        for &item in items {
            // Only the depositor may reclaim; anything else is a silent skip.
            let entitled = state
                .vault
                .record(item)
                .is_some_and(|record| record.depositor == caller);
            if !entitled {
                outcomes.push(StakeOutcome::Skipped { item });
                continue;
            }

            if let Err(e) = registry.transfer(item, vault_address, caller) {
                // The record is re-created either way, so the depositor
                // keeps their claim even if the compensation fails.
                for (done, record) in &processed {
                    if let Err(err) = registry.transfer(*done, caller, vault_address) {
                        tracing::warn!(item = *done, %err, "rollback transfer failed");
                    }
                    state.vault.deposit(*done, record.depositor, record.deposited_at);
                }
                return Err(e);
            }

            let record = state
                .vault
                .release(item)
                .ok_or_else(|| DropError::Registry(format!("stake record vanished for {item}")))?;
            let at = Self::now();
            processed.push((item, record));
            notifications.push(VaultEvent::Unstaked {
                holder: caller,
                item,
                timestamp: at,
            });
            outcomes.push(StakeOutcome::Processed { item, at });
        }

        for event in &notifications {
            events::emit(event);
        }
        Ok(outcomes)
    }

    fn metadata_for(&self, item: ItemId) -> Result<String, DropError> {
        let state = self.state()?;
        if !state.config.revealed {
            return Ok(state.config.unrevealed_uri.clone());
        }
        Ok(format!("{}{}.json", state.config.metadata_base, item))
    }

    fn issued_count(&self) -> Result<u64, DropError> {
        Ok(self.state()?.collection.issued_count)
    }

    fn holder_record(&self, holder: Address) -> Result<HolderRecord, DropError> {
        Ok(self
            .state()?
            .holders
            .get(&holder)
            .copied()
            .unwrap_or_default())
    }

    fn stake_record(&self, item: ItemId) -> Result<Option<StakeRecord>, DropError> {
        Ok(self.state()?.vault.record(item).copied())
    }

    fn sale_phase(&self) -> Result<SalePhase, DropError> {
        Ok(self.state()?.phase)
    }

    fn balance(&self) -> Result<Amount, DropError> {
        Ok(self.state()?.balance)
    }

    fn stats(&self) -> Result<DropStats, DropError> {
        let state = self.state()?;
        Ok(DropStats {
            capacity: state.collection.capacity,
            issued_count: state.collection.issued_count,
            allowlist_allocation: state.config.allowlist_allocation,
            sale_phase: state.phase as u8,
            staking_enabled: state.config.staking_enabled,
            revealed: state.config.revealed,
            staked_count: state.vault.len(),
            balance: state.balance,
        })
    }
}

impl AdminApi for DropService {
    fn set_capacity(&self, caller: Address, capacity: u64) -> Result<(), DropError> {
        self.require_admin(caller)?;
        self.state()?.collection.capacity = capacity;
        Ok(())
    }

    fn set_public_price(&self, caller: Address, price: Amount) -> Result<(), DropError> {
        self.require_admin(caller)?;
        self.state()?.config.public_price = price;
        Ok(())
    }

    fn set_public_max_per_holder(&self, caller: Address, limit: u64) -> Result<(), DropError> {
        self.require_admin(caller)?;
        self.state()?.config.public_max_per_holder = limit;
        Ok(())
    }

    fn set_allowlist_allocation(&self, caller: Address, allocation: u64) -> Result<(), DropError> {
        self.require_admin(caller)?;
        let mut state = self.state()?;
        invariant_allocation_within_capacity(allocation, state.collection.capacity)?;
        state.config.allowlist_allocation = allocation;
        Ok(())
    }

    fn set_allowlist_price(&self, caller: Address, price: Amount) -> Result<(), DropError> {
        self.require_admin(caller)?;
        self.state()?.config.allowlist_price = price;
        Ok(())
    }

    fn set_allowlist_max_per_holder(&self, caller: Address, limit: u64) -> Result<(), DropError> {
        self.require_admin(caller)?;
        self.state()?.config.allowlist_max_per_holder = limit;
        Ok(())
    }

    fn set_allowlist_root(&self, caller: Address, root: Hash) -> Result<(), DropError> {
        self.require_admin(caller)?;
        self.state()?.config.allowlist_root = root;
        tracing::info!("allowlist root rotated");
        Ok(())
    }

    fn set_metadata_base(&self, caller: Address, base: String) -> Result<(), DropError> {
        self.require_admin(caller)?;
        self.state()?.config.metadata_base = base;
        Ok(())
    }

    fn set_unrevealed_uri(&self, caller: Address, uri: String) -> Result<(), DropError> {
        self.require_admin(caller)?;
        self.state()?.config.unrevealed_uri = uri;
        Ok(())
    }

    fn toggle_revealed(&self, caller: Address) -> Result<bool, DropError> {
        self.require_admin(caller)?;
        let mut state = self.state()?;
        state.config.revealed = !state.config.revealed;
        Ok(state.config.revealed)
    }

    fn set_sale_phase(&self, caller: Address, phase: SalePhase) -> Result<(), DropError> {
        self.require_admin(caller)?;
        self.state()?.phase = phase;
        tracing::info!(phase = phase as u8, "sale phase set");
        Ok(())
    }

    fn set_registry(
        &self,
        caller: Address,
        registry: Arc<dyn ItemRegistry>,
    ) -> Result<(), DropError> {
        self.require_admin(caller)?;
        self.state()?.registry = registry;
        Ok(())
    }

    fn toggle_staking(&self, caller: Address) -> Result<bool, DropError> {
        self.require_admin(caller)?;
        let mut state = self.state()?;
        state.config.staking_enabled = !state.config.staking_enabled;
        Ok(state.config.staking_enabled)
    }

    fn force_withdraw_many(
        &self,
        caller: Address,
        items: &[ItemId],
    ) -> Result<Vec<StakeOutcome>, DropError> {
        self.require_admin(caller)?;
        let mut state = self.state()?;
        let vault_address = state.config.vault_address;
        let registry = Arc::clone(&state.registry);

        let mut outcomes = Vec::with_capacity(items.len());
        let mut processed: Vec<(ItemId, StakeRecord)> = Vec::new();
        let mut notifications = Vec::new();

        for &item in items {
            let Some(record) = state.vault.record(item).copied() else {
                outcomes.push(StakeOutcome::Skipped { item });
                continue;
            };

            // Custody returns to the original depositor, never the admin.
            if let Err(e) = registry.transfer(item, vault_address, record.depositor) {
                for (done, undone) in &processed {
                    if let Err(err) =
                        registry.transfer(*done, undone.depositor, vault_address)
                    {
                        tracing::warn!(item = *done, %err, "rollback transfer failed");
                    }
                    state
                        .vault
                        .deposit(*done, undone.depositor, undone.deposited_at);
                }
                return Err(e);
            }

            state.vault.release(item);
            let at = Self::now();
            processed.push((item, record));
            notifications.push(VaultEvent::Unstaked {
                holder: record.depositor,
                item,
                timestamp: at,
            });
            outcomes.push(StakeOutcome::Processed { item, at });
        }

        for event in &notifications {
            events::emit(event);
        }
        tracing::warn!(
            requested = items.len(),
            processed = processed.len(),
            "forced withdrawal"
        );
        Ok(outcomes)
    }

    fn withdraw_funds(&self, caller: Address) -> Result<Amount, DropError> {
        self.require_admin(caller)?;

        // Effects before the external call: zero the balance, release the
        // lock, then transfer. A re-entering payee sees consistent state.
        let amount = {
            let mut state = self.state()?;
            let amount = state.balance;
            state.balance = 0;
            amount
        };
        if amount == 0 {
            return Ok(0);
        }

        if let Err(e) = self.payments.pay(self.admin, amount) {
            let mut state = self.state()?;
            state.balance = state.balance.saturating_add(amount);
            return Err(e);
        }
        tracing::info!(amount, "funds withdrawn");
        Ok(amount)
    }
}
