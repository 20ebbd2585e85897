//! # Inbound Ports
//!
//! Operation traits defining what the drop service can do: the holder
//! surface ([`DropApi`]) and the administrator surface ([`AdminApi`]).
//! Every operation executes as one indivisible critical section — it either
//! fully applies all its effects or none of them.

use crate::domain::{
    Address, Amount, Caller, DropError, DropStats, Hash, HolderRecord, ItemId, MembershipProof,
    SalePhase, StakeOutcome, StakeRecord,
};
use std::sync::Arc;

use super::outbound::ItemRegistry;

/// Holder-facing operations — inbound port.
pub trait DropApi: Send + Sync {
    /// Issue `amount` items to the caller during the public phase.
    ///
    /// Checks, in order: holder quota, capacity, phase, payment. Returns the
    /// newly created item ids.
    fn issue_public(
        &self,
        caller: Caller,
        amount: u64,
        payment: Amount,
    ) -> Result<Vec<ItemId>, DropError>;

    /// Issue `amount` items to the caller during the allowlist phase.
    ///
    /// The proof authorizes the caller's identity against the current
    /// allowlist root; it does not bind the amount.
    fn issue_allowlist(
        &self,
        caller: Caller,
        amount: u64,
        payment: Amount,
        proof: &MembershipProof,
    ) -> Result<Vec<ItemId>, DropError>;

    /// Deposit items into the vault. Items the caller does not hold are
    /// skipped silently; each processed item gets a provenance record and a
    /// `Staked` notification.
    fn deposit_many(
        &self,
        caller: Address,
        items: &[ItemId],
    ) -> Result<Vec<StakeOutcome>, DropError>;

    /// Withdraw items the caller previously deposited. Items without a
    /// matching record are skipped silently.
    fn withdraw_many(
        &self,
        caller: Address,
        items: &[ItemId],
    ) -> Result<Vec<StakeOutcome>, DropError>;

    /// Metadata URI for an item: the unrevealed URI until reveal, then
    /// `base + id + ".json"`.
    fn metadata_for(&self, item: ItemId) -> Result<String, DropError>;

    /// Total items issued so far.
    fn issued_count(&self) -> Result<u64, DropError>;

    /// Issuance counters for a holder (zeroed if the holder never issued).
    fn holder_record(&self, holder: Address) -> Result<HolderRecord, DropError>;

    /// Provenance record for a staked item, `None` if not staked.
    fn stake_record(&self, item: ItemId) -> Result<Option<StakeRecord>, DropError>;

    /// Currently active sale phase.
    fn sale_phase(&self) -> Result<SalePhase, DropError>;

    /// Accumulated, not-yet-withdrawn payment balance.
    fn balance(&self) -> Result<Amount, DropError>;

    /// Observability snapshot of the service state.
    fn stats(&self) -> Result<DropStats, DropError>;
}

/// Administrator-only operations — inbound port.
///
/// Every operation rejects non-admin callers with
/// [`DropError::NotAuthorized`]; setters are unconditional once the admin
/// check and (where present) the cross-field validation pass.
pub trait AdminApi: Send + Sync {
    /// Set the collection capacity.
    fn set_capacity(&self, caller: Address, capacity: u64) -> Result<(), DropError>;

    /// Set the public-phase price per unit.
    fn set_public_price(&self, caller: Address, price: Amount) -> Result<(), DropError>;

    /// Set the public-phase per-holder limit.
    fn set_public_max_per_holder(&self, caller: Address, limit: u64) -> Result<(), DropError>;

    /// Set the allowlist allocation. Rejected if it would exceed capacity.
    fn set_allowlist_allocation(&self, caller: Address, allocation: u64) -> Result<(), DropError>;

    /// Set the allowlist-phase price per unit.
    fn set_allowlist_price(&self, caller: Address, price: Amount) -> Result<(), DropError>;

    /// Set the allowlist-phase per-holder limit.
    fn set_allowlist_max_per_holder(&self, caller: Address, limit: u64) -> Result<(), DropError>;

    /// Replace the committed allowlist root. Proofs built against the old
    /// root stop verifying immediately.
    fn set_allowlist_root(&self, caller: Address, root: Hash) -> Result<(), DropError>;

    /// Set the revealed-metadata base URI.
    fn set_metadata_base(&self, caller: Address, base: String) -> Result<(), DropError>;

    /// Set the pre-reveal placeholder URI.
    fn set_unrevealed_uri(&self, caller: Address, uri: String) -> Result<(), DropError>;

    /// Flip the metadata reveal flag.
    fn toggle_revealed(&self, caller: Address) -> Result<bool, DropError>;

    /// Set the sale phase. Any phase may be set at any time.
    fn set_sale_phase(&self, caller: Address, phase: SalePhase) -> Result<(), DropError>;

    /// Swap the external item registry the service delegates to.
    fn set_registry(
        &self,
        caller: Address,
        registry: Arc<dyn ItemRegistry>,
    ) -> Result<(), DropError>;

    /// Flip the staking-enabled flag.
    fn toggle_staking(&self, caller: Address) -> Result<bool, DropError>;

    /// Force-withdraw staked items, returning each to its original
    /// depositor (never to the caller). Items without a record are skipped.
    fn force_withdraw_many(
        &self,
        caller: Address,
        items: &[ItemId],
    ) -> Result<Vec<StakeOutcome>, DropError>;

    /// Transfer the accumulated payment balance to the administrator.
    /// Returns the amount transferred.
    fn withdraw_funds(&self, caller: Address) -> Result<Amount, DropError>;
}
