//! # Mint Vault
//!
//! Phased item issuance with an allowlist gate and an integrated custody vault.
//!
//! ## Purpose
//!
//! Run a capped "drop": mint items against a fixed capacity across two sale
//! phases (allowlist, then public), with:
//! - Per-holder quotas enforced independently per phase
//! - Merkle-proof membership checks for the allowlist phase
//! - A custody vault recording depositor and deposit time per item
//! - An admin surface for pricing, phase control, reveal, and fund sweeps
//!
//! ## Atomicity
//!
//! Every operation validates first and mutates second, inside a single
//! critical section. Partial failures roll back: a registry error during a
//! mint restores the supply and holder counters, and a transfer failure in
//! the middle of a custody batch undoes the already-processed prefix.
//!
//! ## Module Structure
//!
//! ```text
//! mint-vault/
//! ├── domain/          # Core types: Collection, HolderRecord, Vault, errors
//! ├── algorithms/      # Allowlist Merkle hashing, proof build/verify
//! ├── ports/           # API traits (inbound) + dependency traits (outbound)
//! ├── adapters/        # In-memory registry and recording payment outlet
//! ├── application/     # DropService orchestrating everything
//! ├── events.rs        # Structured stake/unstake events
//! └── config.rs        # DropConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod events;
pub mod ports;

// Re-exports
pub use algorithms::{build_membership_proof, compute_allowlist_root, leaf_hash, verify_membership};
pub use application::DropService;
pub use config::DropConfig;
pub use domain::{
    invariant_allocation_within_capacity, invariant_allowlist_cap, invariant_holder_quota,
    invariant_payment_covers, invariant_phase_open, invariant_supply_cap, Address, Amount, Caller,
    Collection, DropError, DropStats, Hash, HolderRecord, ItemId, MembershipProof, Position,
    ProofNode, SalePhase, StakeOutcome, StakeRecord, Timestamp, Vault,
};
pub use adapters::{InMemoryItemRegistry, RecordingPaymentOutlet};
pub use events::VaultEvent;
pub use ports::{AdminApi, DropApi, ItemRegistry, MockPaymentOutlet, MockRegistry, PaymentOutlet};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
