//! # Domain Value Objects
//!
//! Immutable value types shared by the issuance ledger and the custody vault.

use serde::{Deserialize, Serialize};

/// Hash type alias (32-byte SHA-256).
pub type Hash = [u8; 32];

/// External account address (20 bytes).
pub type Address = [u8; 20];

/// Identifier of an issued item. Registry-assigned, starts at 1.
pub type ItemId = u64;

/// Payment amount in the smallest currency unit.
pub type Amount = u128;

/// Unix timestamp in seconds. Zero is reserved for "no record".
pub type Timestamp = u64;

/// Identity of the account invoking an operation.
///
/// Issuance distinguishes a direct caller from one routed through an
/// intermediary contract: `address` is the immediate caller, `origin` the
/// account that started the call chain.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Caller {
    /// Immediate caller of the operation.
    pub address: Address,
    /// Originating account of the call chain.
    pub origin: Address,
}

impl Caller {
    /// A caller invoking the service directly.
    pub fn direct(address: Address) -> Self {
        Self {
            address,
            origin: address,
        }
    }

    /// A caller routed through an intermediary.
    pub fn via_intermediary(origin: Address, address: Address) -> Self {
        Self { address, origin }
    }

    /// True when the immediate caller started the call chain itself.
    pub fn is_direct(&self) -> bool {
        self.address == self.origin
    }
}

/// Position of a sibling in a Merkle proof path (left or right).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Position {
    /// Sibling is on the left.
    Left,
    /// Sibling is on the right.
    Right,
}

/// Node in a Merkle proof path.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProofNode {
    /// Hash of the sibling node.
    pub hash: Hash,
    /// Position of the sibling.
    pub position: Position,
}

impl ProofNode {
    /// Create a left sibling node.
    pub fn left(hash: Hash) -> Self {
        Self {
            hash,
            position: Position::Left,
        }
    }

    /// Create a right sibling node.
    pub fn right(hash: Hash) -> Self {
        Self {
            hash,
            position: Position::Right,
        }
    }
}

/// Membership proof for the committed allowlist.
///
/// The proof binds the claimant identity only; it does not bind a claim
/// amount. One valid proof authorizes claims up to the per-holder quota.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MembershipProof {
    /// Sibling path from the identity leaf up to the committed root.
    pub path: Vec<ProofNode>,
}

impl MembershipProof {
    /// Create a proof from a sibling path.
    pub fn new(path: Vec<ProofNode>) -> Self {
        Self { path }
    }

    /// The empty proof (valid only for a single-member allowlist).
    pub fn empty() -> Self {
        Self { path: Vec::new() }
    }
}

/// Per-item outcome of a custody batch operation.
///
/// Batches never fail on a single bad id: items the caller is not entitled
/// to are skipped and the rest are processed. Skipping is not an error and
/// emits no notification.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum StakeOutcome {
    /// The item changed custody; `at` is the record timestamp.
    Processed {
        /// Item that was processed.
        item: ItemId,
        /// Timestamp recorded for the custody change.
        at: Timestamp,
    },
    /// The item was silently skipped.
    Skipped {
        /// Item that was skipped.
        item: ItemId,
    },
}

impl StakeOutcome {
    /// True when the item was processed.
    pub fn is_processed(&self) -> bool {
        matches!(self, StakeOutcome::Processed { .. })
    }

    /// The item this outcome refers to.
    pub fn item(&self) -> ItemId {
        match self {
            StakeOutcome::Processed { item, .. } | StakeOutcome::Skipped { item } => *item,
        }
    }
}

/// Snapshot of the service state for observability.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DropStats {
    /// Maximum number of items that may ever be issued.
    pub capacity: u64,
    /// Items issued so far (both phases).
    pub issued_count: u64,
    /// Sub-quota of capacity reserved for allowlist issuance.
    pub allowlist_allocation: u64,
    /// Current sale phase as its raw discriminant.
    pub sale_phase: u8,
    /// Is staking currently enabled?
    pub staking_enabled: bool,
    /// Has metadata been revealed?
    pub revealed: bool,
    /// Items currently held by the vault.
    pub staked_count: usize,
    /// Accumulated, not-yet-withdrawn payment balance.
    pub balance: Amount,
}
