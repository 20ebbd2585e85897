//! # Domain Errors
//!
//! Error types for issuance and custody. Every error aborts the whole
//! operation with no partial effect; nothing is retried internally.

use super::value_objects::Amount;
use thiserror::Error;

/// Issuance and custody error types.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DropError {
    /// Caller lacks the rights for this operation: non-admin invoking an
    /// admin-only operation, indirect caller on issuance, or a depositor
    /// without operator approval for the vault.
    #[error("caller not authorized for this operation")]
    NotAuthorized,

    /// Allowlist allocation may not exceed the collection capacity.
    #[error("allowlist allocation {allocation} exceeds capacity {capacity}")]
    InvalidAllowlistConfiguration {
        /// Requested allocation.
        allocation: u64,
        /// Current collection capacity.
        capacity: u64,
    },

    /// The holder's per-phase quota would be exceeded.
    #[error("holder quota exceeded: {issued} issued + {requested} requested > {limit}")]
    HolderQuotaExceeded {
        /// Amount requested in this call.
        requested: u64,
        /// Amount the holder has already issued in this phase.
        issued: u64,
        /// Per-holder limit for this phase.
        limit: u64,
    },

    /// The collection capacity would be exceeded.
    #[error("capacity exceeded: {issued} issued + {requested} requested > {capacity}")]
    CapacityExceeded {
        /// Amount requested in this call.
        requested: u64,
        /// Items issued so far.
        issued: u64,
        /// Collection capacity.
        capacity: u64,
    },

    /// The allowlist allocation would be exceeded.
    #[error("allowlist allocation exceeded: {issued} issued + {requested} requested > {allocation}")]
    AllowlistCapacityExceeded {
        /// Amount requested in this call.
        requested: u64,
        /// Items issued so far.
        issued: u64,
        /// Allowlist allocation.
        allocation: u64,
    },

    /// The sale phase does not admit this operation.
    #[error("sale phase {phase} is closed for this operation")]
    PhaseClosed {
        /// Raw discriminant of the current phase.
        phase: u8,
    },

    /// Payment does not cover the requested amount.
    #[error("insufficient payment: {paid} < {required}")]
    InsufficientPayment {
        /// Payment received.
        paid: Amount,
        /// Payment required.
        required: Amount,
    },

    /// The membership proof does not verify against the current root.
    #[error("membership proof verification failed")]
    InvalidMembershipProof,

    /// Issuance amount must be positive.
    #[error("issuance amount must be positive")]
    InvalidAmount,

    /// Deposits are rejected while staking is disabled.
    #[error("staking is disabled")]
    StakingDisabled,

    /// Raw phase value does not name a sale phase.
    #[error("invalid sale phase value: {0}")]
    InvalidPhaseValue(u8),

    /// The external item registry reported a failure.
    #[error("registry failure: {0}")]
    Registry(String),

    /// The outbound payment transfer failed.
    #[error("payment transfer failed: {0}")]
    PaymentFailed(String),

    /// The service state lock was poisoned by a panicking operation.
    #[error("service state poisoned")]
    StatePoisoned,
}
