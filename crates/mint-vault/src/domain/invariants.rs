//! # Domain Invariants
//!
//! Business rules that must hold before any issuance mutates state. The
//! service evaluates these in a fixed order so that when several fail at
//! once, the surfaced error is deterministic: holder quota first, then
//! supply, then phase, then payment.

use super::entities::SalePhase;
use super::errors::DropError;
use super::value_objects::Amount;

/// Invariant: a holder's per-phase issuance never exceeds the phase limit.
pub fn invariant_holder_quota(issued: u64, requested: u64, limit: u64) -> Result<(), DropError> {
    if issued.checked_add(requested).map_or(true, |v| v > limit) {
        return Err(DropError::HolderQuotaExceeded {
            requested,
            issued,
            limit,
        });
    }
    Ok(())
}

/// Invariant: total issuance never exceeds the collection capacity.
pub fn invariant_supply_cap(issued: u64, requested: u64, capacity: u64) -> Result<(), DropError> {
    if issued.checked_add(requested).map_or(true, |v| v > capacity) {
        return Err(DropError::CapacityExceeded {
            requested,
            issued,
            capacity,
        });
    }
    Ok(())
}

/// Invariant: allowlist-phase issuance never exceeds the allowlist
/// allocation.
pub fn invariant_allowlist_cap(
    issued: u64,
    requested: u64,
    allocation: u64,
) -> Result<(), DropError> {
    if issued.checked_add(requested).map_or(true, |v| v > allocation) {
        return Err(DropError::AllowlistCapacityExceeded {
            requested,
            issued,
            allocation,
        });
    }
    Ok(())
}

/// Invariant: the allowlist allocation stays within the collection capacity.
pub fn invariant_allocation_within_capacity(
    allocation: u64,
    capacity: u64,
) -> Result<(), DropError> {
    if allocation > capacity {
        return Err(DropError::InvalidAllowlistConfiguration {
            allocation,
            capacity,
        });
    }
    Ok(())
}

/// Invariant: the operation's required sale phase is the active one.
pub fn invariant_phase_open(current: SalePhase, required: SalePhase) -> Result<(), DropError> {
    if current != required {
        return Err(DropError::PhaseClosed {
            phase: current as u8,
        });
    }
    Ok(())
}

/// Invariant: payment received covers the price of the requested amount.
///
/// Overpayment passes and is kept; it is never refunded.
pub fn invariant_payment_covers(paid: Amount, required: Amount) -> Result<(), DropError> {
    if paid < required {
        return Err(DropError::InsufficientPayment { paid, required });
    }
    Ok(())
}
