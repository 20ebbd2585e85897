//! # Drop Configuration
//!
//! Configuration for the drop service: initial capacity, phase allocations,
//! pricing, and the metadata/staking toggles. Constructed with defaults at
//! startup and thereafter mutated only through the validated admin surface.

use crate::domain::{Address, Amount, Hash};
use serde::{Deserialize, Serialize};

/// Drop service configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DropConfig {
    /// Initial collection capacity (maximum items ever issued).
    pub capacity: u64,

    /// Price per unit during the public phase.
    pub public_price: Amount,

    /// Per-holder issuance limit during the public phase.
    pub public_max_per_holder: u64,

    /// Sub-quota of capacity reserved for allowlist-phase issuance.
    /// Must not exceed `capacity`.
    pub allowlist_allocation: u64,

    /// Price per unit during the allowlist phase.
    pub allowlist_price: Amount,

    /// Per-holder issuance limit during the allowlist phase.
    pub allowlist_max_per_holder: u64,

    /// Committed allowlist membership root.
    pub allowlist_root: Hash,

    /// Base URI prefix for revealed item metadata.
    pub metadata_base: String,

    /// URI served for every item while metadata is unrevealed.
    pub unrevealed_uri: String,

    /// Has item metadata been revealed?
    pub revealed: bool,

    /// Are deposits into the vault currently accepted?
    pub staking_enabled: bool,

    /// Registry address under which the vault holds deposited items.
    pub vault_address: Address,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            public_price: 80_000_000_000_000_000, // 0.08 in 10^18 units
            public_max_per_holder: 5,
            allowlist_allocation: 2_000,
            allowlist_price: 60_000_000_000_000_000,
            allowlist_max_per_holder: 2,
            allowlist_root: [0u8; 32],
            metadata_base: String::new(),
            unrevealed_uri: String::new(),
            revealed: false,
            staking_enabled: false,
            vault_address: [0xFEu8; 20],
        }
    }
}

impl DropConfig {
    /// Create a config for testing (small caps, unit prices, staking on).
    pub fn for_testing() -> Self {
        Self {
            capacity: 10,
            public_price: 100,
            public_max_per_holder: 3,
            allowlist_allocation: 5,
            allowlist_price: 50,
            allowlist_max_per_holder: 2,
            allowlist_root: [0u8; 32],
            metadata_base: "ipfs://drop/".to_string(),
            unrevealed_uri: "ipfs://drop/hidden.json".to_string(),
            revealed: false,
            staking_enabled: true,
            vault_address: [0xFEu8; 20],
        }
    }
}
