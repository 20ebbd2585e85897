//! # Algorithms Module
//!
//! Pure, side-effect-free allowlist membership verification, kept separate
//! from the ledger so it is independently testable.

pub mod allowlist;

pub use allowlist::{
    build_membership_proof, compute_allowlist_root, leaf_hash, verify_membership,
};
