//! Randomized invariant checks over arbitrary operation sequences.

pub mod supply;
