//! # Adapters Layer (Hexagonal Architecture)
//!
//! Reference implementations of the outbound ports.

mod memory_registry;
mod payments;

pub use memory_registry::InMemoryItemRegistry;
pub use payments::RecordingPaymentOutlet;
