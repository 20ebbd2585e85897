//! # Custody Notifications
//!
//! Notification payloads emitted once per processed item in a custody batch.
//! Skipped items emit nothing and are indistinguishable from absent ones on
//! this channel. Payloads are serialized to JSON and logged under the
//! [`EVENT_TARGET`] tracing target.

use crate::domain::{Address, ItemId, Timestamp};
use serde::{Deserialize, Serialize};

/// Tracing target carrying the JSON notification stream.
pub const EVENT_TARGET: &str = "mint_vault::events";

/// A custody notification.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VaultEvent {
    /// An item entered the vault.
    Staked {
        /// Depositing holder.
        holder: Address,
        /// Item deposited.
        item: ItemId,
        /// Deposit time.
        timestamp: Timestamp,
    },
    /// An item left the vault. For forced withdrawal, `holder` is the
    /// original depositor, never the administrator.
    Unstaked {
        /// Holder custody was returned to.
        holder: Address,
        /// Item withdrawn.
        item: ItemId,
        /// Withdrawal time.
        timestamp: Timestamp,
    },
}

/// Emit a notification onto the event log.
pub fn emit(event: &VaultEvent) {
    match serde_json::to_string(event) {
        Ok(json) => tracing::info!(target: EVENT_TARGET, "{json}"),
        Err(e) => tracing::warn!(target: EVENT_TARGET, "unserializable event: {e}"),
    }
}
