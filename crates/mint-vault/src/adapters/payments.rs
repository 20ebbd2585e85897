//! # Recording Payment Outlet
//!
//! Reference [`PaymentOutlet`] adapter that records every transfer it is
//! asked to make. Stands in for the environment's native value transfer.

use crate::domain::{Address, Amount, DropError};
use crate::ports::PaymentOutlet;
use std::sync::Mutex;

/// Payment outlet that records transfers instead of moving real value.
#[derive(Debug, Default)]
pub struct RecordingPaymentOutlet {
    transfers: Mutex<Vec<(Address, Amount)>>,
}

impl RecordingPaymentOutlet {
    /// Create an outlet with no recorded transfers.
    pub fn new() -> Self {
        Self::default()
    }

    /// All transfers made so far, in order.
    pub fn transfers(&self) -> Vec<(Address, Amount)> {
        self.transfers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Sum of all transferred amounts.
    pub fn total_paid(&self) -> Amount {
        self.transfers().iter().map(|(_, amount)| amount).sum()
    }
}

impl PaymentOutlet for RecordingPaymentOutlet {
    fn pay(&self, to: Address, amount: Amount) -> Result<(), DropError> {
        self.transfers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((to, amount));
        tracing::debug!(amount, "outbound payment recorded");
        Ok(())
    }
}
