//! Asset custody seam.
//!
//! The engine never touches balances directly; every movement of funds goes
//! through the [`AssetLedger`] capability, so a deployment can bind the pool
//! to whatever settlement backend holds the escrowed asset.

use std::collections::BTreeMap;
use std::sync::Mutex;

use alloy_primitives::{Address, U256};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient funds in {0}")]
    InsufficientFunds(Address),

    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// Moves the pool's configured asset between ledger accounts.
///
/// The engine issues at most two transfers per transaction (withdrawal
/// payout, then relayer fee) and aborts on the first failure without any
/// internal state change. Implementations must not apply a transfer
/// partially.
pub trait AssetLedger: Send + Sync {
    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), TransferError>;
}

/// Balance-map ledger for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: Mutex<BTreeMap<Address, U256>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account balance.
    pub fn credit(&self, account: Address, amount: U256) {
        let mut balances = self.balances.lock().unwrap_or_else(|e| e.into_inner());
        let entry = balances.entry(account).or_insert(U256::ZERO);
        *entry = entry.saturating_add(amount);
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&account)
            .copied()
            .unwrap_or(U256::ZERO)
    }
}

impl AssetLedger for InMemoryLedger {
    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), TransferError> {
        if amount.is_zero() {
            return Ok(());
        }

        let mut balances = self.balances.lock().unwrap_or_else(|e| e.into_inner());
        let from_balance = balances.get(&from).copied().unwrap_or(U256::ZERO);
        if from_balance < amount {
            return Err(TransferError::InsufficientFunds(from));
        }

        balances.insert(from, from_balance - amount);
        let to_balance = balances.get(&to).copied().unwrap_or(U256::ZERO);
        balances.insert(to, to_balance.saturating_add(amount));
        Ok(())
    }
}
