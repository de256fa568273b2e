//! Concurrent pool handle.
//!
//! All mutation goes through one writer lock held for the whole
//! validate-verify-settle-commit sequence, so two racing submissions of the
//! same nullifier can never both pass the unspent check. Queries share a
//! read lock.

use std::sync::{Arc, RwLock};

use alloy_primitives::{Address, U256};

use shroud_core::Field;

use crate::engine::ShroudPool;
use crate::error::PoolResult;
use crate::request::{Receipt, TransferRequest};

/// Cloneable, thread-safe wrapper around [`ShroudPool`].
#[derive(Clone)]
pub struct SharedPool {
    inner: Arc<RwLock<ShroudPool>>,
}

impl SharedPool {
    pub fn new(pool: ShroudPool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(pool)),
        }
    }

    pub fn process(&self, request: &TransferRequest) -> PoolResult<Receipt> {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .process(request)
    }

    pub fn configure_deposit_limit(&self, caller: Address, new_limit: U256) -> PoolResult<()> {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .configure_deposit_limit(caller, new_limit)
    }

    pub fn is_spent(&self, nullifier: Field) -> bool {
        self.read().is_spent(nullifier)
    }

    pub fn spent_status(&self, nullifiers: &[Field]) -> Vec<bool> {
        self.read().spent_status(nullifiers)
    }

    pub fn current_root(&self) -> Field {
        self.read().current_root()
    }

    pub fn is_known_root(&self, root: Field) -> bool {
        self.read().is_known_root(root)
    }

    pub fn next_leaf_index(&self) -> u32 {
        self.read().next_leaf_index()
    }

    pub fn deposit_limit(&self) -> U256 {
        self.read().deposit_limit()
    }

    pub fn snapshot(&self) -> Vec<u8> {
        self.read().snapshot()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ShroudPool> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }
}
