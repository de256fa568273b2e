//! Persisted pool state.
//!
//! Fixed big-endian layout, written and read field by field:
//!
//! ```text
//! height            u8
//! filled_subtrees   height x 32 bytes
//! root_history      100 x 32 bytes
//! root_cursor       u8
//! next_leaf_index   u32
//! spent_count       u32
//! spent_nullifiers  spent_count x 32 bytes, ascending
//! deposit_limit     32 bytes
//! admin             20 bytes
//! asset             20 bytes
//! pool_account      20 bytes
//! ```

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use ark_ff::{BigInteger, PrimeField, Zero};
use thiserror::Error;

use shroud_core::{CommitmentTree, Field, NullifierRegistry, ROOT_HISTORY_SIZE};

use crate::config::PoolConfig;
use crate::engine::ShroudPool;
use crate::error::PoolResult;
use crate::ledger::AssetLedger;
use crate::verifier::ProofVerifier;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Snapshot malformed at {0}")]
    Malformed(&'static str),
}

pub(crate) fn encode(pool: &ShroudPool) -> Vec<u8> {
    let tree = pool.tree();
    let spent = pool.spent();
    let config = pool.config();

    let mut bytes = Vec::with_capacity(
        1 + tree.filled_subtrees().len() * 32
            + ROOT_HISTORY_SIZE * 32
            + 1
            + 4
            + 4
            + spent.len() * 32
            + 32
            + 60,
    );

    bytes.push(tree.height() as u8);
    for node in tree.filled_subtrees() {
        bytes.extend_from_slice(&node.into_bigint().to_bytes_be());
    }
    for root in tree.root_history() {
        bytes.extend_from_slice(&root.into_bigint().to_bytes_be());
    }
    bytes.push(tree.root_cursor() as u8);
    bytes.extend_from_slice(&tree.next_leaf_index().to_be_bytes());

    bytes.extend_from_slice(&(spent.len() as u32).to_be_bytes());
    for nullifier in spent.iter() {
        bytes.extend_from_slice(&nullifier.into_bigint().to_bytes_be());
    }

    bytes.extend_from_slice(&config.deposit_limit.to_be_bytes::<32>());
    bytes.extend_from_slice(config.admin.as_slice());
    bytes.extend_from_slice(config.asset.as_slice());
    bytes.extend_from_slice(config.pool_account.as_slice());

    bytes
}

pub(crate) fn decode(
    bytes: &[u8],
    verifier: Arc<dyn ProofVerifier>,
    ledger: Arc<dyn AssetLedger>,
) -> PoolResult<ShroudPool> {
    let mut reader = Reader { bytes, offset: 0 };

    let height = reader.take_u8("height")? as u32;
    let mut filled_subtrees = Vec::with_capacity(height as usize);
    for _ in 0..height {
        filled_subtrees.push(reader.take_field("filled subtree")?);
    }
    let mut roots = [Field::zero(); ROOT_HISTORY_SIZE];
    for slot in roots.iter_mut() {
        *slot = reader.take_field("root history")?;
    }
    let root_cursor = reader.take_u8("root cursor")? as usize;
    let next_leaf_index = reader.take_u32("next leaf index")?;

    let spent_count = reader.take_u32("spent count")? as usize;
    // bound the claim by the bytes actually present before allocating
    if spent_count > reader.remaining() / 32 {
        return Err(SnapshotError::Malformed("spent count").into());
    }
    let mut entries = Vec::with_capacity(spent_count);
    for _ in 0..spent_count {
        entries.push(reader.take_field("nullifier")?);
    }

    let deposit_limit = U256::from_be_slice(reader.take("deposit limit", 32)?);
    let admin = Address::from_slice(reader.take("admin", 20)?);
    let asset = Address::from_slice(reader.take("asset", 20)?);
    let pool_account = Address::from_slice(reader.take("pool account", 20)?);

    if reader.offset != bytes.len() {
        return Err(SnapshotError::Malformed("trailing bytes").into());
    }

    let tree =
        CommitmentTree::from_saved(height, filled_subtrees, roots, root_cursor, next_leaf_index)?;
    let config = PoolConfig {
        height,
        deposit_limit,
        admin,
        asset,
        pool_account,
    };

    Ok(ShroudPool::from_parts(
        config,
        tree,
        NullifierRegistry::from_spent(entries),
        verifier,
        ledger,
    ))
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, what: &'static str, len: usize) -> Result<&'a [u8], SnapshotError> {
        let end = self
            .offset
            .checked_add(len)
            .ok_or(SnapshotError::Malformed(what))?;
        if end > self.bytes.len() {
            return Err(SnapshotError::Malformed(what));
        }
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn take_u8(&mut self, what: &'static str) -> Result<u8, SnapshotError> {
        Ok(self.take(what, 1)?[0])
    }

    fn take_u32(&mut self, what: &'static str) -> Result<u32, SnapshotError> {
        let slice = self.take(what, 4)?;
        Ok(u32::from_be_bytes([slice[0], slice[1], slice[2], slice[3]]))
    }

    fn take_field(&mut self, what: &'static str) -> Result<Field, SnapshotError> {
        let slice = self.take(what, 32)?;
        let value = Field::from_be_bytes_mod_order(slice);
        // only canonical encodings round-trip; anything >= p does not
        if value.into_bigint().to_bytes_be() != slice {
            return Err(SnapshotError::Malformed(what));
        }
        Ok(value)
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }
}
