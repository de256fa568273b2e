//! Error types for the pool engine

use alloy_primitives::U256;
use thiserror::Error;

use shroud_core::{AmountError, MerkleError, NullifierError};

use crate::ledger::TransferError;
use crate::snapshot::SnapshotError;

/// Terminal rejection reasons. A rejected request leaves the pool untouched.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Tree error: {0}")]
    Tree(#[from] MerkleError),

    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),

    #[error("Unknown merkle root")]
    InvalidMerkleRoot,

    #[error("Nullifier already spent")]
    NullifierAlreadySpent,

    #[error("External data hash mismatch")]
    InvalidExternalDataHash,

    #[error("Public amount does not equal ext amount minus fee")]
    InvalidPublicAmount,

    #[error("Proof rejected")]
    InvalidProof,

    #[error("Deposit of {0} exceeds limit {1}")]
    AmountExceedsLimit(U256, U256),

    #[error("Withdrawal to the zero address")]
    WithdrawalToZeroAddress,

    #[error("Caller is not the pool admin")]
    Unauthorized,

    #[error("Asset transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl From<NullifierError> for PoolError {
    fn from(_: NullifierError) -> Self {
        PoolError::NullifierAlreadySpent
    }
}

pub type PoolResult<T> = Result<T, PoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_render_with_their_sources() {
        assert_eq!(PoolError::InvalidMerkleRoot.to_string(), "Unknown merkle root");
        assert_eq!(
            PoolError::from(MerkleError::InvalidHeight(0)).to_string(),
            "Tree error: Tree height 0 outside supported range 1..=31"
        );
        assert_eq!(
            PoolError::from(NullifierError::AlreadySpent).to_string(),
            "Nullifier already spent"
        );
        assert_eq!(
            PoolError::from(TransferError::Rejected("paused".into())).to_string(),
            "Asset transfer failed: Transfer rejected: paused"
        );
    }
}
