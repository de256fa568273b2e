//! Transaction processing engine.
//!
//! `ShroudPool` owns the commitment tree, the nullifier registry and the
//! pool configuration, and drives every submission through the same strictly
//! ordered pipeline:
//!
//! ```text
//! TransferRequest
//!        │
//!        ▼
//! ┌──────────────────┐  shape, known root, unspent nullifiers,
//! │ validate         │  ext-data binding, amount identity,
//! │ (pure)           │  limit / zero-address policy, capacity
//! └──────────────────┘
//!        │
//!        ▼
//! ┌──────────────────┐
//! │ verify proof     │  opaque verifier verdict
//! └──────────────────┘
//!        │
//!        ▼
//! ┌──────────────────┐  withdrawal payout and relayer fee through
//! │ settle           │  the asset ledger
//! └──────────────────┘
//!        │
//!        ▼
//! ┌──────────────────┐  mark nullifiers, insert the commitment
//! │ commit           │  pair, advance the root window
//! └──────────────────┘
//! ```
//!
//! Nothing is mutated until every fallible step has passed, so a rejected
//! request leaves the pool exactly as it was. The struct is synchronous and
//! expects a single writer; wrap it in
//! [`SharedPool`](crate::shared::SharedPool) when submitters race.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use ark_ff::{BigInteger, PrimeField};

use shroud_core::{
    compute_ext_data_hash, compute_public_amount, decode_signed, CommitmentTree, Field,
    MerkleError, NullifierRegistry,
};

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::ledger::AssetLedger;
use crate::request::{Receipt, Settlement, TransferRequest};
use crate::verifier::ProofVerifier;

/// Shielded pool state machine.
#[derive(Clone)]
pub struct ShroudPool {
    config: PoolConfig,
    tree: CommitmentTree,
    spent: NullifierRegistry,
    verifier: Arc<dyn ProofVerifier>,
    ledger: Arc<dyn AssetLedger>,
}

impl ShroudPool {
    /// Create a pool with an empty tree of `config.height`.
    pub fn new(
        config: PoolConfig,
        verifier: Arc<dyn ProofVerifier>,
        ledger: Arc<dyn AssetLedger>,
    ) -> PoolResult<Self> {
        let tree = CommitmentTree::new(config.height)?;
        Ok(Self {
            config,
            tree,
            spent: NullifierRegistry::new(),
            verifier,
            ledger,
        })
    }

    pub(crate) fn from_parts(
        config: PoolConfig,
        tree: CommitmentTree,
        spent: NullifierRegistry,
        verifier: Arc<dyn ProofVerifier>,
        ledger: Arc<dyn AssetLedger>,
    ) -> Self {
        Self {
            config,
            tree,
            spent,
            verifier,
            ledger,
        }
    }

    /// Root written by the most recent accepted transaction.
    pub fn current_root(&self) -> Field {
        self.tree.current_root()
    }

    /// Whether `root` is still a valid proof anchor.
    pub fn is_known_root(&self, root: Field) -> bool {
        self.tree.is_known_root(root)
    }

    /// Whether an input note has been consumed.
    pub fn is_spent(&self, nullifier: Field) -> bool {
        self.spent.contains(nullifier)
    }

    /// Batch form of [`is_spent`](Self::is_spent).
    pub fn spent_status(&self, nullifiers: &[Field]) -> Vec<bool> {
        nullifiers.iter().map(|nf| self.spent.contains(*nf)).collect()
    }

    /// Index the next commitment pair will occupy.
    pub fn next_leaf_index(&self) -> u32 {
        self.tree.next_leaf_index()
    }

    pub fn deposit_limit(&self) -> U256 {
        self.config.deposit_limit
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub(crate) fn tree(&self) -> &CommitmentTree {
        &self.tree
    }

    pub(crate) fn spent(&self) -> &NullifierRegistry {
        &self.spent
    }

    /// Retune the single-deposit ceiling. Admin only.
    pub fn configure_deposit_limit(&mut self, caller: Address, new_limit: U256) -> PoolResult<()> {
        if caller != self.config.admin {
            return Err(PoolError::Unauthorized);
        }
        self.config.deposit_limit = new_limit;
        tracing::info!("Deposit limit set to {}", new_limit);
        Ok(())
    }

    /// Validate, verify, settle and commit one transaction.
    ///
    /// Checks run in a fixed order and the first failure wins. The commit
    /// phase starts only after the verifier verdict and every ledger call
    /// have succeeded, and nothing in it can fail.
    pub fn process(&mut self, request: &TransferRequest) -> PoolResult<Receipt> {
        // shape first: everything below assumes exactly two outputs
        if request.output_commitments.len() != 2 {
            return Err(PoolError::InvalidProof);
        }

        if !self.tree.is_known_root(request.root) {
            return Err(PoolError::InvalidMerkleRoot);
        }

        let [nf_a, nf_b] = request.input_nullifiers;
        if nf_a == nf_b || self.spent.contains(nf_a) || self.spent.contains(nf_b) {
            return Err(PoolError::NullifierAlreadySpent);
        }

        let expected_hash = compute_ext_data_hash(
            request.recipient,
            request.ext_amount,
            request.relayer,
            request.fee,
            &request.ciphertext1,
            &request.ciphertext2,
        );
        if expected_hash != request.ext_data_hash {
            return Err(PoolError::InvalidExternalDataHash);
        }

        if compute_public_amount(request.ext_amount, request.fee)? != request.public_amount {
            return Err(PoolError::InvalidPublicAmount);
        }

        let (magnitude, negative) = decode_signed(request.ext_amount);
        let settlement = if negative {
            if request.recipient == Address::ZERO {
                return Err(PoolError::WithdrawalToZeroAddress);
            }
            Settlement::Withdrawal {
                recipient: request.recipient,
                amount: magnitude,
            }
        } else {
            if magnitude > self.config.deposit_limit {
                return Err(PoolError::AmountExceedsLimit(
                    magnitude,
                    self.config.deposit_limit,
                ));
            }
            Settlement::Deposit { amount: magnitude }
        };

        // capacity now, so the commit phase below cannot fail
        if self.tree.is_full() {
            return Err(
                MerkleError::TreeFull(self.tree.next_leaf_index(), self.tree.height()).into(),
            );
        }

        if !self.verifier.verify(&request.proof, &request.public_inputs()) {
            return Err(PoolError::InvalidProof);
        }

        // external settlement precedes internal mutation: a ledger failure
        // must leave the tree and the registry untouched
        if let Settlement::Withdrawal { recipient, amount } = &settlement {
            self.ledger
                .transfer(self.config.pool_account, *recipient, *amount)?;
        }
        if !request.fee.is_zero() {
            self.ledger
                .transfer(self.config.pool_account, request.relayer, request.fee)?;
        }

        self.spent.mark_spent(nf_a)?;
        self.spent.mark_spent(nf_b)?;
        let base_index = self
            .tree
            .insert_pair(request.output_commitments[0], request.output_commitments[1])?;

        tracing::info!(
            "Accepted transaction: base_index={}, nf_a={}, nf_b={}, new_root={}",
            base_index,
            field_hex(nf_a),
            field_hex(nf_b),
            field_hex(self.tree.current_root()),
        );

        Ok(Receipt {
            spent_nullifiers: [nf_a, nf_b],
            base_index,
            settlement,
        })
    }

    /// Serialize the full pool state.
    pub fn snapshot(&self) -> Vec<u8> {
        crate::snapshot::encode(self)
    }

    /// Rebuild a pool from [`snapshot`](Self::snapshot) bytes.
    pub fn restore(
        bytes: &[u8],
        verifier: Arc<dyn ProofVerifier>,
        ledger: Arc<dyn AssetLedger>,
    ) -> PoolResult<Self> {
        crate::snapshot::decode(bytes, verifier, ledger)
    }
}

impl std::fmt::Debug for ShroudPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShroudPool")
            .field("config", &self.config)
            .field("next_leaf_index", &self.tree.next_leaf_index())
            .field("spent_count", &self.spent.len())
            .field("verifier", &"<dyn ProofVerifier>")
            .field("ledger", &"<dyn AssetLedger>")
            .finish()
    }
}

fn field_hex(value: Field) -> String {
    hex::encode(value.into_bigint().to_bytes_be())
}
