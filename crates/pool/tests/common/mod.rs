//! Shared test utilities for shroud-pool tests

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use shroud_core::{compute_ext_data_hash, compute_public_amount, encode_signed, Field};
use shroud_pool::{InMemoryLedger, PoolConfig, ProofVerifier, ShroudPool, TransferRequest};

pub const ADMIN: Address = Address::repeat_byte(0xA1);
pub const RELAYER: Address = Address::repeat_byte(0xB2);
pub const POOL_ACCOUNT: Address = Address::repeat_byte(0xC3);
pub const RECIPIENT: Address = Address::repeat_byte(0xD4);

pub const POOL_FUNDS: u64 = 1_000_000_000;

pub struct AcceptAll;

impl ProofVerifier for AcceptAll {
    fn verify(&self, _proof: &[u8], _public_inputs: &[Field]) -> bool {
        true
    }
}

pub fn funded_pool(height: u32) -> (ShroudPool, Arc<InMemoryLedger>) {
    let ledger = Arc::new(InMemoryLedger::new());
    ledger.credit(POOL_ACCOUNT, U256::from(POOL_FUNDS));

    let config = PoolConfig {
        height,
        deposit_limit: U256::from(1_000_000u64),
        admin: ADMIN,
        asset: Address::repeat_byte(0xE5),
        pool_account: POOL_ACCOUNT,
    };
    let pool = ShroudPool::new(config, Arc::new(AcceptAll), ledger.clone()).unwrap();
    (pool, ledger)
}

/// Build a request consistent with the pool's current root and the binding
/// hash; `seed` differentiates nullifiers, commitments and ciphertexts.
pub fn build_request(
    pool: &ShroudPool,
    magnitude: u64,
    negative: bool,
    fee: u64,
    seed: u64,
) -> TransferRequest {
    let ext_amount = encode_signed(U256::from(magnitude), negative);
    let fee = U256::from(fee);
    let recipient = if negative { RECIPIENT } else { Address::ZERO };
    let ciphertext1 = seed.to_be_bytes().to_vec();
    let ciphertext2 = (seed + 1).to_be_bytes().to_vec();
    let ext_data_hash =
        compute_ext_data_hash(recipient, ext_amount, RELAYER, fee, &ciphertext1, &ciphertext2);
    let public_amount = compute_public_amount(ext_amount, fee).unwrap();

    TransferRequest {
        proof: vec![0u8; 8],
        root: pool.current_root(),
        input_nullifiers: [Field::from(seed * 2 + 1), Field::from(seed * 2 + 2)],
        output_commitments: vec![Field::from(seed * 10 + 1), Field::from(seed * 10 + 2)],
        public_amount,
        ext_data_hash,
        recipient,
        ext_amount,
        relayer: RELAYER,
        fee,
        ciphertext1,
        ciphertext2,
    }
}
