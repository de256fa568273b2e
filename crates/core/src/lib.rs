//! Proof-domain primitives for the Shroud shielded pool: everything a pool
//! deployment and its prover must agree on bit-for-bit.

pub mod ext_data;
pub mod field;
pub mod merkle;
pub mod nullifier;
pub mod poseidon;

pub use ext_data::compute_ext_data_hash;
pub use field::{
    compute_public_amount, decode_signed, encode_signed, field_to_u256, u256_to_field, AmountError,
    MAX_EXT_AMOUNT, MAX_FEE,
};
pub use merkle::{CommitmentTree, MerkleError, MAX_HEIGHT, ROOT_HISTORY_SIZE, ZERO_LEAF};
pub use nullifier::{NullifierError, NullifierRegistry};
pub use poseidon::hash2;

pub type Field = ark_bn254::Fr;
