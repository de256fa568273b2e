//! Binding hash over public transaction metadata.
//!
//! The circuit commits to one field element covering recipient, signed
//! external amount, relayer, fee and both output ciphertexts. The pool
//! recomputes it from the cleartext request; a mismatch means the metadata
//! was altered after proving.
//!
//! Serialization is fixed and big-endian: recipient and relayer left-padded
//! to 32 bytes, ext_amount and fee as 32-byte words, then each ciphertext as
//! a 4-byte length prefix followed by its raw bytes. The keccak256 digest of
//! the buffer is reduced into the field.

use alloy_primitives::{Address, U256};
use ark_ff::{BigInteger, PrimeField};
use sha3::{Digest, Keccak256};

use crate::Field;

/// Hash the external data exactly as the prover does.
pub fn compute_ext_data_hash(
    recipient: Address,
    ext_amount: Field,
    relayer: Address,
    fee: U256,
    ciphertext1: &[u8],
    ciphertext2: &[u8],
) -> Field {
    let mut buffer =
        Vec::with_capacity(128 + 8 + ciphertext1.len() + ciphertext2.len());

    buffer.extend_from_slice(&pad_address(recipient));
    buffer.extend_from_slice(&ext_amount.into_bigint().to_bytes_be());
    buffer.extend_from_slice(&pad_address(relayer));
    buffer.extend_from_slice(&fee.to_be_bytes::<32>());

    buffer.extend_from_slice(&(ciphertext1.len() as u32).to_be_bytes());
    buffer.extend_from_slice(ciphertext1);
    buffer.extend_from_slice(&(ciphertext2.len() as u32).to_be_bytes());
    buffer.extend_from_slice(ciphertext2);

    let digest = Keccak256::digest(&buffer);
    Field::from_be_bytes_mod_order(&digest)
}

fn pad_address(addr: Address) -> [u8; 32] {
    let mut padded = [0u8; 32];
    padded[12..32].copy_from_slice(addr.as_slice());
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::UniformRand;

    fn sample() -> (Address, Field, Address, U256) {
        (
            Address::repeat_byte(0x11),
            Field::from(5000u64),
            Address::repeat_byte(0x22),
            U256::from(75u64),
        )
    }

    #[test]
    fn deterministic() {
        let (recipient, amount, relayer, fee) = sample();
        let h1 = compute_ext_data_hash(recipient, amount, relayer, fee, b"a", b"b");
        let h2 = compute_ext_data_hash(recipient, amount, relayer, fee, b"a", b"b");
        assert_eq!(h1, h2);
    }

    #[test]
    fn every_field_is_binding() {
        let (recipient, amount, relayer, fee) = sample();
        let mut rng = rand::thread_rng();
        let base = compute_ext_data_hash(recipient, amount, relayer, fee, b"ct1", b"ct2");

        let variants = [
            compute_ext_data_hash(Address::repeat_byte(0x33), amount, relayer, fee, b"ct1", b"ct2"),
            compute_ext_data_hash(recipient, Field::rand(&mut rng), relayer, fee, b"ct1", b"ct2"),
            compute_ext_data_hash(recipient, amount, Address::repeat_byte(0x44), fee, b"ct1", b"ct2"),
            compute_ext_data_hash(recipient, amount, relayer, U256::from(76u64), b"ct1", b"ct2"),
            compute_ext_data_hash(recipient, amount, relayer, fee, b"ct9", b"ct2"),
            compute_ext_data_hash(recipient, amount, relayer, fee, b"ct1", b"ct9"),
        ];
        for variant in variants {
            assert_ne!(base, variant);
        }
    }

    #[test]
    fn length_prefix_separates_ciphertexts() {
        let (recipient, amount, relayer, fee) = sample();
        let h1 = compute_ext_data_hash(recipient, amount, relayer, fee, b"ab", b"");
        let h2 = compute_ext_data_hash(recipient, amount, relayer, fee, b"a", b"b");
        assert_ne!(h1, h2);
    }
}
