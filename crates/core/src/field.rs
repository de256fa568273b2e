//! Signed amounts over the BN254 scalar field.
//!
//! External amounts are signed quantities carried as field elements: a
//! nonnegative value maps to itself, a negative value of magnitude m maps to
//! p - m. The proving circuit uses the same convention, so the pool and the
//! prover agree on every identity below. Values in [0, (p-1)/2] read as
//! nonnegative, everything above as negative.

use alloy_primitives::U256;
use ark_ff::{BigInteger, PrimeField};
use thiserror::Error;

use crate::Field;

/// Ceiling for the magnitude of an external amount (2^248).
pub const MAX_EXT_AMOUNT: U256 = U256::from_limbs([0, 0, 0, 1 << 56]);

/// Ceiling for a relayer fee (2^248).
pub const MAX_FEE: U256 = U256::from_limbs([0, 0, 0, 1 << 56]);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("External amount magnitude exceeds 2^248")]
    InvalidExtAmount,

    #[error("Fee exceeds 2^248")]
    InvalidFee,
}

/// Encode a signed magnitude as a field element.
pub fn encode_signed(magnitude: U256, negative: bool) -> Field {
    let value = u256_to_field(magnitude);
    if negative {
        -value
    } else {
        value
    }
}

/// Decode a field element back into `(magnitude, is_negative)`.
pub fn decode_signed(value: Field) -> (U256, bool) {
    if value.into_bigint() <= Field::MODULUS_MINUS_ONE_DIV_TWO {
        (field_to_u256(value), false)
    } else {
        (field_to_u256(-value), true)
    }
}

/// Net value entering the note set: `ext_amount - fee` in the field.
///
/// The single subtraction covers both signed branches: for a nonnegative
/// ext_amount it is the literal difference, for a negative one the result
/// wraps to p - (|ext_amount| + fee). Magnitudes at or above 2^248 are
/// rejected before any arithmetic.
pub fn compute_public_amount(ext_amount: Field, fee: U256) -> Result<Field, AmountError> {
    if fee >= MAX_FEE {
        return Err(AmountError::InvalidFee);
    }
    let (magnitude, _) = decode_signed(ext_amount);
    if magnitude >= MAX_EXT_AMOUNT {
        return Err(AmountError::InvalidExtAmount);
    }
    Ok(ext_amount - u256_to_field(fee))
}

/// Interpret a U256 as a field element (reduced mod p).
pub fn u256_to_field(value: U256) -> Field {
    Field::from_be_bytes_mod_order(&value.to_be_bytes::<32>())
}

/// Canonical big-endian representation of a field element, as a U256.
pub fn field_to_u256(value: Field) -> U256 {
    U256::from_be_slice(&value.into_bigint().to_bytes_be())
}
