//! Transfer requests and receipts.

use alloy_primitives::{Address, U256};

use shroud_core::Field;

/// A proof-carrying transaction submitted to the pool.
///
/// `ext_amount` uses the signed-in-field encoding: values at or below
/// (p-1)/2 are deposits into the pool, values above encode negative amounts,
/// i.e. withdrawals.
#[derive(Clone, Debug)]
pub struct TransferRequest {
    /// Opaque proof bytes, passed through to the verifier
    pub proof: Vec<u8>,
    /// Tree root the proof was built against
    pub root: Field,
    /// Nullifiers of the two consumed input notes
    pub input_nullifiers: [Field; 2],
    /// Commitments of the freshly created output notes; exactly two
    pub output_commitments: Vec<Field>,
    /// Net value entering the note set: ext_amount - fee, in the field
    pub public_amount: Field,
    /// Binding hash over the external fields below
    pub ext_data_hash: Field,
    /// Withdrawal destination; ignored for deposits
    pub recipient: Address,
    /// Signed external amount
    pub ext_amount: Field,
    /// Fee destination
    pub relayer: Address,
    /// Relayer fee, paid out of the pool account
    pub fee: U256,
    /// Encrypted payload for the first output note
    pub ciphertext1: Vec<u8>,
    /// Encrypted payload for the second output note
    pub ciphertext2: Vec<u8>,
}

impl TransferRequest {
    /// Public inputs in the order the circuit expects: root, public amount,
    /// ext data hash, both nullifiers, both commitments.
    pub fn public_inputs(&self) -> Vec<Field> {
        let mut inputs = Vec::with_capacity(5 + self.output_commitments.len());
        inputs.push(self.root);
        inputs.push(self.public_amount);
        inputs.push(self.ext_data_hash);
        inputs.extend_from_slice(&self.input_nullifiers);
        inputs.extend_from_slice(&self.output_commitments);
        inputs
    }
}

/// Direction and magnitude of the value settled by an accepted transaction.
/// An internal transfer shows up as a deposit of zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    /// Value entered the pool; the caller funded the pool account beforehand
    Deposit { amount: U256 },
    /// Value left the pool to `recipient`
    Withdrawal { recipient: Address, amount: U256 },
}

/// Outcome of an accepted transaction.
#[derive(Clone, Debug)]
pub struct Receipt {
    /// Nullifiers now permanently spent
    pub spent_nullifiers: [Field; 2],
    /// Leaf index of the first inserted commitment
    pub base_index: u32,
    /// What moved, and which way
    pub settlement: Settlement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_input_order_is_fixed() {
        let request = TransferRequest {
            proof: vec![],
            root: Field::from(1u64),
            input_nullifiers: [Field::from(4u64), Field::from(5u64)],
            output_commitments: vec![Field::from(6u64), Field::from(7u64)],
            public_amount: Field::from(2u64),
            ext_data_hash: Field::from(3u64),
            recipient: Address::ZERO,
            ext_amount: Field::from(2u64),
            relayer: Address::ZERO,
            fee: U256::ZERO,
            ciphertext1: vec![],
            ciphertext2: vec![],
        };

        let inputs: Vec<u64> = (1..=7).collect();
        let expected: Vec<Field> = inputs.into_iter().map(Field::from).collect();
        assert_eq!(request.public_inputs(), expected);
    }
}
