//! Proof verification seam.

use shroud_core::Field;

/// Verifies a zero-knowledge transfer proof against its public inputs.
///
/// The engine treats the proof system as opaque: an implementation wraps
/// whatever verifying key and backend the deployment uses. `verify` must be
/// deterministic for a given (proof, inputs) pair; a `false` verdict rejects
/// the transaction.
pub trait ProofVerifier: Send + Sync {
    fn verify(&self, proof: &[u8], public_inputs: &[Field]) -> bool;
}
