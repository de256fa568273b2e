//! Spent-nullifier registry.
//!
//! Once a nullifier is recorded it stays recorded: the set only grows, and a
//! second marking of the same value is the double-spend signal.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::Field;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NullifierError {
    #[error("Nullifier already spent")]
    AlreadySpent,
}

/// Permanent record of consumed input notes. BTreeSet keeps iteration in
/// ascending field order, which the persisted layout relies on.
#[derive(Clone, Debug, Default)]
pub struct NullifierRegistry {
    spent: BTreeSet<Field>,
}

impl NullifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries.
    pub fn from_spent(entries: impl IntoIterator<Item = Field>) -> Self {
        Self {
            spent: entries.into_iter().collect(),
        }
    }

    pub fn contains(&self, nullifier: Field) -> bool {
        self.spent.contains(&nullifier)
    }

    /// Record a nullifier, failing if it is already present. The presence
    /// check and the insertion are one set operation; there is no window
    /// between them.
    pub fn mark_spent(&mut self, nullifier: Field) -> Result<(), NullifierError> {
        if self.spent.insert(nullifier) {
            Ok(())
        } else {
            Err(NullifierError::AlreadySpent)
        }
    }

    pub fn len(&self) -> usize {
        self.spent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }

    /// Entries in ascending field order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.spent.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::UniformRand;

    #[test]
    fn mark_then_replay() {
        let mut registry = NullifierRegistry::new();
        let nf = Field::from(42u64);

        assert!(!registry.contains(nf));
        registry.mark_spent(nf).unwrap();
        assert!(registry.contains(nf));
        assert_eq!(
            registry.mark_spent(nf).unwrap_err(),
            NullifierError::AlreadySpent
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn restore_preserves_entries() {
        let mut rng = rand::thread_rng();
        let entries: Vec<Field> = (0..8).map(|_| Field::rand(&mut rng)).collect();

        let registry = NullifierRegistry::from_spent(entries.clone());
        assert_eq!(registry.len(), entries.len());
        for nf in &entries {
            assert!(registry.contains(*nf));
        }
    }

    #[test]
    fn iteration_is_sorted() {
        let registry = NullifierRegistry::from_spent([
            Field::from(30u64),
            Field::from(10u64),
            Field::from(20u64),
        ]);
        let order: Vec<Field> = registry.iter().copied().collect();
        assert_eq!(
            order,
            vec![Field::from(10u64), Field::from(20u64), Field::from(30u64)]
        );
    }
}
