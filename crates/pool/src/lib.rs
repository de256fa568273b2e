//! Shielded transaction engine.
//!
//! `shroud-pool` drives proof-carrying transfers over the primitives in
//! `shroud-core`: every request is validated in a fixed order, checked
//! against an injected proof verifier, settled through an injected asset
//! ledger, and only then committed to the commitment tree and nullifier
//! registry.
//!
//! # Key components
//!
//! - [`engine`] - [`ShroudPool`], the synchronous state machine
//! - [`shared`] - [`SharedPool`], the lock-guarded concurrent handle
//! - [`request`] - transfer requests, receipts, public-input assembly
//! - [`ledger`] / [`verifier`] - the two injected capabilities
//! - [`snapshot`] - persisted state layout

pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod request;
pub mod shared;
pub mod snapshot;
pub mod verifier;

pub use config::PoolConfig;
pub use engine::ShroudPool;
pub use error::{PoolError, PoolResult};
pub use ledger::{AssetLedger, InMemoryLedger, TransferError};
pub use request::{Receipt, Settlement, TransferRequest};
pub use shared::SharedPool;
pub use snapshot::SnapshotError;
pub use verifier::ProofVerifier;
