use alloy_primitives::{Address, U256};

/// Pool parameters fixed at initialization, except the deposit limit, which
/// the admin may retune later.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Commitment tree height (1..=31)
    pub height: u32,

    /// Largest single-deposit magnitude
    pub deposit_limit: U256,

    /// Identity allowed to retune the deposit limit
    pub admin: Address,

    /// Asset this pool escrows
    pub asset: Address,

    /// Ledger account holding the pooled funds
    pub pool_account: Address,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            height: 20,
            deposit_limit: U256::from(1_000_000_000_000_000_000u64),
            admin: Address::ZERO,
            asset: Address::ZERO,
            pool_account: Address::ZERO,
        }
    }
}
