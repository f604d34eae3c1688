use serde::{Deserialize, Serialize};

use super::Address;

/// Faucet state for one mint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitcornFaucet {
    pub bump: u8,
    /// Wallet that created the faucet
    pub owner: Address,
    pub mint: Address,
    /// Token account holding the faucet's reserve
    pub vault: Address,
    /// Unix timestamp of the last drip, 0 before the first one
    pub last_withdraw: i64,
}
