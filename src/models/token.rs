use serde::{Deserialize, Serialize};

use super::Address;

/// Largest number of decimals a mint may declare
pub const MAX_DECIMALS: u8 = 9;

/// A token mint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mint {
    /// Only this wallet may mint new supply
    pub mint_authority: Address,
    pub decimals: u8,
    pub supply: u64,
}

impl Mint {
    /// Number of base units in one whole token
    pub fn one_token(&self) -> Option<u64> {
        10u64.checked_pow(self.decimals as u32)
    }
}

/// A balance of one mint held by one owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    pub mint: Address,
    /// Wallet or program-derived address allowed to move the balance
    pub owner: Address,
    pub amount: u64,
}
