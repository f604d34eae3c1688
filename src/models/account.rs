use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{Address, BitcornFaucet, Game, Mint, TodoAccount, TokenAccount, UserProfile};

/// The programs deployed on the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramId {
    Token,
    BitcornFaucet,
    TicTacToe,
    Todo,
}

impl ProgramId {
    pub const ALL: [ProgramId; 4] = [
        ProgramId::Token,
        ProgramId::BitcornFaucet,
        ProgramId::TicTacToe,
        ProgramId::Todo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProgramId::Token => "token",
            ProgramId::BitcornFaucet => "bitcorn_faucet",
            ProgramId::TicTacToe => "tic_tac_toe",
            ProgramId::Todo => "todo",
        }
    }

    /// Fixed on-ledger address of the program
    pub fn address(&self) -> Address {
        let digest = Sha256::new()
            .chain_update(b"program:")
            .chain_update(self.name().as_bytes())
            .finalize();
        Address::new_from_array(digest.into())
    }

    /// Returns true if `address` belongs to one of the deployed programs
    pub fn is_program_address(address: &Address) -> bool {
        Self::ALL.iter().any(|p| p.address() == *address)
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProgramId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown program: {}", s))
    }
}

/// Typed contents of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountData {
    Mint(Mint),
    TokenAccount(TokenAccount),
    BitcornFaucet(BitcornFaucet),
    Game(Game),
    UserProfile(UserProfile),
    TodoAccount(TodoAccount),
}

/// A ledger account: one record owned by one program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub owner: ProgramId,
    pub data: AccountData,
}

impl Account {
    pub fn new(owner: ProgramId, data: AccountData) -> Self {
        Self { owner, data }
    }
}

/// A record type that lives inside an account owned by a fixed program
pub trait AccountRecord: Clone + Sized {
    const OWNER: ProgramId;
    const KIND: &'static str;

    fn from_data(data: &AccountData) -> Option<&Self>;
    fn into_data(self) -> AccountData;
}

macro_rules! account_record {
    ($ty:ident, $owner:expr, $kind:literal) => {
        impl AccountRecord for $ty {
            const OWNER: ProgramId = $owner;
            const KIND: &'static str = $kind;

            fn from_data(data: &AccountData) -> Option<&Self> {
                match data {
                    AccountData::$ty(record) => Some(record),
                    _ => None,
                }
            }

            fn into_data(self) -> AccountData {
                AccountData::$ty(self)
            }
        }
    };
}

account_record!(Mint, ProgramId::Token, "mint");
account_record!(TokenAccount, ProgramId::Token, "token_account");
account_record!(BitcornFaucet, ProgramId::BitcornFaucet, "bitcorn_faucet");
account_record!(Game, ProgramId::TicTacToe, "game");
account_record!(UserProfile, ProgramId::Todo, "user_profile");
account_record!(TodoAccount, ProgramId::Todo, "todo_account");
