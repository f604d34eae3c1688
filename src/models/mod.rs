pub mod account;
pub mod address;
pub mod faucet;
pub mod game;
pub mod todo;
pub mod token;

pub use account::{Account, AccountData, AccountRecord, ProgramId};
pub use address::{Address, ParseAddressError};
pub use faucet::BitcornFaucet;
pub use game::{Game, GameState, Grid};
pub use todo::{TodoAccount, UserProfile};
pub use token::{Mint, TokenAccount};
