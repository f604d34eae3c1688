use serde::{Deserialize, Serialize};

use crate::models::{Account, Address};

/// Why a transaction was rolled back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFailure {
    /// Position of the failing instruction within the transaction
    pub instruction_index: usize,
    pub message: String,
}

/// A transaction that ran and was rolled back. Nothing of it is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTransaction {
    pub error: TransactionFailure,
    /// Program logs up to and including the failing instruction
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    #[error("transaction has no instructions")]
    Empty,

    #[error("instruction {} failed: {}", .0.error.instruction_index, .0.error.message)]
    Failed(FailedTransaction),
}

/// State of one account after a simulated transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulatedAccount {
    pub address: Address,
    /// `None` when the transaction would close the account
    pub account: Option<Account>,
}

/// Result of running a transaction without committing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    /// Slot the transaction was simulated against
    pub slot: u64,
    pub logs: Vec<String>,
    pub error: Option<TransactionFailure>,
    /// Post-transaction accounts, empty when the transaction failed
    pub accounts: Vec<SimulatedAccount>,
    pub created: Vec<Address>,
}
