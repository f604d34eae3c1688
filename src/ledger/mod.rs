//! In-memory ledger: accounts, transaction execution and history.

pub mod clock;
pub mod context;
pub mod history;
pub mod outcome;
pub mod pda;

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    config::Config,
    models::{Account, Address, ProgramId},
    programs::{self, Instruction},
};

pub use clock::{Clock, ManualClock, SystemClock};
pub use context::{AccountWrite, InstructionContext};
pub use history::{TransactionHistory, TransactionRecord};
pub use outcome::{
    FailedTransaction, SimulatedAccount, SimulationResult, TransactionError, TransactionFailure,
};
pub use pda::find_program_address;

/// Capacity of the account update channel
const ACCOUNT_UPDATE_CAPACITY: usize = 1024;

/// Tunables read by the programs
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Whole tokens handed out per faucet drip
    pub faucet_drip_amount: u64,
    /// Minimum seconds between two drips from the same faucet
    pub faucet_cooldown_secs: i64,
    /// Maximum task length in bytes
    pub todo_max_task_len: usize,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            faucet_drip_amount: 10,
            faucet_cooldown_secs: 30,
            todo_max_task_len: 256,
        }
    }
}

impl From<&Config> for ProgramConfig {
    fn from(config: &Config) -> Self {
        Self {
            faucet_drip_amount: config.programs.faucet_drip_amount,
            faucet_cooldown_secs: config.programs.faucet_cooldown_secs,
            todo_max_task_len: config.programs.todo_max_task_len,
        }
    }
}

/// A committed change to one account
#[derive(Debug, Clone, Serialize)]
pub struct AccountUpdate {
    pub address: Address,
    pub slot: u64,
    /// `None` when the account was closed
    pub account: Option<Account>,
}

struct Bank {
    accounts: HashMap<Address, Account>,
    slot: u64,
}

pub struct Ledger {
    bank: Mutex<Bank>,
    history: TransactionHistory,
    updates: broadcast::Sender<AccountUpdate>,
    clock: Arc<dyn Clock>,
    config: ProgramConfig,
}

impl Ledger {
    pub fn new(config: ProgramConfig, clock: Arc<dyn Clock>, max_history: usize) -> Self {
        let (updates, _) = broadcast::channel(ACCOUNT_UPDATE_CAPACITY);
        Self {
            bank: Mutex::new(Bank {
                accounts: HashMap::new(),
                slot: 0,
            }),
            history: TransactionHistory::new(max_history),
            updates,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    pub fn slot(&self) -> u64 {
        self.bank.lock().slot
    }

    pub fn get_account(&self, address: &Address) -> Option<Account> {
        self.bank.lock().accounts.get(address).cloned()
    }

    /// All accounts owned by `program`, ordered by address
    pub fn program_accounts(&self, program: ProgramId) -> Vec<(Address, Account)> {
        let bank = self.bank.lock();
        let mut accounts: Vec<_> = bank
            .accounts
            .iter()
            .filter(|(_, account)| account.owner == program)
            .map(|(address, account)| (*address, account.clone()))
            .collect();
        accounts.sort_by(|a, b| a.0.cmp(&b.0));
        accounts
    }

    pub fn transaction(&self, signature: &Uuid) -> Option<TransactionRecord> {
        self.history.get(signature)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AccountUpdate> {
        self.updates.subscribe()
    }

    /// Run `instructions` against the current accounts without committing.
    ///
    /// A failing instruction is reported inside the result; `Err` only means
    /// the transaction could not be run at all.
    pub fn simulate_transaction(
        &self,
        signer: Address,
        instructions: &[Instruction],
    ) -> Result<SimulationResult, TransactionError> {
        if instructions.is_empty() {
            return Err(TransactionError::Empty);
        }

        let now = self.clock.unix_timestamp();
        let bank = self.bank.lock();
        let execution = execute(&bank.accounts, signer, now, &self.config, instructions);
        let slot = bank.slot;
        drop(bank);

        let (accounts, created) = match execution.failure {
            Some(_) => (Vec::new(), Vec::new()),
            None => (
                execution
                    .writes
                    .into_iter()
                    .map(|(address, account)| SimulatedAccount { address, account })
                    .collect(),
                execution.created,
            ),
        };

        Ok(SimulationResult {
            slot,
            logs: execution.logs,
            error: execution.failure,
            accounts,
            created,
        })
    }

    /// Execute `instructions` atomically on behalf of `signer`.
    ///
    /// Only a successful transaction advances the slot and lands in the
    /// history. A failed one leaves the ledger untouched and comes back as
    /// `TransactionError::Failed` with its logs.
    pub fn process_transaction(
        &self,
        signer: Address,
        instructions: Vec<Instruction>,
    ) -> Result<TransactionRecord, TransactionError> {
        if instructions.is_empty() {
            return Err(TransactionError::Empty);
        }

        let now = self.clock.unix_timestamp();
        let mut bank = self.bank.lock();
        let execution = execute(&bank.accounts, signer, now, &self.config, &instructions);

        if let Some(error) = execution.failure {
            tracing::debug!(
                signer = %signer,
                instruction_index = error.instruction_index,
                error = %error.message,
                "Transaction failed, nothing committed"
            );
            return Err(TransactionError::Failed(FailedTransaction {
                error,
                logs: execution.logs,
            }));
        }

        bank.slot += 1;
        let slot = bank.slot;

        for (address, account) in &execution.writes {
            match account {
                Some(account) => {
                    bank.accounts.insert(*address, account.clone());
                }
                None => {
                    bank.accounts.remove(address);
                }
            }
        }

        let record = TransactionRecord {
            signature: Uuid::new_v4(),
            slot,
            block_time: now,
            signer,
            instructions,
            logs: execution.logs,
            created: execution.created,
        };

        // Still under the bank lock: notifications leave in slot order and
        // the signature is queryable before anyone hears about it
        self.history.insert(record.clone());
        for (address, account) in execution.writes {
            // No subscribers is not an error
            let _ = self.updates.send(AccountUpdate {
                address,
                slot,
                account,
            });
        }
        drop(bank);

        tracing::info!(
            signature = %record.signature,
            slot,
            signer = %signer,
            "Processed transaction"
        );

        Ok(record)
    }
}

/// Outcome of running a transaction against a snapshot of the accounts
struct Execution {
    writes: Vec<AccountWrite>,
    created: Vec<Address>,
    logs: Vec<String>,
    failure: Option<TransactionFailure>,
}

fn execute(
    accounts: &HashMap<Address, Account>,
    signer: Address,
    now: i64,
    config: &ProgramConfig,
    instructions: &[Instruction],
) -> Execution {
    let mut ctx = InstructionContext::new(accounts, signer, now, config);

    for (index, instruction) in instructions.iter().enumerate() {
        let program = instruction.program();
        ctx.log(format!("Program {} invoke [1]", program.address()));
        ctx.log(format!("Program log: Instruction: {}", instruction.name()));

        match programs::process_instruction(&mut ctx, instruction) {
            Ok(()) => ctx.log(format!("Program {} success", program.address())),
            Err(e) => {
                ctx.log(format!("Program {} failed: {}", program.address(), e));
                return Execution {
                    writes: Vec::new(),
                    created: Vec::new(),
                    logs: ctx.into_logs(),
                    failure: Some(TransactionFailure {
                        instruction_index: index,
                        message: e.to_string(),
                    }),
                };
            }
        }
    }

    let (writes, created, logs) = ctx.finish();
    Execution {
        writes,
        created,
        logs,
        failure: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::{
        tictactoe::TicTacToeInstruction, todo::TodoInstruction, token::TokenInstruction,
    };

    fn ledger() -> Ledger {
        Ledger::new(
            ProgramConfig::default(),
            Arc::new(ManualClock::new(1_700_000_000)),
            100,
        )
    }

    fn blank_task() -> Instruction {
        Instruction::Todo(TodoInstruction::AddTask {
            task: "   ".to_string(),
        })
    }

    #[test]
    fn test_empty_transaction_is_rejected() {
        let ledger = ledger();
        assert_eq!(
            ledger
                .process_transaction(Address::new_unique(), Vec::new())
                .unwrap_err(),
            TransactionError::Empty
        );
        assert_eq!(ledger.slot(), 0);
    }

    #[test]
    fn test_successful_transaction_commits_and_records() {
        let ledger = ledger();
        let signer = Address::new_unique();

        let record = ledger
            .process_transaction(
                signer,
                vec![Instruction::Todo(TodoInstruction::InitUserProfile)],
            )
            .unwrap();

        assert_eq!(record.slot, 1);
        assert_eq!(record.created.len(), 1);
        assert!(ledger.get_account(&record.created[0]).is_some());
        assert!(ledger.transaction(&record.signature).is_some());
        assert!(record
            .logs
            .iter()
            .any(|l| l == "Program log: Instruction: InitUserProfile"));
    }

    #[test]
    fn test_failed_transaction_leaves_no_trace() {
        let ledger = ledger();
        let signer = Address::new_unique();
        let mut rx = ledger.subscribe();

        // The profile would be created, but the second instruction fails
        let err = ledger
            .process_transaction(
                signer,
                vec![Instruction::Todo(TodoInstruction::InitUserProfile), blank_task()],
            )
            .unwrap_err();

        let failed = match err {
            TransactionError::Failed(failed) => failed,
            other => panic!("expected a failed transaction, got {:?}", other),
        };
        assert_eq!(failed.error.instruction_index, 1);
        assert_eq!(failed.error.message, "Task must not be empty");
        assert!(failed
            .logs
            .last()
            .unwrap()
            .ends_with("failed: Task must not be empty"));

        assert!(ledger.program_accounts(ProgramId::Todo).is_empty());
        assert_eq!(ledger.slot(), 0);
        assert!(ledger.history.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_later_instruction_sees_earlier_writes() {
        let ledger = ledger();
        let signer = Address::new_unique();
        let opponent = Address::new_unique();

        let result = ledger.process_transaction(
            signer,
            vec![
                Instruction::TicTacToe(TicTacToeInstruction::InitGame {
                    player1: signer,
                    player2: opponent,
                }),
                Instruction::TicTacToe(TicTacToeInstruction::PlayGame {
                    game: crate::programs::tictactoe::game_address(&signer),
                    played_by: 1,
                    move_position: 5,
                }),
            ],
        );

        assert!(result.is_ok(), "{:?}", result);
    }

    #[tokio::test]
    async fn test_committed_writes_are_broadcast() {
        let ledger = ledger();
        let mut rx = ledger.subscribe();
        let signer = Address::new_unique();

        let record = ledger
            .process_transaction(
                signer,
                vec![Instruction::Token(TokenInstruction::CreateMint { decimals: 2 })],
            )
            .unwrap();

        let update = rx.recv().await.unwrap();
        assert_eq!(update.address, record.created[0]);
        assert_eq!(update.slot, 1);
        assert!(update.account.is_some());
    }

    #[test]
    fn test_concurrent_updates_arrive_in_slot_order() {
        let ledger = ledger();
        let owner = Address::new_unique();

        let setup = ledger
            .process_transaction(
                owner,
                vec![Instruction::Token(TokenInstruction::CreateMint { decimals: 0 })],
            )
            .unwrap();
        let mint = setup.created[0];
        let account = ledger
            .process_transaction(
                owner,
                vec![Instruction::Token(TokenInstruction::CreateTokenAccount { mint, owner })],
            )
            .unwrap()
            .created[0];

        let mut rx = ledger.subscribe();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        ledger
                            .process_transaction(
                                owner,
                                vec![Instruction::Token(TokenInstruction::MintTo {
                                    mint,
                                    destination: account,
                                    amount: 1,
                                })],
                            )
                            .unwrap();
                    }
                });
            }
        });

        let mut last_slot = 0;
        let mut seen = 0;
        while let Ok(update) = rx.try_recv() {
            if update.address != account {
                continue;
            }
            assert!(update.slot > last_slot, "slot {} after {}", update.slot, last_slot);
            last_slot = update.slot;
            seen += 1;
        }
        assert_eq!(seen, 100);
        assert_eq!(last_slot, ledger.slot());
    }

    #[test]
    fn test_simulation_does_not_commit() {
        let ledger = ledger();
        let signer = Address::new_unique();
        let mut rx = ledger.subscribe();

        let result = ledger
            .simulate_transaction(
                signer,
                &[Instruction::Token(TokenInstruction::CreateMint { decimals: 3 })],
            )
            .unwrap();

        assert_eq!(result.slot, 0);
        assert!(result.error.is_none());
        assert_eq!(result.created.len(), 1);
        assert_eq!(result.accounts.len(), 1);
        assert_eq!(result.accounts[0].address, result.created[0]);
        assert!(result.accounts[0].account.is_some());
        assert!(result
            .logs
            .iter()
            .any(|l| l == "Program log: Instruction: CreateMint"));

        assert!(ledger.get_account(&result.created[0]).is_none());
        assert_eq!(ledger.slot(), 0);
        assert!(ledger.history.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_simulation_reports_failure() {
        let ledger = ledger();
        let signer = Address::new_unique();

        let result = ledger
            .simulate_transaction(
                signer,
                &[Instruction::Todo(TodoInstruction::InitUserProfile), blank_task()],
            )
            .unwrap();

        let error = result.error.unwrap();
        assert_eq!(error.instruction_index, 1);
        assert!(result.accounts.is_empty());
        assert!(result.created.is_empty());

        assert_eq!(
            ledger.simulate_transaction(signer, &[]).unwrap_err(),
            TransactionError::Empty
        );
    }
}
