// Programs deployed on the ledger

pub mod faucet;
pub mod tictactoe;
pub mod todo;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::{error::ProgramError, ledger::InstructionContext, models::ProgramId};

pub use faucet::FaucetInstruction;
pub use tictactoe::TicTacToeInstruction;
pub use todo::TodoInstruction;
pub use token::TokenInstruction;

/// An instruction for one of the deployed programs.
///
/// JSON form is flat: `{"program": "todo", "instruction": "add_task", "task": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "program", rename_all = "snake_case")]
pub enum Instruction {
    Token(TokenInstruction),
    BitcornFaucet(FaucetInstruction),
    TicTacToe(TicTacToeInstruction),
    Todo(TodoInstruction),
}

impl Instruction {
    pub fn program(&self) -> ProgramId {
        match self {
            Instruction::Token(_) => ProgramId::Token,
            Instruction::BitcornFaucet(_) => ProgramId::BitcornFaucet,
            Instruction::TicTacToe(_) => ProgramId::TicTacToe,
            Instruction::Todo(_) => ProgramId::Todo,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Token(ix) => ix.name(),
            Instruction::BitcornFaucet(ix) => ix.name(),
            Instruction::TicTacToe(ix) => ix.name(),
            Instruction::Todo(ix) => ix.name(),
        }
    }
}

/// Route an instruction to its program
pub fn process_instruction(
    ctx: &mut InstructionContext,
    instruction: &Instruction,
) -> Result<(), ProgramError> {
    match instruction {
        Instruction::Token(ix) => token::process(ctx, ix),
        Instruction::BitcornFaucet(ix) => faucet::process(ctx, ix),
        Instruction::TicTacToe(ix) => tictactoe::process(ctx, ix),
        Instruction::Todo(ix) => todo::process(ctx, ix),
    }
}
