use serde::{Deserialize, Serialize};

use crate::{
    error::ProgramError,
    ledger::{find_program_address, InstructionContext},
    models::{
        game::{EMPTY_CELL, GRID_SIZE},
        Address, Game, GameState, Grid, ProgramId,
    },
};

/// Rows, columns and diagonals of the board, as cell indices
const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "instruction", rename_all = "snake_case")]
pub enum TicTacToeInstruction {
    InitGame {
        player1: Address,
        player2: Address,
    },
    PlayGame {
        game: Address,
        /// 1 or 2
        played_by: u8,
        /// Cell 1..=9, row-major
        move_position: u8,
    },
}

impl TicTacToeInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            TicTacToeInstruction::InitGame { .. } => "InitGame",
            TicTacToeInstruction::PlayGame { .. } => "PlayGame",
        }
    }
}

pub fn process(
    ctx: &mut InstructionContext,
    instruction: &TicTacToeInstruction,
) -> Result<(), ProgramError> {
    match instruction {
        TicTacToeInstruction::InitGame { player1, player2 } => {
            init_game(ctx, *player1, *player2).map(|_| ())
        }
        TicTacToeInstruction::PlayGame {
            game,
            played_by,
            move_position,
        } => play_game(ctx, *game, *played_by, *move_position),
    }
}

/// Address of the game created by `owner`
pub fn game_address(owner: &Address) -> Address {
    find_program_address(&[b"ttt", owner.as_ref()], ProgramId::TicTacToe).0
}

pub fn init_game(
    ctx: &mut InstructionContext,
    player1: Address,
    player2: Address,
) -> Result<Address, ProgramError> {
    if player1 == player2 {
        return Err(ProgramError::DuplicatePlayers);
    }

    let address = game_address(&ctx.signer());
    ctx.create(address, Game::new(player1, player2))?;
    ctx.log(format!("Program log: Game {} created", address));
    Ok(address)
}

/// Check if `player` has won after their move
pub fn win_check(grid: &Grid, player: u8) -> GameState {
    let won = WIN_LINES
        .iter()
        .any(|line| line.iter().all(|&cell| grid[cell] == player));

    if won {
        if let Some(state) = GameState::win_for(player) {
            return state;
        }
    }

    if grid.iter().all(|&cell| cell != EMPTY_CELL) {
        GameState::Draw
    } else {
        GameState::Active
    }
}

pub fn play_game(
    ctx: &mut InstructionContext,
    address: Address,
    played_by: u8,
    move_position: u8,
) -> Result<(), ProgramError> {
    let mut game = ctx.load::<Game>(&address)?;

    if game.game_state.is_finished() {
        return Err(ProgramError::GameFinished);
    }

    if !(1..=2).contains(&played_by) || game.players[(played_by - 1) as usize] != ctx.signer() {
        return Err(ProgramError::InvalidPlayer);
    }

    if game.current_player() != played_by {
        return Err(ProgramError::InvalidPlayerTurn);
    }

    if !(1..=GRID_SIZE as u8).contains(&move_position) {
        return Err(ProgramError::InvalidMove);
    }

    let cell = (move_position - 1) as usize;
    if game.grid[cell] != EMPTY_CELL {
        return Err(ProgramError::MoveAlreadyPlayed);
    }

    game.grid[cell] = played_by;
    game.turn += 1;
    game.game_state = win_check(&game.grid, played_by);

    ctx.log(format!(
        "Program log: Player {} played {}, state {:?}",
        played_by, move_position, game.game_state
    ));
    ctx.store(address, game)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{ledger::ProgramConfig, models::Account};

    #[test]
    fn test_win_check_rows_columns_diagonals() {
        for line in WIN_LINES {
            let mut grid = [EMPTY_CELL; GRID_SIZE];
            for cell in line {
                grid[cell] = 2;
            }
            assert_eq!(win_check(&grid, 2), GameState::Player2Wins, "{:?}", line);
            assert_eq!(win_check(&grid, 1), GameState::Active);
        }
    }

    #[test]
    fn test_win_check_draw() {
        // 1 2 1
        // 1 2 2
        // 2 1 1
        let grid = [1, 2, 1, 1, 2, 2, 2, 1, 1];
        assert_eq!(win_check(&grid, 1), GameState::Draw);
        assert_eq!(win_check(&grid, 2), GameState::Draw);
    }

    #[test]
    fn test_win_on_last_move_is_not_a_draw() {
        // 1 2 1
        // 2 1 2
        // 2 1 1
        let grid = [1, 2, 1, 2, 1, 2, 2, 1, 1];
        assert_eq!(win_check(&grid, 1), GameState::Player1Wins);
    }

    #[test]
    fn test_win_check_in_progress() {
        let mut grid = [EMPTY_CELL; GRID_SIZE];
        grid[4] = 1;
        assert_eq!(win_check(&grid, 1), GameState::Active);
    }

    struct Table {
        accounts: HashMap<Address, Account>,
        config: ProgramConfig,
        x: Address,
        o: Address,
        game: Address,
    }

    impl Table {
        fn new() -> Self {
            let config = ProgramConfig::default();
            let mut accounts = HashMap::new();
            let x = Address::new_unique();
            let o = Address::new_unique();

            let mut ctx = InstructionContext::new(&accounts, x, 0, &config);
            let game = init_game(&mut ctx, x, o).unwrap();
            let (writes, _, _) = ctx.finish();
            for (address, account) in writes {
                if let Some(account) = account {
                    accounts.insert(address, account);
                }
            }

            Self {
                accounts,
                config,
                x,
                o,
                game,
            }
        }

        /// Play the moves in order, alternating players, and return the game
        fn play(&self, moves: &[u8]) -> Result<Game, ProgramError> {
            let mut accounts = self.accounts.clone();
            for (i, position) in moves.iter().enumerate() {
                let (signer, played_by) = if i % 2 == 0 { (self.x, 1) } else { (self.o, 2) };
                let mut ctx = InstructionContext::new(&accounts, signer, 0, &self.config);
                play_game(&mut ctx, self.game, played_by, *position)?;
                let (writes, _, _) = ctx.finish();
                for (address, account) in writes {
                    if let Some(account) = account {
                        accounts.insert(address, account);
                    }
                }
            }
            let ctx = InstructionContext::new(&accounts, self.x, 0, &self.config);
            ctx.load::<Game>(&self.game)
        }
    }

    #[test]
    fn test_init_game() {
        let table = Table::new();
        let game = table.play(&[]).unwrap();
        assert_eq!(game.players, [table.x, table.o]);
        assert_eq!(game.game_state, GameState::Active);
        assert_eq!(game.turn, 1);
        assert_eq!(table.game, game_address(&table.x));
    }

    #[test]
    fn test_init_game_rejects_same_player_twice() {
        let accounts = HashMap::new();
        let config = ProgramConfig::default();
        let player = Address::new_unique();
        let mut ctx = InstructionContext::new(&accounts, player, 0, &config);
        assert_eq!(
            init_game(&mut ctx, player, player),
            Err(ProgramError::DuplicatePlayers)
        );
    }

    #[test]
    fn test_one_game_per_owner() {
        let table = Table::new();
        let mut ctx = InstructionContext::new(&table.accounts, table.x, 0, &table.config);
        assert_eq!(
            init_game(&mut ctx, table.x, Address::new_unique()),
            Err(ProgramError::AccountAlreadyInUse(table.game))
        );
    }

    #[test]
    fn test_player_one_wins_top_row() {
        let table = Table::new();
        let game = table.play(&[1, 4, 2, 5, 3]).unwrap();
        assert_eq!(game.game_state, GameState::Player1Wins);
        assert_eq!(game.grid, [1, 1, 1, 2, 2, 0, 0, 0, 0]);
        assert_eq!(game.turn, 6);
    }

    #[test]
    fn test_player_two_wins_diagonal() {
        let table = Table::new();
        let game = table.play(&[2, 1, 3, 5, 4, 9]).unwrap();
        assert_eq!(game.game_state, GameState::Player2Wins);
    }

    #[test]
    fn test_full_board_draw() {
        let table = Table::new();
        // 1 2 1
        // 1 2 2
        // 2 1 1
        let game = table.play(&[1, 2, 3, 5, 4, 6, 8, 7, 9]).unwrap();
        assert_eq!(game.game_state, GameState::Draw);
        assert_eq!(game.turn, 10);
    }

    #[test]
    fn test_no_moves_after_game_finished() {
        let table = Table::new();
        assert_eq!(
            table.play(&[1, 4, 2, 5, 3, 6]),
            Err(ProgramError::GameFinished)
        );
    }

    #[test]
    fn test_move_already_played() {
        let table = Table::new();
        assert_eq!(table.play(&[5, 5]), Err(ProgramError::MoveAlreadyPlayed));
    }

    #[test]
    fn test_invalid_positions() {
        let table = Table::new();
        assert_eq!(table.play(&[0]), Err(ProgramError::InvalidMove));
        assert_eq!(table.play(&[10]), Err(ProgramError::InvalidMove));
    }

    #[test]
    fn test_wrong_turn() {
        let table = Table::new();
        let mut ctx = InstructionContext::new(&table.accounts, table.o, 0, &table.config);
        assert_eq!(
            play_game(&mut ctx, table.game, 2, 5),
            Err(ProgramError::InvalidPlayerTurn)
        );
    }

    #[test]
    fn test_signer_must_match_player_slot() {
        let table = Table::new();

        // Player two claiming to be player one
        let mut ctx = InstructionContext::new(&table.accounts, table.o, 0, &table.config);
        assert_eq!(
            play_game(&mut ctx, table.game, 1, 5),
            Err(ProgramError::InvalidPlayer)
        );

        let mut ctx = InstructionContext::new(&table.accounts, table.x, 0, &table.config);
        assert_eq!(
            play_game(&mut ctx, table.game, 3, 5),
            Err(ProgramError::InvalidPlayer)
        );

        let stranger = Address::new_unique();
        let mut ctx = InstructionContext::new(&table.accounts, stranger, 0, &table.config);
        assert_eq!(
            play_game(&mut ctx, table.game, 1, 5),
            Err(ProgramError::InvalidPlayer)
        );
    }
}
