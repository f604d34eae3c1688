use serde::{Deserialize, Serialize};

use super::Address;

/// Number of cells on the board
pub const GRID_SIZE: usize = 9;

/// Marker for an unplayed cell
pub const EMPTY_CELL: u8 = 0;

pub type Grid = [u8; GRID_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Active,
    Player1Wins,
    Player2Wins,
    Draw,
}

impl GameState {
    /// Winning state for player 1 or 2
    pub fn win_for(player: u8) -> Option<Self> {
        match player {
            1 => Some(GameState::Player1Wins),
            2 => Some(GameState::Player2Wins),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, GameState::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub players: [Address; 2],
    /// Row-major cells: 0 empty, 1 player one, 2 player two
    pub grid: Grid,
    pub game_state: GameState,
    /// Starts at 1; odd turns belong to player one
    pub turn: u8,
}

impl Game {
    pub fn new(player1: Address, player2: Address) -> Self {
        Self {
            players: [player1, player2],
            grid: [EMPTY_CELL; GRID_SIZE],
            game_state: GameState::Active,
            turn: 1,
        }
    }

    /// Player number (1 or 2) expected to move this turn
    pub fn current_player(&self) -> u8 {
        if self.turn % 2 == 1 {
            1
        } else {
            2
        }
    }
}
