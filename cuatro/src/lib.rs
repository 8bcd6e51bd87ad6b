//! Cuatro: four in a row on an n×n×n lattice.
//! Pieces are dropped into one of the n² vertical columns and stack at the
//! lowest free depth. The engine keeps the board, the precomputed winning
//! lines through every cell, the turn state machine and a heuristic move
//! selector used whenever no move is supplied by the caller.
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod board;
mod config;
mod game;
mod lines;
mod score;
mod select;
mod session;

pub use board::Board;
pub use config::{GameConfig, Seat};
pub use game::{GameState, MoveRecord, Snapshot, Status};
pub use lines::{Line, LineIndex, DIRECTIONS};
pub use score::{evaluate, Evaluation, LineScore};
pub use select::{choose_move, Candidate, Choice, Decision, Side, TieBreak, CASCADE};
pub use session::Session;

pub const DEFAULT_SIZE: usize = 5;
pub const DEFAULT_WIN_LENGTH: usize = 4;

/// Player 1 is red, player 2 is blue.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Red,
    Blue,
}

impl Player {
    pub fn idx(self) -> usize {
        match self {
            Player::Red => 0,
            Player::Blue => 1,
        }
    }

    /// Numeric identifier as shown to players (1 or 2).
    pub fn id(self) -> u8 {
        self.idx() as u8 + 1
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }
}

/// A vertical column, addressed by its position on the base of the cube.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub x: usize,
    pub y: usize,
}

impl Column {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The cell of this column at depth `z`.
    pub const fn at(self, z: usize) -> Cell {
        Cell {
            x: self.x,
            y: self.y,
            z,
        }
    }
}

/// One lattice position. `z` is the depth inside the column, 0 at the bottom.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    pub const fn column(self) -> Column {
        Column {
            x: self.x,
            y: self.y,
        }
    }

    /// Squared euclidean distance to the centre of a cube of side `size`.
    pub fn distance_to_centre(self, size: usize) -> f64 {
        let centre = (size as f64 - 1.0) / 2.0;
        [self.x, self.y, self.z]
            .iter()
            .map(|&c| (c as f64 - centre).powi(2))
            .sum()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("column ({x}, {y}) is full")]
    ColumnFull { x: usize, y: usize },
    #[error("column ({x}, {y}) is out of bounds")]
    ColumnOutOfBounds { x: usize, y: usize },
    #[error("the game is already over")]
    GameOver,
    #[error("no legal moves remain")]
    NoMoves,
    #[error("invalid dimensions: size {size}, win length {win_length}")]
    InvalidDimensions { size: usize, win_length: usize },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("it is not a {expected:?} seat's turn")]
    SeatMismatch { expected: Seat },
    #[error("move selection invariant violated: {0}")]
    Invariant(&'static str),
}

impl GameError {
    /// Rejected moves that leave the game untouched and may simply be retried.
    pub fn is_illegal_move(&self) -> bool {
        matches!(
            self,
            GameError::ColumnFull { .. } | GameError::ColumnOutOfBounds { .. } | GameError::GameOver
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn players_alternate() {
        assert_eq!(Player::Red.opponent(), Player::Blue);
        assert_eq!(Player::Blue.opponent(), Player::Red);
        assert_eq!(Player::Red.id(), 1);
        assert_eq!(Player::Blue.id(), 2);
    }

    #[test]
    fn centre_distance() {
        assert_eq!(Cell::new(2, 2, 2).distance_to_centre(5), 0.0);
        assert_eq!(Cell::new(2, 2, 0).distance_to_centre(5), 4.0);
        assert_eq!(Cell::new(1, 1, 0).distance_to_centre(4), 2.75);
    }

    #[test]
    fn illegal_move_family() {
        assert!(GameError::ColumnFull { x: 0, y: 0 }.is_illegal_move());
        assert!(GameError::GameOver.is_illegal_move());
        assert!(!GameError::Invariant("empty").is_illegal_move());
        assert_eq!(
            GameError::ColumnFull { x: 1, y: 3 }.to_string(),
            "column (1, 3) is full"
        );
    }

    #[test]
    fn player_serializes_lowercase() {
        let json = serde_json::to_string(&Player::Blue).unwrap();
        assert_eq!(json, "\"blue\"");
    }
}
