use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::score::{self, Evaluation};
use crate::select::choose_move;
use crate::{Board, Cell, Column, GameError, Line, LineIndex, Player};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    InProgress,
    Won(Player),
    Drawn,
}

/// One applied move, with the scores it had for the player who made it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player: Player,
    pub column: Column,
    pub cell: Cell,
    pub offensive_score: f64,
    pub defensive_score: f64,
    pub best_line: Option<Line>,
}

/// The mutable part of a [`GameState`], enough to rewind it.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    board: Board,
    next_turn: Player,
    winner: Option<Player>,
    winning_line: Option<Line>,
    last_move: Option<Cell>,
    history_len: usize,
}

/// A game in progress. Only [`GameState::apply_move`] and its shorthands
/// change it; everything else is read access for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    lines: Arc<LineIndex>,
    board: Board,
    next_turn: Player,
    winner: Option<Player>,
    winning_line: Option<Line>,
    last_move: Option<Cell>,
    valid_moves: Vec<Column>,
    valid_cells: Vec<Cell>,
    history: Vec<MoveRecord>,
    game_over: bool,
}

impl GameState {
    pub fn new(size: usize, win_length: usize, starting: Player) -> Result<Self, GameError> {
        let lines = LineIndex::shared(size, win_length)?;
        Ok(Self::with_lines(lines, starting))
    }

    pub fn with_lines(lines: Arc<LineIndex>, starting: Player) -> Self {
        let mut state = Self {
            board: Board::new(lines.size()),
            lines,
            next_turn: starting,
            winner: None,
            winning_line: None,
            last_move: None,
            valid_moves: Vec::new(),
            valid_cells: Vec::new(),
            history: Vec::new(),
            game_over: false,
        };
        state.refresh();
        state
    }

    pub fn size(&self) -> usize {
        self.lines.size()
    }

    pub fn win_length(&self) -> usize {
        self.lines.win_length()
    }

    pub fn lines(&self) -> &Arc<LineIndex> {
        &self.lines
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn get(&self, cell: Cell) -> Option<Player> {
        self.board.get(cell)
    }

    pub fn height(&self, column: Column) -> usize {
        self.board.height(column)
    }

    pub fn next_turn(&self) -> Player {
        self.next_turn
    }

    pub fn previous_turn(&self) -> Player {
        self.next_turn.opponent()
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn winning_line(&self) -> Option<&Line> {
        self.winning_line.as_ref()
    }

    /// Cell of the most recent move; its column is `cell.column()`.
    pub fn last_move(&self) -> Option<Cell> {
        self.last_move
    }

    /// Playable columns, `x` outer and `y` inner.
    pub fn valid_moves(&self) -> &[Column] {
        &self.valid_moves
    }

    /// The landing cell of each playable column, in the same order.
    pub fn valid_cells(&self) -> &[Cell] {
        &self.valid_cells
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn status(&self) -> Status {
        match self.winner {
            Some(player) => Status::Won(player),
            None if self.game_over => Status::Drawn,
            None => Status::InProgress,
        }
    }

    /// Scores for the side to move occupying `cell`.
    pub fn evaluate(&self, cell: Cell) -> Evaluation {
        score::evaluate(&self.board, &self.lines, self.next_turn, cell)
    }

    /// Play `column`, or let the engine pick when it is `None`.
    pub fn apply_move<R: Rng + ?Sized>(
        &mut self,
        column: Option<Column>,
        rng: &mut R,
    ) -> Result<MoveRecord, GameError> {
        match column {
            Some(column) => self.play(column),
            None => self.play_engine(rng),
        }
    }

    pub fn play(&mut self, column: Column) -> Result<MoveRecord, GameError> {
        if self.game_over {
            return Err(GameError::GameOver);
        }
        self.commit(column)
    }

    pub fn play_engine<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<MoveRecord, GameError> {
        if self.game_over {
            return Err(GameError::GameOver);
        }
        let choice = choose_move(self, rng)?;
        self.commit(choice.column)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            next_turn: self.next_turn,
            winner: self.winner,
            winning_line: self.winning_line.clone(),
            last_move: self.last_move,
            history_len: self.history.len(),
        }
    }

    /// Rewind to a snapshot taken earlier in this same game.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.board = snapshot.board;
        self.next_turn = snapshot.next_turn;
        self.winner = snapshot.winner;
        self.winning_line = snapshot.winning_line;
        self.last_move = snapshot.last_move;
        self.history.truncate(snapshot.history_len);
        self.refresh();
    }

    fn commit(&mut self, column: Column) -> Result<MoveRecord, GameError> {
        if !self.board.contains(column) {
            return Err(GameError::ColumnOutOfBounds {
                x: column.x,
                y: column.y,
            });
        }
        let Some(cell) = self.board.landing_cell(column) else {
            return Err(GameError::ColumnFull {
                x: column.x,
                y: column.y,
            });
        };
        let mover = self.next_turn;
        let eval = self.evaluate(cell);
        self.board.place(column, mover)?;
        self.next_turn = mover.opponent();
        if eval.is_winning(&self.lines) {
            self.winner = Some(mover);
            self.winning_line = eval.best_line.clone();
        }
        self.last_move = Some(cell);
        self.refresh();

        let record = MoveRecord {
            player: mover,
            column,
            cell,
            offensive_score: eval.offensive.value,
            defensive_score: eval.defensive.value,
            best_line: eval.best_line,
        };
        debug!(
            player = record.player.id(),
            x = cell.x,
            y = cell.y,
            z = cell.z,
            offensive = record.offensive_score,
            defensive = record.defensive_score,
            "move applied"
        );
        self.history.push(record.clone());
        if self.game_over {
            info!(
                status = ?self.status(),
                moves = self.history.len(),
                "game over"
            );
        }
        Ok(record)
    }

    fn refresh(&mut self) {
        let board = &self.board;
        self.valid_moves = board.columns().filter(|&c| board.is_playable(c)).collect();
        self.valid_cells = self
            .valid_moves
            .iter()
            .filter_map(|&c| board.landing_cell(c))
            .collect();
        self.game_over = board.is_full() || self.winner.is_some();
    }
}
