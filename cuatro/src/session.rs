use std::sync::Arc;

use rand::Rng;
use tracing::info;

use crate::{
    Column, GameConfig, GameError, GameState, LineIndex, MoveRecord, Player, Seat, Snapshot,
};

/// A sequence of games under one configuration.
///
/// Human seats submit columns through [`Session::play`]; engine seats move
/// when [`Session::step`] is called. Every applied move can be taken back.
#[derive(Debug)]
pub struct Session<R> {
    config: GameConfig,
    lines: Arc<LineIndex>,
    state: GameState,
    rng: R,
    undo: Vec<Snapshot>,
}

impl<R: Rng> Session<R> {
    pub fn new(config: GameConfig, mut rng: R) -> Result<Self, GameError> {
        config.validate()?;
        let lines = LineIndex::shared(config.size, config.win_length)?;
        let starting = first_player(&config, &mut rng);
        let state = GameState::with_lines(Arc::clone(&lines), starting);
        info!(
            size = config.size,
            win_length = config.win_length,
            starting = config.name(starting),
            "new game"
        );
        Ok(Self {
            config,
            lines,
            state,
            rng,
            undo: Vec::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn seat(&self, player: Player) -> Seat {
        self.config.seat(player)
    }

    pub fn engine_to_move(&self) -> bool {
        !self.state.is_over() && self.seat(self.state.next_turn()) == Seat::Engine
    }

    /// Submit a human move.
    pub fn play(&mut self, column: Column) -> Result<MoveRecord, GameError> {
        if self.state.is_over() {
            return Err(GameError::GameOver);
        }
        if self.seat(self.state.next_turn()) != Seat::Human {
            return Err(GameError::SeatMismatch {
                expected: Seat::Human,
            });
        }
        let snapshot = self.state.snapshot();
        let record = self.state.play(column)?;
        self.undo.push(snapshot);
        Ok(record)
    }

    /// Let the engine move if it holds the seat to play; `None` otherwise.
    pub fn step(&mut self) -> Result<Option<MoveRecord>, GameError> {
        if !self.engine_to_move() {
            return Ok(None);
        }
        let snapshot = self.state.snapshot();
        let record = self.state.play_engine(&mut self.rng)?;
        self.undo.push(snapshot);
        Ok(Some(record))
    }

    /// Undo the last applied move. Returns false when there is none.
    pub fn take_back(&mut self) -> bool {
        match self.undo.pop() {
            Some(snapshot) => {
                self.state.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Throw the current game away and start a fresh one.
    pub fn reset(&mut self) {
        let starting = first_player(&self.config, &mut self.rng);
        self.state = GameState::with_lines(Arc::clone(&self.lines), starting);
        self.undo.clear();
        info!(starting = self.config.name(starting), "game reset");
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.state.winner().map(|p| self.config.name(p))
    }
}

fn first_player<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Player {
    config.starting_player.unwrap_or_else(|| {
        if rng.random_bool(0.5) {
            Player::Red
        } else {
            Player::Blue
        }
    })
}
