use serde::{Deserialize, Serialize};

use crate::{GameError, Player, DEFAULT_SIZE, DEFAULT_WIN_LENGTH};

/// Who decides the moves of a player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    Human,
    Engine,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub size: usize,
    pub win_length: usize,
    /// Display names, red first.
    pub player_names: [String; 2],
    pub seats: [Seat; 2],
    /// Drawn at random for every game when unset.
    pub starting_player: Option<Player>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            win_length: DEFAULT_WIN_LENGTH,
            player_names: ["red".to_string(), "blue".to_string()],
            seats: [Seat::Human, Seat::Engine],
            starting_player: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.size == 0 || self.win_length == 0 || self.win_length > self.size {
            return Err(GameError::InvalidDimensions {
                size: self.size,
                win_length: self.win_length,
            });
        }
        if self.player_names.iter().any(|n| n.trim().is_empty()) {
            return Err(GameError::InvalidConfig(
                "player names must not be empty".to_string(),
            ));
        }
        if self.player_names[0] == self.player_names[1] {
            return Err(GameError::InvalidConfig(format!(
                "both players are named {:?}",
                self.player_names[0]
            )));
        }
        Ok(())
    }

    pub fn name(&self, player: Player) -> &str {
        &self.player_names[player.idx()]
    }

    pub fn seat(&self, player: Player) -> Seat {
        self.seats[player.idx()]
    }
}
