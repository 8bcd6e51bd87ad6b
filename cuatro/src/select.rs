//! Heuristic move selection.
//!
//! Every playable column is scored for attack and defence. An immediate win
//! is taken first, an immediate loss is blocked second. Otherwise the
//! candidates holding the best score go through [`CASCADE`], an ordered list
//! of rules that each narrow the working set, until one move is left.
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::score::{Evaluation, LineScore};
use crate::{Cell, Column, GameError, GameState, Line};

/// Which of a candidate's two scores is being compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Attack,
    Defend,
}

/// Why the selector settled on a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Win,
    Block,
    Attack,
    Defend,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub column: Column,
    pub cell: Cell,
    pub evaluation: Evaluation,
}

impl Candidate {
    /// One candidate per playable column, in valid-move order.
    pub fn collect(state: &GameState) -> Vec<Candidate> {
        state
            .valid_moves()
            .iter()
            .zip(state.valid_cells())
            .map(|(&column, &cell)| Candidate {
                column,
                cell,
                evaluation: state.evaluate(cell),
            })
            .collect()
    }

    pub fn score(&self, side: Side) -> LineScore {
        match side {
            Side::Attack => self.evaluation.offensive,
            Side::Defend => self.evaluation.defensive,
        }
    }

    fn peak(&self) -> f64 {
        let e = &self.evaluation;
        e.offensive.value.max(e.defensive.value)
    }

    fn choose(&self, decision: Decision) -> Choice {
        let (score, line) = match decision {
            Decision::Win | Decision::Attack => (
                self.evaluation.offensive.value,
                self.evaluation.best_line.clone(),
            ),
            Decision::Block | Decision::Defend => (self.evaluation.defensive.value, None),
        };
        Choice {
            column: self.column,
            cell: self.cell,
            score,
            line,
            decision,
        }
    }
}

/// The selected move. `line` is only set for attacking moves.
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub column: Column,
    pub cell: Cell,
    pub score: f64,
    pub line: Option<Line>,
    pub decision: Decision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieBreak {
    /// Keep candidates whose best score is backed by the most lines.
    MostLines,
    /// Keep candidates closest to the centre of the cube.
    NearestCentre,
    /// Keep one candidate drawn uniformly at random.
    Random,
}

pub const CASCADE: [TieBreak; 3] = [
    TieBreak::MostLines,
    TieBreak::NearestCentre,
    TieBreak::Random,
];

impl TieBreak {
    pub fn apply<'a, R: Rng + ?Sized>(
        self,
        pool: Vec<&'a Candidate>,
        side: Side,
        size: usize,
        rng: &mut R,
    ) -> Vec<&'a Candidate> {
        match self {
            TieBreak::MostLines => {
                let top = max_count(&pool, side);
                with_count(pool, side, top)
            }
            TieBreak::NearestCentre => {
                let nearest = pool
                    .iter()
                    .map(|c| c.cell.distance_to_centre(size))
                    .fold(f64::INFINITY, f64::min);
                pool.into_iter()
                    .filter(|c| c.cell.distance_to_centre(size) == nearest)
                    .collect()
            }
            TieBreak::Random => {
                if pool.len() <= 1 {
                    return pool;
                }
                let pick = rng.random_range(0..pool.len());
                vec![pool[pick]]
            }
        }
    }
}

fn max_count(pool: &[&Candidate], side: Side) -> usize {
    pool.iter().map(|c| c.score(side).count).max().unwrap_or(0)
}

fn with_count(pool: Vec<&Candidate>, side: Side, count: usize) -> Vec<&Candidate> {
    pool.into_iter()
        .filter(|c| c.score(side).count == count)
        .collect()
}

/// Pick the engine's move for the side to play.
pub fn choose_move<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Result<Choice, GameError> {
    let candidates = Candidate::collect(state);
    if candidates.is_empty() {
        return Err(GameError::NoMoves);
    }
    let best = candidates
        .iter()
        .map(Candidate::peak)
        .fold(f64::NEG_INFINITY, f64::max);
    let attack: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.evaluation.offensive.value == best)
        .collect();
    let defend: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.evaluation.defensive.value == best)
        .collect();

    if best == state.lines().winning_score() {
        if let Some(c) = attack.first() {
            trace!(column = ?c.column, "taking immediate win");
            return Ok(c.choose(Decision::Win));
        }
        if let Some(c) = defend.first() {
            trace!(column = ?c.column, "blocking immediate loss");
            return Ok(c.choose(Decision::Block));
        }
    }

    let (mut pool, side) = match (attack.is_empty(), defend.is_empty()) {
        (false, true) => (attack, Side::Attack),
        (true, false) => (defend, Side::Defend),
        (false, false) => {
            // Both sides tie on score: the line count decides, then attack
            // goes first if any attacker is left.
            let top = max_count(&attack, Side::Attack).max(max_count(&defend, Side::Defend));
            let attack = with_count(attack, Side::Attack, top);
            if attack.is_empty() {
                (with_count(defend, Side::Defend, top), Side::Defend)
            } else {
                (attack, Side::Attack)
            }
        }
        (true, true) => return Err(GameError::Invariant("no candidate holds the best score")),
    };

    for rule in CASCADE {
        pool = rule.apply(pool, side, state.size(), rng);
    }
    let chosen = pool
        .first()
        .ok_or(GameError::Invariant("tie-break removed every candidate"))?;
    let decision = match side {
        Side::Attack => Decision::Attack,
        Side::Defend => Decision::Defend,
    };
    trace!(
        column = ?chosen.column,
        score = best,
        ?decision,
        "move selected"
    );
    Ok(chosen.choose(decision))
}
