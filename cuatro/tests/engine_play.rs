use cuatro::{choose_move, Cell, Column, GameState, Player, Status};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn self_play(size: usize, win_length: usize, seed: u64) -> GameState {
    let mut state = GameState::new(size, win_length, Player::Red).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    while !state.is_over() {
        let choice = choose_move(&state, &mut rng).unwrap();
        assert!(
            state.height(choice.column) < size,
            "selector chose a full column"
        );
        assert_eq!(state.board().landing_cell(choice.column), Some(choice.cell));
        state.play(choice.column).unwrap();

        let moves = state.history().len();
        let heights: usize = state.board().columns().map(|c| state.height(c)).sum();
        assert_eq!(heights, moves);
        assert_eq!(state.board().occupied(), moves);
    }
    state
}

#[test]
fn engine_games_keep_the_board_consistent() {
    for (size, win) in [(3, 3), (4, 3), (4, 4), (5, 4)] {
        for seed in 0..4 {
            let state = self_play(size, win, seed);
            match state.status() {
                Status::Won(winner) => {
                    let line = state.winning_line().unwrap();
                    assert_eq!(line.len(), win);
                    assert!(line.cells().iter().all(|&c| state.get(c) == Some(winner)));
                    let last = state.last_move().unwrap();
                    assert!(line.contains(last));
                    assert_eq!(state.history().last().unwrap().player, winner);
                    assert_eq!(state.previous_turn(), winner);
                }
                Status::Drawn => assert!(state.board().is_full()),
                Status::InProgress => panic!("loop ended while the game was running"),
            }
        }
    }
}

#[test]
fn same_seed_same_game() {
    let a = self_play(5, 4, 42);
    let b = self_play(5, 4, 42);
    assert_eq!(a.history(), b.history());
}

#[test]
fn win_along_the_y_axis() {
    let mut state = GameState::new(5, 4, Player::Blue).unwrap();
    for (x, y) in [(0, 0), (4, 4), (0, 1), (4, 3), (0, 2), (3, 4)] {
        state.play(Column::new(x, y)).unwrap();
    }
    assert_eq!(state.status(), Status::InProgress);
    state.play(Column::new(0, 3)).unwrap();
    assert_eq!(state.winner(), Some(Player::Blue));
    let expected: Vec<Cell> = (0..4).map(|y| Cell::new(0, y, 0)).collect();
    assert_eq!(state.winning_line().unwrap().cells(), expected.as_slice());
}

#[test]
fn engine_finishes_a_vertical_four() {
    let mut state = GameState::new(5, 4, Player::Red).unwrap();
    for (x, y) in [(2, 2), (0, 0), (2, 2), (0, 4), (2, 2), (4, 0)] {
        state.play(Column::new(x, y)).unwrap();
    }
    let mut rng = StdRng::seed_from_u64(0);
    let record = state.apply_move(None, &mut rng).unwrap();
    assert_eq!(record.cell, Cell::new(2, 2, 3));
    assert_eq!(state.winner(), Some(Player::Red));
    assert_eq!(record.best_line.as_ref(), state.winning_line());
}
