use crate::{Board, Cell, Line, LineIndex, Player};

const CONTESTED: f64 = 0.5;
const OWNED: f64 = 1.0;
const LATENT: f64 = 0.1;

/// Best per-line score for one side and how many lines reach it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineScore {
    pub value: f64,
    pub count: usize,
}

impl LineScore {
    fn of(scores: &[f64]) -> Self {
        let value = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let count = scores.iter().filter(|&&s| s == value).count();
        Self { value, count }
    }
}

/// How good occupying a cell is for the side to move.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Progress towards the mover's own lines.
    pub offensive: LineScore,
    /// Denial of the opponent's lines.
    pub defensive: LineScore,
    /// Last line through the cell, in index order, with the best offensive
    /// score.
    pub best_line: Option<Line>,
}

impl Evaluation {
    pub fn is_winning(&self, lines: &LineIndex) -> bool {
        self.offensive.value == lines.winning_score()
    }

    pub fn is_blocking(&self, lines: &LineIndex) -> bool {
        self.defensive.value == lines.winning_score()
    }
}

/// Score a hypothetical move by `mover` into `cell`.
///
/// Every member of every line through the cell contributes to both sides:
/// a reachable cell (including `cell` itself) is contested, an own piece
/// helps the mover and spoils the line for the opponent, an enemy piece the
/// reverse, and an empty cell higher up a column is a weak latent chance.
pub fn evaluate(board: &Board, lines: &LineIndex, mover: Player, cell: Cell) -> Evaluation {
    let penalty = lines.win_length() as f64;
    let mut own = Vec::new();
    let mut other = Vec::new();
    let mut best_line: Option<&Line> = None;
    let mut best = f64::NEG_INFINITY;

    for line in lines.lines_through(cell) {
        let (mut mine, mut theirs) = (0.0, 0.0);
        for &member in line.cells() {
            if board.is_reachable(member) {
                mine += CONTESTED;
                theirs += CONTESTED;
                continue;
            }
            match board.get(member) {
                Some(p) if p == mover => {
                    mine += OWNED;
                    theirs -= penalty;
                }
                Some(_) => {
                    mine -= penalty;
                    theirs += OWNED;
                }
                None => {
                    mine += LATENT;
                    theirs += LATENT;
                }
            }
        }
        if mine >= best {
            best = mine;
            best_line = Some(line);
        }
        own.push(mine);
        other.push(theirs);
    }

    Evaluation {
        offensive: LineScore::of(&own),
        defensive: LineScore::of(&other),
        best_line: best_line.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Column;

    fn drop_all(board: &mut Board, moves: &[(usize, usize, Player)]) {
        for &(x, y, p) in moves {
            board.place(Column::new(x, y), p).unwrap();
        }
    }

    #[test]
    fn empty_board_prefers_the_centre_column() {
        let lines = LineIndex::build(5, 4).unwrap();
        let board = Board::new(5);
        let centre = evaluate(&board, &lines, Player::Red, Cell::new(2, 2, 0));
        assert_eq!((centre.offensive.value, centre.offensive.count), (2.0, 8));
        assert_eq!((centre.defensive.value, centre.defensive.count), (2.0, 8));

        let corner = evaluate(&board, &lines, Player::Red, Cell::new(0, 0, 0));
        assert_eq!((corner.offensive.value, corner.offensive.count), (2.0, 3));
    }

    #[test]
    fn three_own_pieces_make_a_winning_score() {
        let lines = LineIndex::build(5, 4).unwrap();
        let mut board = Board::new(5);
        drop_all(
            &mut board,
            &[
                (0, 0, Player::Red),
                (1, 0, Player::Red),
                (2, 0, Player::Red),
            ],
        );
        let eval = evaluate(&board, &lines, Player::Red, Cell::new(3, 0, 0));
        assert!(eval.is_winning(&lines));
        assert_eq!(eval.offensive.count, 1);
        let line = eval.best_line.unwrap();
        assert_eq!(
            line.cells(),
            &[
                Cell::new(0, 0, 0),
                Cell::new(1, 0, 0),
                Cell::new(2, 0, 0),
                Cell::new(3, 0, 0)
            ]
        );
    }

    #[test]
    fn double_completion_names_the_last_line() {
        let lines = LineIndex::build(5, 4).unwrap();
        let mut board = Board::new(5);
        drop_all(
            &mut board,
            &[
                (0, 0, Player::Red),
                (1, 0, Player::Red),
                (2, 0, Player::Red),
                (3, 1, Player::Red),
                (3, 2, Player::Red),
                (3, 3, Player::Red),
            ],
        );
        let eval = evaluate(&board, &lines, Player::Red, Cell::new(3, 0, 0));
        assert!(eval.is_winning(&lines));
        assert_eq!(eval.offensive.count, 2);
        let expected: Vec<Cell> = (0..4).map(|y| Cell::new(3, y, 0)).collect();
        assert_eq!(eval.best_line.unwrap().cells(), expected.as_slice());
    }

    #[test]
    fn opponent_threat_shows_as_defence() {
        let lines = LineIndex::build(5, 4).unwrap();
        let mut board = Board::new(5);
        drop_all(
            &mut board,
            &[
                (0, 0, Player::Blue),
                (1, 0, Player::Blue),
                (2, 0, Player::Blue),
            ],
        );
        let eval = evaluate(&board, &lines, Player::Red, Cell::new(3, 0, 0));
        assert!(eval.is_blocking(&lines));
        assert!(!eval.is_winning(&lines));
        assert_eq!(eval.defensive.count, 1);
    }

    #[test]
    fn vertical_stack_threatens_both_ways() {
        let lines = LineIndex::build(5, 4).unwrap();
        let mut board = Board::new(5);
        drop_all(&mut board, &[(2, 2, Player::Red); 3]);
        let eval = evaluate(&board, &lines, Player::Red, Cell::new(2, 2, 3));
        assert!(eval.is_winning(&lines));
        let blue = evaluate(&board, &lines, Player::Blue, Cell::new(2, 2, 3));
        assert!(blue.is_blocking(&lines));
    }

    #[test]
    fn mixed_line_is_worthless_to_both() {
        let lines = LineIndex::build(4, 4).unwrap();
        let mut board = Board::new(4);
        drop_all(&mut board, &[(0, 0, Player::Red), (1, 0, Player::Blue)]);
        let eval = evaluate(&board, &lines, Player::Red, Cell::new(2, 0, 0));
        // Along x: own 1, enemy -4, candidate 0.5, reachable 0.5.
        assert_eq!(eval.offensive.value, 2.0);
        let line = eval.best_line.unwrap();
        assert!(!line.contains(Cell::new(1, 0, 0)));
    }
}
