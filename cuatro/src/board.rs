use std::fmt;

use crate::{Cell, Column, GameError, Player};

/// The cube of cells plus how many pieces each column holds.
///
/// A cell at depth `z` of a column is occupied exactly when `z` is below the
/// column height, so pieces only ever stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Player>>,
    heights: Vec<usize>,
    occupied: usize,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size * size],
            heights: vec![0; size * size],
            occupied: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, cell: Cell) -> Option<Player> {
        self.cell_slot(cell).and_then(|i| self.cells[i])
    }

    pub fn height(&self, column: Column) -> usize {
        self.column_slot(column).map_or(0, |i| self.heights[i])
    }

    pub fn contains(&self, column: Column) -> bool {
        self.column_slot(column).is_some()
    }

    pub fn is_playable(&self, column: Column) -> bool {
        self.contains(column) && self.height(column) < self.size
    }

    /// True for the next cell that would be filled in its column.
    pub fn is_reachable(&self, cell: Cell) -> bool {
        self.is_playable(cell.column()) && self.height(cell.column()) == cell.z
    }

    /// Where a piece dropped into `column` would land.
    pub fn landing_cell(&self, column: Column) -> Option<Cell> {
        self.is_playable(column)
            .then(|| column.at(self.height(column)))
    }

    pub fn occupied(&self) -> usize {
        self.occupied
    }

    pub fn is_full(&self) -> bool {
        self.occupied == self.cells.len()
    }

    /// All columns in a stable order: `x` outer, `y` inner.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        (0..self.size).flat_map(move |x| (0..self.size).map(move |y| Column::new(x, y)))
    }

    pub fn place(&mut self, column: Column, player: Player) -> Result<Cell, GameError> {
        let Some(slot) = self.column_slot(column) else {
            return Err(GameError::ColumnOutOfBounds {
                x: column.x,
                y: column.y,
            });
        };
        let height = self.heights[slot];
        if height >= self.size {
            return Err(GameError::ColumnFull {
                x: column.x,
                y: column.y,
            });
        }
        let cell = column.at(height);
        if let Some(i) = self.cell_slot(cell) {
            self.cells[i] = Some(player);
        }
        self.heights[slot] += 1;
        self.occupied += 1;
        Ok(cell)
    }

    fn column_slot(&self, column: Column) -> Option<usize> {
        (column.x < self.size && column.y < self.size).then(|| column.x * self.size + column.y)
    }

    fn cell_slot(&self, cell: Cell) -> Option<usize> {
        let n = self.size;
        (cell.x < n && cell.y < n && cell.z < n).then(|| (cell.x * n + cell.y) * n + cell.z)
    }
}

/// One block per depth, bottom first; `R`/`B` for pieces and `.` for empty.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for z in 0..self.size {
            writeln!(f, "z={z}")?;
            for y in 0..self.size {
                let row: String = (0..self.size)
                    .map(|x| match self.get(Cell::new(x, y, z)) {
                        Some(Player::Red) => 'R',
                        Some(Player::Blue) => 'B',
                        None => '.',
                    })
                    .collect();
                writeln!(f, "{row}")?;
            }
        }
        Ok(())
    }
}
