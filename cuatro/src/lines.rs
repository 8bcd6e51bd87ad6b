use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{Cell, GameError};

/// Step vectors of the 13 line families: 3 axes, 6 planar diagonals and 4
/// space diagonals. No entry is the negation of another.
pub const DIRECTIONS: [[isize; 3]; 13] = [
    [1, 0, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 1, 0],
    [1, -1, 0],
    [1, 0, 1],
    [1, 0, -1],
    [0, 1, 1],
    [0, 1, -1],
    [1, 1, 1],
    [-1, 1, 1],
    [1, -1, 1],
    [-1, -1, 1],
];

/// Line indexes already built, keyed by (size, win length). Entries live for
/// the rest of the process, and the lock is held while a missing index is
/// built.
static SHARED: Lazy<Mutex<HashMap<(usize, usize), Arc<LineIndex>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// A run of `win_length` collinear cells, in stepping order from its origin.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    cells: Vec<Cell>,
}

impl Line {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Every winning line of a board, looked up by the cells they cross.
#[derive(Clone, Debug, PartialEq)]
pub struct LineIndex {
    size: usize,
    win_length: usize,
    lines: Vec<Line>,
    // Indices into `lines`, one list per cell.
    by_cell: Vec<Vec<usize>>,
}

impl LineIndex {
    pub fn build(size: usize, win_length: usize) -> Result<Self, GameError> {
        if size == 0 || win_length == 0 || win_length > size {
            return Err(GameError::InvalidDimensions { size, win_length });
        }
        let mut index = Self {
            size,
            win_length,
            lines: Vec::new(),
            by_cell: vec![Vec::new(); size * size * size],
        };
        for x in 0..size {
            for y in 0..size {
                for z in 0..size {
                    for dir in DIRECTIONS.iter() {
                        if let Some(line) = index.trace(Cell::new(x, y, z), dir) {
                            index.register(line);
                        }
                    }
                }
            }
        }
        Ok(index)
    }

    /// Index for (size, win length), built on first use and shared afterwards.
    pub fn shared(size: usize, win_length: usize) -> Result<Arc<Self>, GameError> {
        let mut cache = SHARED.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(index) = cache.get(&(size, win_length)) {
            return Ok(Arc::clone(index));
        }
        let index = Arc::new(Self::build(size, win_length)?);
        cache.insert((size, win_length), Arc::clone(&index));
        Ok(index)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Score of a line on which the candidate is the only cell missing.
    pub fn winning_score(&self) -> f64 {
        self.win_length as f64 - 0.5
    }

    /// All distinct lines, in generation order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn lines_through(&self, cell: Cell) -> impl Iterator<Item = &Line> + '_ {
        let ids: &[usize] = self
            .cell_index(cell)
            .map(|i| self.by_cell[i].as_slice())
            .unwrap_or(&[]);
        ids.iter().map(move |&id| &self.lines[id])
    }

    pub fn contains_cell(&self, cell: Cell) -> bool {
        self.cell_index(cell).is_some()
    }

    fn cell_index(&self, cell: Cell) -> Option<usize> {
        let n = self.size;
        (cell.x < n && cell.y < n && cell.z < n).then(|| (cell.x * n + cell.y) * n + cell.z)
    }

    fn trace(&self, origin: Cell, dir: &[isize; 3]) -> Option<Line> {
        let bound = self.size as isize;
        let mut cells = Vec::with_capacity(self.win_length);
        for step in 0..self.win_length as isize {
            let x = origin.x as isize + dir[0] * step;
            let y = origin.y as isize + dir[1] * step;
            let z = origin.z as isize + dir[2] * step;
            if [x, y, z].iter().any(|&c| c < 0 || c >= bound) {
                return None;
            }
            cells.push(Cell::new(x as usize, y as usize, z as usize));
        }
        Some(Line { cells })
    }

    fn register(&mut self, line: Line) {
        let id = self.lines.len();
        for &cell in line.cells() {
            if let Some(i) = self.cell_index(cell) {
                self.by_cell[i].push(id);
            }
        }
        self.lines.push(line);
    }
}
