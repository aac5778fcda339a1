//! Board coordinates.
//!
//! ## Layout
//!
//! A `Cell` is a `(row, col)` pair, 0-indexed. Row 0 is the **bottom** row and
//! rows grow upward, so gravity pulls tokens toward row 0 and freshly spawned
//! tokens start above the board at rows `>= board_size`.
//!
//! ```
//! use rune_match::core::Cell;
//!
//! let a = Cell::new(2, 2);
//! assert!(a.is_adjacent(Cell::new(2, 3)));
//! assert!(a.is_adjacent(Cell::new(1, 2)));
//! assert!(!a.is_adjacent(Cell::new(3, 3)));
//! assert!(!a.is_adjacent(a));
//! ```

use serde::{Deserialize, Serialize};

/// A grid coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Row index, 0 at the bottom.
    pub row: usize,
    /// Column index, 0 at the left.
    pub col: usize,
}

impl Cell {
    /// Create a new cell.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if two cells are orthogonal neighbours (Manhattan distance 1).
    ///
    /// Diagonal neighbours and the cell itself are not adjacent.
    #[must_use]
    pub fn is_adjacent(self, other: Cell) -> bool {
        (self.row == other.row && self.col.abs_diff(other.col) == 1)
            || (self.col == other.col && self.row.abs_diff(other.row) == 1)
    }

    /// Presentation position of this cell's centre.
    #[must_use]
    pub fn position(self) -> Position {
        Position::new(self.col as f32, self.row as f32)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Free function form of [`Cell::is_adjacent`].
#[must_use]
pub fn are_adjacent(a: Cell, b: Cell) -> bool {
    a.is_adjacent(b)
}

/// A point in board space handed to the presentation layer.
///
/// `x` is the column axis, `y` the row axis. Spawn positions can sit above the
/// board (`y >= board_size`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
