//! Match detection.
//!
//! A match is a run of three or more identical tokens in one row or column.
//! Scanning is pure: it reads the grid and returns descriptors, it never
//! mutates anything.
//!
//! ## Scan Rules
//!
//! - Every row and every column is walked once, accumulating runs
//! - A run is emitted when it is broken (different type, empty slot or end of
//!   line) and its length is at least [`MIN_MATCH`]
//! - Long runs are emitted as one descriptor, never split
//! - Rows and columns are independent, so a token can be covered by both a
//!   horizontal and a vertical descriptor

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Cell, TokenType};

use super::Grid;

/// Shortest run that counts as a match.
pub const MIN_MATCH: usize = 3;

/// Shortest run that counts as a "big" match.
pub const BIG_MATCH: usize = 5;

/// Direction of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Along a row; `line` is the row, `start` a column.
    Horizontal,
    /// Along a column; `line` is the column, `start` a row.
    Vertical,
}

impl Axis {
    /// Cell at `index` along `line`.
    #[must_use]
    pub fn cell(self, line: usize, index: usize) -> Cell {
        match self {
            Axis::Horizontal => Cell::new(line, index),
            Axis::Vertical => Cell::new(index, line),
        }
    }
}

/// One run of matching tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDescriptor {
    pub axis: Axis,
    /// Fixed row (horizontal) or column (vertical).
    pub line: usize,
    /// First index along the axis.
    pub start: usize,
    pub length: usize,
    pub kind: TokenType,
}

impl MatchDescriptor {
    /// Cells covered by this run.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.start..self.start + self.length).map(move |i| self.axis.cell(self.line, i))
    }

    /// Check if this run is long enough to count as big.
    #[must_use]
    pub fn is_big(&self) -> bool {
        self.length >= BIG_MATCH
    }
}

/// Descriptors found by one scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanResult {
    matches: SmallVec<[MatchDescriptor; 4]>,
}

impl ScanResult {
    /// Check if the scan found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Iterate over descriptors.
    pub fn iter(&self) -> impl Iterator<Item = &MatchDescriptor> {
        self.matches.iter()
    }

    /// Descriptors as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[MatchDescriptor] {
        &self.matches
    }

    /// Check if any descriptor is a big match.
    #[must_use]
    pub fn is_big(&self) -> bool {
        self.matches.iter().any(MatchDescriptor::is_big)
    }

    /// Union of all covered cells, sorted row-major.
    ///
    /// Cells shared by crossing runs appear once.
    #[must_use]
    pub fn covered_cells(&self) -> Vec<Cell> {
        let set: FxHashSet<Cell> = self.matches.iter().flat_map(|m| m.cells()).collect();
        let mut cells: Vec<Cell> = set.into_iter().collect();
        cells.sort_unstable();
        cells
    }
}

/// Scans a grid for runs.
pub struct MatchDetector;

impl MatchDetector {
    /// Find every run of [`MIN_MATCH`] or more in the grid.
    #[must_use]
    pub fn scan_board(grid: &Grid) -> ScanResult {
        let mut result = ScanResult::default();
        for axis in [Axis::Horizontal, Axis::Vertical] {
            for line in 0..grid.size() {
                Self::scan_line(grid, axis, line, &mut result.matches);
            }
        }
        result
    }

    fn scan_line(
        grid: &Grid,
        axis: Axis,
        line: usize,
        out: &mut SmallVec<[MatchDescriptor; 4]>,
    ) {
        let size = grid.size();
        let mut run: Option<(TokenType, usize)> = None;
        let mut length = 0;

        for index in 0..=size {
            let kind = if index < size {
                grid.kind_at(axis.cell(line, index))
            } else {
                None
            };

            match (run, kind) {
                (Some((current, _)), Some(kind)) if current == kind => {
                    length += 1;
                    continue;
                }
                _ => {}
            }

            // Run broken
            if let Some((current, start)) = run {
                if length >= MIN_MATCH {
                    out.push(MatchDescriptor {
                        axis,
                        line,
                        start,
                        length,
                        kind: current,
                    });
                }
            }
            run = kind.map(|kind| (kind, index));
            length = usize::from(kind.is_some());
        }
    }

    /// Length of the run of `kind` through `cell` along `axis`, counting
    /// `cell` itself whatever it currently holds.
    #[must_use]
    pub fn run_through(grid: &Grid, cell: Cell, kind: TokenType, axis: Axis) -> usize {
        let (line, index) = match axis {
            Axis::Horizontal => (cell.row, cell.col),
            Axis::Vertical => (cell.col, cell.row),
        };
        let same = |i: usize| grid.kind_at(axis.cell(line, i)) == Some(kind);

        let before = (0..index).rev().take_while(|&i| same(i)).count();
        let after = (index + 1..grid.size()).take_while(|&i| same(i)).count();
        before + 1 + after
    }

    /// Check if the token at `cell` is part of a run in its row or column.
    #[must_use]
    pub fn forms_match_at(grid: &Grid, cell: Cell) -> bool {
        match grid.kind_at(cell) {
            Some(kind) => [Axis::Horizontal, Axis::Vertical]
                .into_iter()
                .any(|axis| Self::run_through(grid, cell, kind, axis) >= MIN_MATCH),
            None => false,
        }
    }
}
