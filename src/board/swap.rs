//! Selection and swap validation.
//!
//! The swap engine tracks what the player has selected and whether a swap is
//! in flight. It owns no grid; the board applies swaps and asks the engine
//! what to do next.
//!
//! ## States
//!
//! ```text
//! Idle --select--> OneSelected --select adjacent--> Swapping
//!                    |   ^                            |
//!                    +---+ select non-adjacent        | no match
//!                                                     v
//! Idle <------------- finish ------------------- SwappingBack
//! ```
//!
//! A swap that produces a match leaves `Swapping` through [`SwapEngine::finish`]
//! once the cascade has taken over.

use serde::{Deserialize, Serialize};

use crate::core::Cell;

use super::{Grid, MatchDetector};

/// Selection state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapState {
    #[default]
    Idle,
    /// One cell selected, waiting for a partner.
    OneSelected(Cell),
    /// `first` and `second` are animating toward each other.
    Swapping { first: Cell, second: Cell },
    /// The swap produced no match and is being undone.
    SwappingBack { first: Cell, second: Cell },
}

/// What a selection did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// First cell selected.
    Selected(Cell),
    /// A non-adjacent cell replaced the previous selection.
    Reselected { previous: Cell, cell: Cell },
    /// An adjacent pair was selected; the swap begins.
    SwapStarted { first: Cell, second: Cell },
    /// Same cell again, or a swap is in flight.
    Ignored,
}

/// Selection state machine.
#[derive(Clone, Debug, Default)]
pub struct SwapEngine {
    state: SwapState,
}

impl SwapEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SwapState {
        self.state
    }

    /// The selected cell while waiting for a partner.
    #[must_use]
    pub fn selected(&self) -> Option<Cell> {
        match self.state {
            SwapState::OneSelected(cell) => Some(cell),
            _ => None,
        }
    }

    /// The pair being swapped, if any.
    #[must_use]
    pub fn pending_pair(&self) -> Option<(Cell, Cell)> {
        match self.state {
            SwapState::Swapping { first, second } | SwapState::SwappingBack { first, second } => {
                Some((first, second))
            }
            _ => None,
        }
    }

    /// Check if a swap or swap-back is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending_pair().is_some()
    }

    /// Handle a player selection.
    pub fn select(&mut self, cell: Cell) -> SelectOutcome {
        match self.state {
            SwapState::Idle => {
                self.state = SwapState::OneSelected(cell);
                SelectOutcome::Selected(cell)
            }
            SwapState::OneSelected(previous) if previous == cell => SelectOutcome::Ignored,
            SwapState::OneSelected(previous) if previous.is_adjacent(cell) => {
                self.state = SwapState::Swapping {
                    first: previous,
                    second: cell,
                };
                SelectOutcome::SwapStarted {
                    first: previous,
                    second: cell,
                }
            }
            SwapState::OneSelected(previous) => {
                self.state = SwapState::OneSelected(cell);
                SelectOutcome::Reselected { previous, cell }
            }
            SwapState::Swapping { .. } | SwapState::SwappingBack { .. } => SelectOutcome::Ignored,
        }
    }

    /// Turn an in-flight swap into a swap-back. Returns the pair.
    pub fn begin_swap_back(&mut self) -> Option<(Cell, Cell)> {
        match self.state {
            SwapState::Swapping { first, second } => {
                self.state = SwapState::SwappingBack { first, second };
                Some((first, second))
            }
            _ => None,
        }
    }

    /// Clear the selection and return to idle.
    pub fn finish(&mut self) {
        self.state = SwapState::Idle;
    }

    /// Check if swapping two cells would form a match.
    ///
    /// The grid is restored before returning.
    #[must_use]
    pub fn swap_forms_match(grid: &mut Grid, a: Cell, b: Cell) -> bool {
        grid.swap(a, b);
        let matched = MatchDetector::forms_match_at(grid, a) || MatchDetector::forms_match_at(grid, b);
        grid.swap(a, b);
        matched
    }

    /// Find any adjacent swap that would form a match.
    ///
    /// Scans right and up neighbours of every cell, so each pair is tried once.
    /// Pairs involving a vacant cell are skipped since empty cells cannot be
    /// selected.
    #[must_use]
    pub fn find_legal_swap(grid: &mut Grid) -> Option<(Cell, Cell)> {
        let size = grid.size();
        let cells: Vec<Cell> = grid.cells().collect();
        for cell in cells {
            let neighbours = [
                (cell.col + 1 < size).then(|| Cell::new(cell.row, cell.col + 1)),
                (cell.row + 1 < size).then(|| Cell::new(cell.row + 1, cell.col)),
            ];
            for other in neighbours.into_iter().flatten() {
                match (grid.kind_at(cell), grid.kind_at(other)) {
                    (Some(a), Some(b)) if a != b => {}
                    _ => continue,
                }
                if Self::swap_forms_match(grid, cell, other) {
                    return Some((cell, other));
                }
            }
        }
        None
    }
}
