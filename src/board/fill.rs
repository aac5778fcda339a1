//! No-match fill policy.
//!
//! Chooses a token type for a cell such that placing it does not complete a
//! run of three or more in the cell's row or column. Only the neighbourhood
//! of the cell is inspected (outward scans in both directions along each
//! axis), which gives the same answer as rescanning the whole line.
//!
//! ## Failure Modes
//!
//! - [`FillError::NoTokenTypes`]: nothing configured; fatal
//! - [`FillError::Exhausted`]: every type would complete a run; the caller
//!   decides the fallback (retry, leave vacant, or pick unconstrained)

use smallvec::SmallVec;

use crate::core::{Cell, FillError, GameRng, TokenType};

use super::matcher::{Axis, MatchDetector, MIN_MATCH};
use super::Grid;

/// Random token choice with optional run avoidance.
#[derive(Clone, Debug)]
pub struct RandomFillPolicy {
    token_types: Vec<TokenType>,
}

impl RandomFillPolicy {
    /// Create a policy over the given token types.
    pub fn new(token_types: impl Into<Vec<TokenType>>) -> Self {
        Self {
            token_types: token_types.into(),
        }
    }

    /// Configured token types.
    #[must_use]
    pub fn token_types(&self) -> &[TokenType] {
        &self.token_types
    }

    /// Check if placing `kind` at `cell` would complete a run.
    #[must_use]
    pub fn would_match(grid: &Grid, cell: Cell, kind: TokenType) -> bool {
        [Axis::Horizontal, Axis::Vertical]
            .into_iter()
            .any(|axis| MatchDetector::run_through(grid, cell, kind, axis) >= MIN_MATCH)
    }

    /// Types that can be placed at `cell` without completing a run.
    #[must_use]
    pub fn safe_types(&self, grid: &Grid, cell: Cell) -> SmallVec<[TokenType; 6]> {
        self.token_types
            .iter()
            .copied()
            .filter(|&kind| !Self::would_match(grid, cell, kind))
            .collect()
    }

    /// Choose uniformly among the safe types for `cell`.
    pub fn choose_token_type(
        &self,
        grid: &Grid,
        cell: Cell,
        rng: &mut GameRng,
    ) -> Result<TokenType, FillError> {
        if self.token_types.is_empty() {
            return Err(FillError::NoTokenTypes);
        }
        let candidates = self.safe_types(grid, cell);
        rng.choose(&candidates).ok_or(FillError::Exhausted { cell })
    }

    /// Choose uniformly among all configured types.
    pub fn choose_unconstrained(&self, rng: &mut GameRng) -> Result<TokenType, FillError> {
        rng.choose(&self.token_types).ok_or(FillError::NoTokenTypes)
    }

    /// Fill every vacant cell in row-major order without creating runs.
    ///
    /// Cells with no safe type are left vacant and returned.
    pub fn fill_vacant(&self, grid: &mut Grid, rng: &mut GameRng) -> Result<Vec<Cell>, FillError> {
        let mut exhausted = Vec::new();
        let cells: Vec<Cell> = grid.cells().collect();
        for cell in cells {
            if !grid.is_vacant(cell) {
                continue;
            }
            match self.choose_token_type(grid, cell, rng) {
                Ok(kind) => {
                    grid.spawn(cell, kind);
                }
                Err(FillError::Exhausted { cell }) => exhausted.push(cell),
                Err(err) => return Err(err),
            }
        }
        Ok(exhausted)
    }
}
