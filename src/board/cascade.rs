//! Cascade resolution: removal, gravity and refill.
//!
//! The resolver works purely on grid state and returns what happened; the
//! board turns the results into presentation requests and drives the
//! rescan loop. Each step is a separate call because the board waits for
//! animations between them.
//!
//! ## Steps
//!
//! 1. [`CascadeResolver::resolve`]: score every descriptor, remove the union
//!    of covered tokens, classify the batch
//! 2. [`CascadeResolver::compact`]: stable per-column compaction toward row 0
//! 3. [`CascadeResolver::refill`]: spawn new tokens above the board for every
//!    vacated top slot

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{Cell, FillError, GameRng, Position, RefillPolicy, Token, TokenId, TokenType};

use super::matcher::{Axis, ScanResult};
use super::{Grid, RandomFillPolicy};

/// Multiplier at which a non-big batch is classed as rare.
pub const RARE_MULTIPLIER: u32 = 4;

/// A scored run, reported once per descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub length: usize,
    pub multiplier: u32,
    pub kind: TokenType,
    pub axis: Axis,
    pub line: usize,
    pub start: usize,
}

/// How impressive a removal batch was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmashTier {
    Common,
    /// Deep combo (multiplier of [`RARE_MULTIPLIER`] or more).
    Rare,
    /// At least one run of five or more.
    UltraRare,
}

/// Outcome of removing one scan's matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Removal {
    pub scores: Vec<ScoreEvent>,
    pub removed: Vec<Token>,
    pub tier: SmashTier,
}

/// A token relocated on the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TokenMove {
    pub token: TokenId,
    pub from: Cell,
    pub to: Cell,
}

/// A token created by refill, starting above the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spawned {
    pub token: TokenId,
    pub kind: TokenType,
    pub cell: Cell,
    pub spawn_at: Position,
}

/// Resolves matches and cascades on a grid.
pub struct CascadeResolver;

impl CascadeResolver {
    /// Classify a batch for effects.
    #[must_use]
    pub fn smash_tier(scan: &ScanResult, multiplier: u32) -> SmashTier {
        if scan.is_big() {
            SmashTier::UltraRare
        } else if multiplier >= RARE_MULTIPLIER {
            SmashTier::Rare
        } else {
            SmashTier::Common
        }
    }

    /// Score every descriptor and remove all covered tokens.
    pub fn resolve(grid: &mut Grid, scan: &ScanResult, multiplier: u32) -> Removal {
        let scores = scan
            .iter()
            .map(|m| ScoreEvent {
                length: m.length,
                multiplier,
                kind: m.kind,
                axis: m.axis,
                line: m.line,
                start: m.start,
            })
            .collect();

        let removed = scan
            .covered_cells()
            .into_iter()
            .filter_map(|cell| grid.take(cell))
            .collect();

        Removal {
            scores,
            removed,
            tier: Self::smash_tier(scan, multiplier),
        }
    }

    /// Drop every token down to the lowest free slot in its column.
    ///
    /// Relative order within a column is preserved and no token moves up.
    pub fn compact(grid: &mut Grid) -> Vec<TokenMove> {
        let size = grid.size();
        let mut moves = Vec::new();
        for col in 0..size {
            let mut write = 0;
            for row in 0..size {
                let from = Cell::new(row, col);
                if grid.is_vacant(from) {
                    continue;
                }
                if row != write {
                    let to = Cell::new(write, col);
                    if let Some(token) = grid.move_token(from, to) {
                        moves.push(TokenMove { token, from, to });
                    }
                }
                write += 1;
            }
        }
        moves
    }

    /// Fill every vacant slot with a new token spawned above the board.
    ///
    /// Within a column spawn rows stack upward from `size`, so several new
    /// tokens in one column fall in as a column themselves.
    pub fn refill(
        grid: &mut Grid,
        policy: &RandomFillPolicy,
        refill: RefillPolicy,
        rng: &mut GameRng,
    ) -> Result<Vec<Spawned>, FillError> {
        let size = grid.size();
        let mut spawned = Vec::new();
        for col in 0..size {
            let mut spawn_row = size;
            for row in 0..size {
                let cell = Cell::new(row, col);
                if !grid.is_vacant(cell) {
                    continue;
                }
                let kind = match refill {
                    RefillPolicy::Unconstrained => policy.choose_unconstrained(rng)?,
                    RefillPolicy::Constrained => match policy.choose_token_type(grid, cell, rng) {
                        Ok(kind) => kind,
                        Err(FillError::Exhausted { cell }) => {
                            warn!(%cell, "no safe token type for refill, picking unconstrained");
                            policy.choose_unconstrained(rng)?
                        }
                        Err(err) => return Err(err),
                    },
                };
                let token = grid.spawn(cell, kind);
                spawned.push(Spawned {
                    token,
                    kind,
                    cell,
                    spawn_at: Position::new(col as f32, spawn_row as f32),
                });
                spawn_row += 1;
            }
        }
        Ok(spawned)
    }
}
