//! Board simulation: grid storage, filling, matching, swapping, cascading.
//!
//! Everything here operates directly on a [`Grid`] and returns plain values.
//! Sequencing (waiting for animations, the rescan loop, selection gating)
//! lives in [`crate::engine`].
//!
//! ## Example
//!
//! ```
//! use rune_match::board::{CascadeResolver, Grid, MatchDetector};
//!
//! let mut grid = Grid::from_layout(&[
//!     "GRY",
//!     "YGR",
//!     "BBB",
//! ]);
//!
//! let scan = MatchDetector::scan_board(&grid);
//! assert_eq!(scan.len(), 1);
//!
//! let removal = CascadeResolver::resolve(&mut grid, &scan, 1);
//! assert_eq!(removal.removed.len(), 3);
//!
//! let moves = CascadeResolver::compact(&mut grid);
//! assert_eq!(moves.len(), 6);
//! ```

mod cascade;
mod fill;
mod grid;
mod matcher;
mod swap;

pub use cascade::{CascadeResolver, Removal, ScoreEvent, SmashTier, Spawned, TokenMove, RARE_MULTIPLIER};
pub use fill::RandomFillPolicy;
pub use grid::Grid;
pub use matcher::{Axis, MatchDescriptor, MatchDetector, ScanResult, BIG_MATCH, MIN_MATCH};
pub use swap::{SelectOutcome, SwapEngine, SwapState};
