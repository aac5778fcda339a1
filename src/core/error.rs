//! Error types.
//!
//! Only configuration problems are surfaced as hard errors. Placement
//! exhaustion is recoverable and handled by the caller's fallback; invalid
//! selections are ignored without an error value at all.

use thiserror::Error;

use super::{Cell, TokenType};

/// Board configuration rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No token types configured; no board can be built.
    #[error("no token types configured")]
    NoTokenTypes,

    /// The same token type was listed more than once.
    #[error("token type {0} listed more than once")]
    DuplicateTokenType(TokenType),

    /// Board size of zero.
    #[error("board size must be at least 1")]
    ZeroBoardSize,
}

/// Failure to choose a token type for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FillError {
    /// The configured token type set is empty.
    #[error("no token types configured")]
    NoTokenTypes,

    /// Every configured type would complete a run at this cell.
    #[error("no token type can be placed at {cell} without forming a match")]
    Exhausted { cell: Cell },
}
