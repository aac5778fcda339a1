//! # rune-match
//!
//! A deterministic match-3 board engine.
//!
//! Players swap adjacent runes to line up three or more of a kind. Matched
//! runes are removed and scored, the columns above fall, new runes drop in
//! from the top, and any run that forms along the way is removed in turn at
//! a rising multiplier.
//!
//! ## Design Principles
//!
//! 1. **Host-Driven**: The engine never renders, plays audio or sleeps. It
//!    queues requests ("move token 7 to (2, 3)", "play SmashRare") and waits
//!    for the host to report that an animation batch has finished.
//!
//! 2. **Deterministic**: All randomness flows from one seeded `GameRng`.
//!    Same seed, same inputs, same game.
//!
//! 3. **Clean Boards**: A populated board never contains a run. Every run the
//!    player sees is one they made or one a cascade made.
//!
//! ## Modules
//!
//! - `core`: Cells, tokens, RNG, configuration and errors
//! - `board`: Grid storage, fill policy, match detection, swaps, cascades
//! - `engine`: The `Board` state machine and its event protocol
//! - `scoring`: Point values, round progress and the `Session` wrapper

pub mod core;
pub mod board;
pub mod engine;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    Cell, Position,
    Token, TokenId, TokenType,
    GameRng,
    BoardConfig, ProgressConfig, RefillPolicy, AnimationTimings,
    ConfigError, FillError,
};

pub use crate::board::{
    Grid, MatchDetector, MatchDescriptor, ScanResult, Axis,
    CascadeResolver, ScoreEvent, SmashTier,
    RandomFillPolicy, SwapEngine, SwapState,
};

pub use crate::engine::{Board, BoardEvent, BatchId, GamePhase, Sound, SoundRequest, Easing};

pub use crate::scoring::{point_value, match_score, GameProgress, GameOutcome, Session, SessionEvent};
