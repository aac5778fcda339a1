//! Core engine types: coordinates, tokens, RNG, configuration, errors.
//!
//! This module holds the leaf types every other module builds on. It has no
//! knowledge of matching, cascades or scoring.

pub mod cell;
pub mod config;
pub mod error;
pub mod rng;
pub mod token;

pub use cell::{are_adjacent, Cell, Position};
pub use config::{AnimationTimings, BoardConfig, ProgressConfig, RefillPolicy};
pub use error::{ConfigError, FillError};
pub use rng::GameRng;
pub use token::{Token, TokenId, TokenType};
