//! Board and game configuration.
//!
//! Hosts configure the engine at startup by providing:
//! - `BoardConfig`: board size, token types, refill policy, timings
//! - `ProgressConfig`: move allowance and target score for a round
//!
//! Both have sensible defaults matching the classic 5x5, six-rune game and
//! are validated once when a board or session is built.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigError, TokenType};

/// How vacated top slots are refilled after a cascade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefillPolicy {
    /// Pick any configured type. New matches may appear and are caught by the
    /// rescan, producing combos.
    #[default]
    Unconstrained,
    /// Use the no-match fill policy, falling back to an unconstrained pick
    /// when no safe type exists for a cell.
    Constrained,
}

/// Duration hints attached to presentation requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationTimings {
    /// Swap (and swap-back) move duration.
    pub swap: Duration,
    /// Fall duration for cascading and spawned tokens.
    pub fall: Duration,
    /// Fade-out duration when restarting with effects.
    pub fade: Duration,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            swap: Duration::from_millis(300),
            fall: Duration::from_millis(1000),
            fade: Duration::from_millis(1500),
        }
    }
}

/// Complete board configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Side length of the square board.
    pub board_size: usize,

    /// Token types that may appear on the board.
    pub token_types: Vec<TokenType>,

    /// Refill strategy after a cascade.
    pub refill: RefillPolicy,

    /// Pause between removing matched tokens and starting the cascade.
    pub cascade_delay: Duration,

    /// How many times a full population is retried when the fill policy runs
    /// out of safe types.
    pub max_fill_attempts: u32,

    /// Repopulate the board when no swap can produce a match.
    pub reshuffle_when_stuck: bool,

    /// Duration hints for presentation requests.
    pub timings: AnimationTimings,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            board_size: 5,
            token_types: TokenType::ALL.to_vec(),
            refill: RefillPolicy::Unconstrained,
            cascade_delay: Duration::from_millis(200),
            max_fill_attempts: 16,
            reshuffle_when_stuck: true,
            timings: AnimationTimings::default(),
        }
    }
}

impl BoardConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the board size.
    #[must_use]
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    /// Set the token types.
    #[must_use]
    pub fn with_token_types(mut self, types: impl Into<Vec<TokenType>>) -> Self {
        self.token_types = types.into();
        self
    }

    /// Set the refill policy.
    #[must_use]
    pub fn with_refill(mut self, refill: RefillPolicy) -> Self {
        self.refill = refill;
        self
    }

    /// Set the delay between match removal and cascade.
    #[must_use]
    pub fn with_cascade_delay(mut self, delay: Duration) -> Self {
        self.cascade_delay = delay;
        self
    }

    /// Set the number of population attempts.
    #[must_use]
    pub fn with_max_fill_attempts(mut self, attempts: u32) -> Self {
        self.max_fill_attempts = attempts;
        self
    }

    /// Enable or disable the stuck-board reshuffle.
    #[must_use]
    pub fn with_reshuffle_when_stuck(mut self, enabled: bool) -> Self {
        self.reshuffle_when_stuck = enabled;
        self
    }

    /// Set animation duration hints.
    #[must_use]
    pub fn with_timings(mut self, timings: AnimationTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Check the configuration can build a board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::ZeroBoardSize);
        }
        if self.token_types.is_empty() {
            return Err(ConfigError::NoTokenTypes);
        }
        for (i, kind) in self.token_types.iter().enumerate() {
            if self.token_types[..i].contains(kind) {
                return Err(ConfigError::DuplicateTokenType(*kind));
            }
        }
        Ok(())
    }
}

/// Round rules for score tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Moves available at the start of a round.
    pub starting_moves: u32,

    /// Score needed by the time moves run out to win.
    pub target_score: u64,

    /// Wait after game over before the board restarts.
    pub restart_delay: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            starting_moves: 10,
            target_score: 4000,
            restart_delay: Duration::from_secs(5),
        }
    }
}

impl ProgressConfig {
    /// Set the starting moves.
    #[must_use]
    pub fn with_starting_moves(mut self, moves: u32) -> Self {
        self.starting_moves = moves;
        self
    }

    /// Set the target score.
    #[must_use]
    pub fn with_target_score(mut self, target: u64) -> Self {
        self.target_score = target;
        self
    }

    /// Set the game-over restart delay.
    #[must_use]
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }
}
