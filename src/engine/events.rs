//! Requests and notifications emitted by the board.
//!
//! The board never calls into rendering, audio or scoring directly. It
//! queues [`BoardEvent`]s that the host drains after every call and routes
//! to whichever collaborator handles them.
//!
//! ## Animation Batches
//!
//! Move and fade requests carry a [`BatchId`]. After the last request of a
//! batch the board emits [`BoardEvent::AwaitBatch`] and waits; the host
//! reports completion with `Board::on_animation_batch_complete(batch)`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::{ScoreEvent, SmashTier};
use crate::core::{Position, TokenId, TokenType};

/// Identifier for a group of animations the board waits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub u32);

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Batch({})", self.0)
    }
}

/// Sound clips the board can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    Select,
    Swap,
    SmashCommon,
    SmashRare,
    SmashUltraRare,
    GameOver,
}

impl Sound {
    /// Clip for a removal tier.
    #[must_use]
    pub fn for_tier(tier: SmashTier) -> Self {
        match tier {
            SmashTier::Common => Sound::SmashCommon,
            SmashTier::Rare => Sound::SmashRare,
            SmashTier::UltraRare => Sound::SmashUltraRare,
        }
    }
}

/// A sound request with playback hints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoundRequest {
    pub clip: Sound,
    pub volume: f32,
    pub pitch: f32,
}

impl SoundRequest {
    /// Full volume, normal pitch.
    #[must_use]
    pub fn plain(clip: Sound) -> Self {
        Self {
            clip,
            volume: 1.0,
            pitch: 1.0,
        }
    }

    /// Removal sound. Smashes play quieter, and the common smash rises in
    /// pitch with the combo multiplier.
    #[must_use]
    pub fn smash(tier: SmashTier, multiplier: u32) -> Self {
        let clip = Sound::for_tier(tier);
        let pitch = if clip == Sound::SmashCommon {
            1.0 + 0.25 * multiplier as f32
        } else {
            1.0
        };
        Self {
            clip,
            volume: 0.7,
            pitch,
        }
    }
}

/// Motion curve hint for a move request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    /// Bounce on landing; used for falling tokens.
    Bounce,
}

/// Everything the board asks of, or tells, its collaborators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// A new token exists; create its sprite at `position`.
    Spawn {
        token: TokenId,
        kind: TokenType,
        position: Position,
    },

    /// Animate a token between two positions.
    Move {
        batch: BatchId,
        token: TokenId,
        from: Position,
        to: Position,
        duration: Duration,
        easing: Easing,
    },

    /// Fade a token toward `alpha`.
    Fade {
        batch: BatchId,
        token: TokenId,
        alpha: f32,
        duration: Duration,
    },

    /// All requests for `batch` have been emitted; report its completion.
    AwaitBatch(BatchId),

    /// Play an explosion effect.
    Explosion { position: Position },

    /// The token is gone; drop its sprite.
    Destroy { token: TokenId },

    /// Toggle the selection glow on a token.
    Highlight { token: TokenId, on: bool },

    Sound(SoundRequest),

    /// A run was matched.
    Score(ScoreEvent),

    /// A swap fully resolved and its cascade settled.
    MoveConsumed,

    /// A fresh round is ready for input.
    GameStarted,

    /// The board had no legal swap and was repopulated.
    Reshuffled,
}
