//! A board and its round progress, wired together.
//!
//! The session is the host-facing entry point for a whole game. It forwards
//! input to its [`Board`], routes the board's score and move notifications
//! into [`GameProgress`], and when a round ends it plays the game-over
//! sound, freezes the board and restarts it after
//! [`ProgressConfig::restart_delay`].
//!
//! Hosts drain [`SessionEvent`]s instead of board events. Every board event
//! is passed through unchanged as [`SessionEvent::Board`], followed by any
//! progress updates it caused.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{BoardConfig, Cell, ConfigError, ProgressConfig};
use crate::engine::{BatchId, Board, BoardEvent, Sound};

use super::progress::{GameOutcome, GameProgress};

/// Everything a session reports to its host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A board event, passed through.
    Board(BoardEvent),
    /// The score total changed.
    ScoreChanged { score: u64 },
    /// The move allowance changed.
    MovesChanged { moves: u32 },
    /// The round ended. The board is frozen until the restart.
    GameOver { outcome: GameOutcome },
}

/// One board plus its score tracker.
#[derive(Clone, Debug)]
pub struct Session {
    board: Board,
    progress: GameProgress,
    restart_timer: Option<Duration>,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Build a session with a freshly populated board.
    pub fn new(board: BoardConfig, progress: ProgressConfig, seed: u64) -> Result<Self, ConfigError> {
        let board = Board::new(board, seed)?;
        Ok(Self::with_board(board, progress))
    }

    /// Wrap an existing board. Progress starts a fresh round.
    pub fn with_board(board: Board, progress: ProgressConfig) -> Self {
        let mut progress = GameProgress::new(progress);
        progress.on_game_start();
        let mut session = Self {
            board,
            progress,
            restart_timer: None,
            events: Vec::new(),
        };
        session.pump();
        session
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    /// Check if the round has ended and the restart countdown is running.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.restart_timer.is_some()
    }

    /// Time left before the board restarts after a game over.
    #[must_use]
    pub fn restart_remaining(&self) -> Option<Duration> {
        self.restart_timer
    }

    /// Take every queued event.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn on_cell_selected(&mut self, cell: Cell) {
        self.board.on_cell_selected(cell);
        self.pump();
    }

    pub fn on_animation_batch_complete(&mut self, batch: BatchId) {
        self.board.on_animation_batch_complete(batch);
        self.pump();
    }

    /// Player-initiated restart. See [`Board::request_restart`].
    pub fn request_restart(&mut self) -> bool {
        let accepted = self.board.request_restart();
        self.pump();
        accepted
    }

    /// Let time pass for the board and the restart countdown.
    pub fn advance(&mut self, elapsed: Duration) {
        self.board.advance(elapsed);

        if let Some(remaining) = self.restart_timer {
            let remaining = remaining.saturating_sub(elapsed);
            if remaining.is_zero() {
                info!("restarting after game over");
                self.restart_timer = None;
                self.board.restart_board(true);
            } else {
                self.restart_timer = Some(remaining);
            }
        }

        self.pump();
    }

    /// Route queued board events until the board has nothing left to say.
    fn pump(&mut self) {
        loop {
            let events = self.board.drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                self.route(event);
            }
        }
    }

    fn route(&mut self, event: BoardEvent) {
        let follow_up = match &event {
            BoardEvent::Score(score) => {
                self.progress.on_score_event(score);
                vec![SessionEvent::ScoreChanged {
                    score: self.progress.score(),
                }]
            }
            BoardEvent::MoveConsumed => {
                let outcome = self.progress.on_move_consumed();
                let mut follow_up = vec![SessionEvent::MovesChanged {
                    moves: self.progress.moves_left(),
                }];
                if let Some(outcome) = outcome {
                    self.game_over();
                    follow_up.push(SessionEvent::GameOver { outcome });
                }
                follow_up
            }
            BoardEvent::GameStarted => {
                debug!("round started");
                self.progress.on_game_start();
                vec![
                    SessionEvent::ScoreChanged {
                        score: self.progress.score(),
                    },
                    SessionEvent::MovesChanged {
                        moves: self.progress.moves_left(),
                    },
                ]
            }
            _ => Vec::new(),
        };
        self.events.push(SessionEvent::Board(event));
        self.events.extend(follow_up);
    }

    fn game_over(&mut self) {
        self.board.request_sound(Sound::GameOver);
        self.board.pause_board(true);
        self.restart_timer = Some(self.progress.config().restart_delay);
    }
}
