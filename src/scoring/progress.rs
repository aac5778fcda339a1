//! Round progress: score, moves and the win/lose decision.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::ScoreEvent;
use crate::core::ProgressConfig;

use super::points::{match_score, point_value};

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
}

/// Score and move tracking for one round at a time.
///
/// The round ends when the last move is consumed; it is won if the score has
/// reached the target by then.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameProgress {
    config: ProgressConfig,
    score: u64,
    moves_left: u32,
    outcome: Option<GameOutcome>,
}

impl GameProgress {
    pub fn new(config: ProgressConfig) -> Self {
        let moves_left = config.starting_moves;
        Self {
            config,
            score: 0,
            moves_left,
            outcome: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    #[must_use]
    pub fn target_score(&self) -> u64 {
        self.config.target_score
    }

    /// Result of the finished round, if it has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Reset for a fresh round.
    pub fn on_game_start(&mut self) {
        self.score = 0;
        self.moves_left = self.config.starting_moves;
        self.outcome = None;
    }

    /// Add a scored run. Returns the points awarded.
    pub fn on_score_event(&mut self, event: &ScoreEvent) -> u64 {
        let points = match_score(event.length, event.multiplier);
        self.score += points;
        debug!(
            length = event.length,
            base = point_value(event.length),
            multiplier = event.multiplier,
            points,
            total = self.score,
            "match scored"
        );
        points
    }

    /// Spend a move. Returns the outcome when this was the last one.
    pub fn on_move_consumed(&mut self) -> Option<GameOutcome> {
        if self.outcome.is_some() {
            return None;
        }
        self.moves_left = self.moves_left.saturating_sub(1);
        if self.moves_left > 0 {
            return None;
        }

        let outcome = if self.score >= self.config.target_score {
            GameOutcome::Won
        } else {
            GameOutcome::Lost
        };
        info!(?outcome, score = self.score, target = self.config.target_score, "round over");
        self.outcome = Some(outcome);
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Axis;
    use crate::core::TokenType;

    fn run(length: usize, multiplier: u32) -> ScoreEvent {
        ScoreEvent {
            length,
            multiplier,
            kind: TokenType::Purple,
            axis: Axis::Horizontal,
            line: 0,
            start: 0,
        }
    }

    #[test]
    fn test_new_progress() {
        let progress = GameProgress::new(ProgressConfig::default());
        assert_eq!(progress.score(), 0);
        assert_eq!(progress.moves_left(), 10);
        assert_eq!(progress.target_score(), 4000);
        assert_eq!(progress.outcome(), None);
    }

    #[test]
    fn test_score_accumulates() {
        let mut progress = GameProgress::new(ProgressConfig::default());
        assert_eq!(progress.on_score_event(&run(3, 1)), 60);
        assert_eq!(progress.on_score_event(&run(4, 2)), 240);
        assert_eq!(progress.score(), 300);
    }

    #[test]
    fn test_lose_when_moves_run_out() {
        let mut progress = GameProgress::new(ProgressConfig::default().with_starting_moves(2));
        progress.on_score_event(&run(3, 1));
        assert_eq!(progress.on_move_consumed(), None);
        assert_eq!(progress.moves_left(), 1);
        assert_eq!(progress.on_move_consumed(), Some(GameOutcome::Lost));
        assert_eq!(progress.moves_left(), 0);

        // Further moves after the round ended are ignored
        assert_eq!(progress.on_move_consumed(), None);
        assert_eq!(progress.outcome(), Some(GameOutcome::Lost));
    }

    #[test]
    fn test_win_at_exact_target() {
        let config = ProgressConfig::default()
            .with_starting_moves(1)
            .with_target_score(120);
        let mut progress = GameProgress::new(config);
        progress.on_score_event(&run(3, 2));
        assert_eq!(progress.on_move_consumed(), Some(GameOutcome::Won));
    }

    #[test]
    fn test_game_start_resets() {
        let mut progress = GameProgress::new(ProgressConfig::default().with_starting_moves(1));
        progress.on_score_event(&run(5, 1));
        progress.on_move_consumed();

        progress.on_game_start();
        assert_eq!(progress.score(), 0);
        assert_eq!(progress.moves_left(), 1);
        assert_eq!(progress.outcome(), None);
    }
}
