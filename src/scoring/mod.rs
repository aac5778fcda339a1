//! Scoring, round progress and the session that ties them to a board.
//!
//! - [`point_value`] / [`match_score`]: points for a single run
//! - [`GameProgress`]: score total, remaining moves, win/lose
//! - [`Session`]: one board plus its progress, routing events between them
//!   and running the game-over countdown

mod points;
mod progress;
mod session;

pub use points::{match_score, point_value};
pub use progress::{GameOutcome, GameProgress};
pub use session::{Session, SessionEvent};
