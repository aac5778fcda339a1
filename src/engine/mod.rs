//! Board sequencing and the event protocol.
//!
//! [`Board`] owns the grid and drives a swap from selection through
//! resolution. It talks to its collaborators (renderer, audio, score
//! tracker) only through the [`BoardEvent`] queue.
//!
//! ## Usage
//!
//! ```
//! use rune_match::core::{BoardConfig, Cell};
//! use rune_match::engine::{Board, BoardEvent, GamePhase};
//!
//! let mut board = Board::new(BoardConfig::default(), 42).unwrap();
//! assert_eq!(board.phase(), GamePhase::Ready);
//!
//! board.drain_events();
//! board.on_cell_selected(Cell::new(0, 0));
//! board.on_cell_selected(Cell::new(0, 1));
//!
//! // The host plays the requested animations, then reports back.
//! loop {
//!     for event in board.drain_events() {
//!         if let BoardEvent::Score(score) = event {
//!             println!("matched {} x{}", score.length, score.multiplier);
//!         }
//!     }
//!     let delay = board.config().cascade_delay;
//!     board.advance(delay);
//!     match board.pending_batch() {
//!         Some(batch) => board.on_animation_batch_complete(batch),
//!         None => break,
//!     }
//! }
//! assert_eq!(board.phase(), GamePhase::Ready);
//! ```

mod events;
mod machine;

pub use events::{BatchId, BoardEvent, Easing, Sound, SoundRequest};
pub use machine::{Board, GamePhase};
