//! The board state machine.
//!
//! `Board` sequences selection, swapping, match resolution and cascades. It
//! is driven entirely by its host:
//!
//! - `on_cell_selected` for player input
//! - `on_animation_batch_complete` when a batch of requested animations ends
//! - `advance` to let the removal-to-cascade delay elapse
//!
//! and reports back through the event queue (`drain_events`).
//!
//! ## Phases
//!
//! ```text
//! Empty -> Ready -> Swapping -> SwappingBack -> Ready
//!                      |
//!                      v
//!                   Deleting -> Cascading -> Deleting (combo)
//!                                    |
//!                                    v
//!                                  Ready
//!
//! any phase --restart_board(true)--> Clearing -> Ready
//! ```
//!
//! `paused` is orthogonal: it blocks player selection only. At most one
//! animation batch is pending at a time, which keeps swap and cascade
//! sequences from overlapping.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

use crate::board::{CascadeResolver, Grid, MatchDetector, RandomFillPolicy, ScanResult, SelectOutcome, SwapEngine, SwapState};
use crate::core::{BoardConfig, Cell, ConfigError, GameRng, TokenId};

use super::events::{BatchId, BoardEvent, Easing, Sound, SoundRequest};

/// Board phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not yet populated.
    Empty,
    /// Accepting selections.
    Ready,
    /// A swap animation is playing.
    Swapping,
    /// A matchless swap is being undone.
    SwappingBack,
    /// Matched tokens removed; waiting for the cascade delay.
    Deleting,
    /// Tokens falling; waiting for the batch to settle.
    Cascading,
    /// Tokens fading out before a restart. Any resolution in flight was
    /// abandoned.
    Clearing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PendingKind {
    Swap,
    SwapBack,
    Cascade,
    ClearFade,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    batch: BatchId,
    kind: PendingKind,
}

/// Match-3 board driven by host events.
#[derive(Clone, Debug)]
pub struct Board {
    config: BoardConfig,
    grid: Grid,
    fill: RandomFillPolicy,
    swaps: SwapEngine,
    /// Parent stream; each round forks from it.
    rng: GameRng,
    round_rng: GameRng,
    phase: GamePhase,
    paused: bool,
    multiplier: u32,
    pending: Option<Pending>,
    next_batch: u32,
    delete_timer: Duration,
    events: Vec<BoardEvent>,
}

impl Board {
    /// Build and populate a board.
    ///
    /// The returned board is `Ready` with spawn events and `GameStarted`
    /// queued.
    pub fn new(config: BoardConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut board = Self::empty(config, seed)?;
        board.restart_board(false);
        Ok(board)
    }

    /// Build a `Ready` board around an existing grid.
    ///
    /// No events are queued. The grid is taken as-is, including any runs it
    /// already contains.
    ///
    /// # Panics
    ///
    /// Panics if the grid size differs from `config.board_size`.
    pub fn from_grid(config: BoardConfig, grid: Grid, seed: u64) -> Result<Self, ConfigError> {
        assert_eq!(grid.size(), config.board_size, "grid size does not match configuration");
        let mut board = Self::empty(config, seed)?;
        board.grid = grid;
        board.phase = GamePhase::Ready;
        Ok(board)
    }

    fn empty(config: BoardConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = GameRng::new(seed);
        let round_rng = rng.fork();
        Ok(Self {
            grid: Grid::new(config.board_size),
            fill: RandomFillPolicy::new(config.token_types.clone()),
            swaps: SwapEngine::new(),
            rng,
            round_rng,
            phase: GamePhase::Empty,
            paused: false,
            multiplier: 1,
            pending: None,
            next_batch: 0,
            delete_timer: Duration::ZERO,
            events: Vec::new(),
            config,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current combo multiplier.
    #[must_use]
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Selection state.
    #[must_use]
    pub fn swap_state(&self) -> SwapState {
        self.swaps.state()
    }

    /// The batch the board is waiting on, if any.
    #[must_use]
    pub fn pending_batch(&self) -> Option<BatchId> {
        self.pending.map(|p| p.batch)
    }

    /// Check if any adjacent swap would form a match.
    #[must_use]
    pub fn has_legal_move(&self) -> bool {
        let mut probe = self.grid.clone();
        SwapEngine::find_legal_swap(&mut probe).is_some()
    }

    // === Event Queue ===

    /// Queued events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    /// Take every queued event.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queue a sound request on behalf of a collaborator.
    pub fn request_sound(&mut self, clip: Sound) {
        self.events.push(BoardEvent::Sound(SoundRequest::plain(clip)));
    }

    // === Collaborator Entry Points ===

    /// Handle a player selecting a cell.
    ///
    /// Ignored while paused, while anything is in flight, and for
    /// out-of-bounds or empty cells.
    pub fn on_cell_selected(&mut self, cell: Cell) {
        if self.paused {
            trace!(%cell, "selection ignored: board paused");
            return;
        }
        if self.phase != GamePhase::Ready {
            trace!(%cell, phase = ?self.phase, "selection ignored: board busy");
            return;
        }
        if !self.grid.in_bounds(cell) || self.grid.is_vacant(cell) {
            trace!(%cell, "selection ignored: no token there");
            return;
        }

        match self.swaps.select(cell) {
            SelectOutcome::Selected(cell) => {
                self.highlight(cell, true);
                self.request_sound(Sound::Select);
            }
            SelectOutcome::Reselected { previous, cell } => {
                self.highlight(previous, false);
                self.highlight(cell, true);
                self.request_sound(Sound::Select);
            }
            SelectOutcome::SwapStarted { first, second } => {
                debug!(%first, %second, "swap started");
                self.highlight(first, false);
                self.phase = GamePhase::Swapping;
                self.animate_swap(first, second, PendingKind::Swap);
            }
            SelectOutcome::Ignored => {}
        }
    }

    /// Handle completion of an animation batch.
    ///
    /// Ids other than the pending batch are ignored.
    pub fn on_animation_batch_complete(&mut self, batch: BatchId) {
        let pending = match self.pending {
            Some(pending) if pending.batch == batch => pending,
            _ => {
                trace!(%batch, "ignoring stale batch completion");
                return;
            }
        };
        self.pending = None;

        match pending.kind {
            PendingKind::Swap => self.finish_swap(),
            PendingKind::SwapBack => self.finish_swap_back(),
            PendingKind::Cascade => self.settle(),
            PendingKind::ClearFade => self.restart_now(),
        }
    }

    /// Let time pass. Drives the delay between removal and cascade.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.phase != GamePhase::Deleting {
            return;
        }
        self.delete_timer = self.delete_timer.saturating_sub(elapsed);
        if self.delete_timer.is_zero() {
            self.cascade();
        }
    }

    /// Block or allow player selection.
    pub fn pause_board(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Start a new round.
    ///
    /// With effects, every token fades out first and the board repopulates
    /// once that batch completes. Any swap or cascade in progress is dropped
    /// and selection is blocked until the new round is ready.
    pub fn restart_board(&mut self, with_effects: bool) {
        if !with_effects || self.grid.token_count() == 0 {
            self.restart_now();
            return;
        }

        debug!(phase = ?self.phase, "clearing board for restart");
        self.paused = true;
        self.swaps.finish();
        self.delete_timer = Duration::ZERO;
        self.phase = GamePhase::Clearing;

        let batch = self.next_batch_id();
        let duration = self.config.timings.fade;
        let fades: Vec<BoardEvent> = self
            .grid
            .tokens()
            .map(|token| BoardEvent::Fade {
                batch,
                token: token.id,
                alpha: 0.0,
                duration,
            })
            .collect();
        self.events.extend(fades);
        self.await_batch(batch, PendingKind::ClearFade);
    }

    /// Player-initiated restart. Only honoured when idle and unpaused.
    pub fn request_restart(&mut self) -> bool {
        if self.phase != GamePhase::Ready || self.paused || self.pending.is_some() {
            return false;
        }
        self.restart_board(true);
        true
    }

    // === Swapping ===

    fn animate_swap(&mut self, first: Cell, second: Cell, kind: PendingKind) {
        let batch = self.next_batch_id();
        let duration = self.config.timings.swap;
        for (from, to) in [(first, second), (second, first)] {
            if let Some(token) = self.grid.get(from) {
                self.events.push(BoardEvent::Move {
                    batch,
                    token: token.id,
                    from: from.position(),
                    to: to.position(),
                    duration,
                    easing: Easing::Linear,
                });
            }
        }
        self.request_sound(Sound::Swap);
        self.await_batch(batch, kind);
    }

    fn finish_swap(&mut self) {
        let Some((first, second)) = self.swaps.pending_pair() else {
            error!("swap completed with no pending pair");
            self.phase = GamePhase::Ready;
            return;
        };
        self.grid.swap(first, second);
        self.multiplier = 1;

        let scan = MatchDetector::scan_board(&self.grid);
        if scan.is_empty() {
            debug!(%first, %second, "swap made no match, swapping back");
            self.swaps.begin_swap_back();
            self.phase = GamePhase::SwappingBack;
            self.animate_swap(first, second, PendingKind::SwapBack);
        } else {
            self.swaps.finish();
            self.remove_matches(&scan);
        }
    }

    fn finish_swap_back(&mut self) {
        if let Some((first, second)) = self.swaps.pending_pair() {
            self.grid.swap(first, second);
        }
        self.swaps.finish();
        self.phase = GamePhase::Ready;
    }

    // === Resolution ===

    fn remove_matches(&mut self, scan: &ScanResult) {
        debug!(matches = scan.len(), multiplier = self.multiplier, big = scan.is_big(), "resolving matches");
        let removal = CascadeResolver::resolve(&mut self.grid, scan, self.multiplier);

        self.events.extend(removal.scores.into_iter().map(BoardEvent::Score));
        self.events.push(BoardEvent::Sound(SoundRequest::smash(removal.tier, self.multiplier)));
        for token in removal.removed {
            self.events.push(BoardEvent::Explosion {
                position: token.cell.position(),
            });
            self.events.push(BoardEvent::Destroy { token: token.id });
        }

        self.phase = GamePhase::Deleting;
        self.delete_timer = self.config.cascade_delay;
        if self.delete_timer.is_zero() {
            self.cascade();
        }
    }

    fn cascade(&mut self) {
        let batch = self.next_batch_id();
        let duration = self.config.timings.fall;

        let moves = CascadeResolver::compact(&mut self.grid);
        for m in moves {
            self.events.push(BoardEvent::Move {
                batch,
                token: m.token,
                from: m.from.position(),
                to: m.to.position(),
                duration,
                easing: Easing::Bounce,
            });
        }

        match CascadeResolver::refill(&mut self.grid, &self.fill, self.config.refill, &mut self.round_rng) {
            Ok(spawned) => {
                for s in spawned {
                    self.events.push(BoardEvent::Spawn {
                        token: s.token,
                        kind: s.kind,
                        position: s.spawn_at,
                    });
                    self.events.push(BoardEvent::Move {
                        batch,
                        token: s.token,
                        from: s.spawn_at,
                        to: s.cell.position(),
                        duration,
                        easing: Easing::Bounce,
                    });
                }
            }
            Err(err) => error!(%err, "refill failed, leaving cells vacant"),
        }

        self.phase = GamePhase::Cascading;
        self.await_batch(batch, PendingKind::Cascade);
    }

    fn settle(&mut self) {
        self.multiplier += 1;
        let scan = MatchDetector::scan_board(&self.grid);
        if scan.is_empty() {
            self.finish_resolution();
        } else {
            self.remove_matches(&scan);
        }
    }

    fn finish_resolution(&mut self) {
        debug!(multiplier = self.multiplier, "resolution finished");
        self.events.push(BoardEvent::MoveConsumed);
        self.phase = GamePhase::Ready;

        if self.config.reshuffle_when_stuck && !self.has_legal_move() {
            warn!(board = %self.grid, "no legal moves left, reshuffling");
            self.clear_grid();
            self.populate();
            self.events.push(BoardEvent::Reshuffled);
        }
    }

    // === Population ===

    fn restart_now(&mut self) {
        info!(seed = self.rng.seed(), "restarting board");
        self.swaps.finish();
        self.pending = None;
        self.clear_grid();
        self.phase = GamePhase::Empty;
        self.paused = false;
        self.multiplier = 1;
        self.round_rng = self.rng.fork();

        self.populate();
        self.phase = GamePhase::Ready;
        self.events.push(BoardEvent::GameStarted);
    }

    fn clear_grid(&mut self) {
        for token in self.grid.clear() {
            self.events.push(BoardEvent::Destroy { token: token.id });
        }
    }

    /// Fill every vacant cell without creating runs.
    ///
    /// An attempt fails if a cell has no safe type, or (with reshuffling on)
    /// if the result has no legal swap. After the last attempt the board
    /// keeps what it has, leaving exhausted cells vacant.
    fn populate(&mut self) {
        let attempts = self.config.max_fill_attempts.max(1);
        let mut candidate = self.grid.clone();

        for attempt in 1..=attempts {
            if attempt > 1 {
                candidate = self.grid.clone();
            }
            let exhausted = match self.fill.fill_vacant(&mut candidate, &mut self.round_rng) {
                Ok(exhausted) => exhausted,
                Err(err) => {
                    error!(%err, "board population failed");
                    return;
                }
            };

            if !exhausted.is_empty() {
                warn!(attempt, cells = exhausted.len(), "fill policy ran out of safe types");
                continue;
            }
            if self.config.reshuffle_when_stuck
                && SwapEngine::find_legal_swap(&mut candidate.clone()).is_none()
            {
                debug!(attempt, "populated board has no legal move, retrying");
                continue;
            }
            break;
        }

        self.grid = candidate;
        let spawns: Vec<BoardEvent> = self
            .grid
            .tokens()
            .map(|token| BoardEvent::Spawn {
                token: token.id,
                kind: token.kind,
                position: token.cell.position(),
            })
            .collect();
        self.events.extend(spawns);
        debug!(board = %self.grid, "board populated");
    }

    // === Helpers ===

    fn highlight(&mut self, cell: Cell, on: bool) {
        if let Some(token) = self.token_at(cell) {
            self.events.push(BoardEvent::Highlight { token, on });
        }
    }

    fn token_at(&self, cell: Cell) -> Option<TokenId> {
        if !self.grid.in_bounds(cell) {
            return None;
        }
        self.grid.get(cell).map(|token| token.id)
    }

    fn next_batch_id(&mut self) -> BatchId {
        let id = BatchId(self.next_batch);
        self.next_batch += 1;
        id
    }

    fn await_batch(&mut self, batch: BatchId, kind: PendingKind) {
        self.events.push(BoardEvent::AwaitBatch(batch));
        self.pending = Some(Pending { batch, kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Axis, ScoreEvent, SmashTier};
    use crate::core::{RefillPolicy, TokenType};

    fn instant_config() -> BoardConfig {
        BoardConfig::new().with_cascade_delay(Duration::ZERO)
    }

    /// 5x5 board with no runs where swapping (0,2) and (1,2) completes a Blue
    /// run along row 0.
    fn primed_board(config: BoardConfig) -> Board {
        let grid = Grid::from_layout(&[
            "GRYOP",
            "YOPGR",
            "OPGRY",
            "RGBYO",
            "BBROG",
        ]);
        Board::from_grid(config, grid, 7).unwrap()
    }

    fn settle(board: &mut Board) {
        while let Some(batch) = board.pending_batch() {
            board.on_animation_batch_complete(batch);
        }
    }

    #[test]
    fn test_new_board_is_ready() {
        let mut board = Board::new(BoardConfig::default(), 42).unwrap();
        assert_eq!(board.phase(), GamePhase::Ready);
        assert_eq!(board.grid().token_count(), 25);
        assert!(MatchDetector::scan_board(board.grid()).is_empty());
        assert!(board.has_legal_move());

        let events = board.drain_events();
        let spawns = events.iter().filter(|e| matches!(e, BoardEvent::Spawn { .. })).count();
        assert_eq!(spawns, 25);
        assert_eq!(events.last(), Some(&BoardEvent::GameStarted));
        assert!(board.events().is_empty());
    }

    #[test]
    fn test_new_board_rejects_empty_types() {
        let config = BoardConfig::new().with_token_types(Vec::<TokenType>::new());
        assert_eq!(Board::new(config, 1).err(), Some(ConfigError::NoTokenTypes));
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = Board::new(BoardConfig::default(), 99).unwrap();
        let b = Board::new(BoardConfig::default(), 99).unwrap();
        assert_eq!(a.grid().kinds(), b.grid().kinds());
    }

    #[test]
    fn test_select_highlights() {
        let mut board = primed_board(instant_config());
        let token = board.grid().get(Cell::new(2, 2)).unwrap().id;

        board.on_cell_selected(Cell::new(2, 2));

        assert_eq!(board.swap_state(), SwapState::OneSelected(Cell::new(2, 2)));
        assert_eq!(
            board.drain_events(),
            vec![
                BoardEvent::Highlight { token, on: true },
                BoardEvent::Sound(SoundRequest::plain(Sound::Select)),
            ]
        );
    }

    #[test]
    fn test_reselect_moves_highlight() {
        let mut board = primed_board(instant_config());
        let first = board.grid().get(Cell::new(0, 0)).unwrap().id;
        let second = board.grid().get(Cell::new(3, 3)).unwrap().id;

        board.on_cell_selected(Cell::new(0, 0));
        board.drain_events();
        board.on_cell_selected(Cell::new(3, 3));

        let events = board.drain_events();
        assert_eq!(events[0], BoardEvent::Highlight { token: first, on: false });
        assert_eq!(events[1], BoardEvent::Highlight { token: second, on: true });
        assert_eq!(board.swap_state(), SwapState::OneSelected(Cell::new(3, 3)));
    }

    #[test]
    fn test_invalid_selection_ignored() {
        let mut board = primed_board(instant_config());
        board.on_cell_selected(Cell::new(5, 0));
        board.on_cell_selected(Cell::new(0, 9));
        assert_eq!(board.swap_state(), SwapState::Idle);
        assert!(board.events().is_empty());
    }

    #[test]
    fn test_paused_blocks_selection() {
        let mut board = primed_board(instant_config());
        board.pause_board(true);
        board.on_cell_selected(Cell::new(1, 1));
        assert_eq!(board.swap_state(), SwapState::Idle);

        board.pause_board(false);
        board.on_cell_selected(Cell::new(1, 1));
        assert_eq!(board.swap_state(), SwapState::OneSelected(Cell::new(1, 1)));
    }

    #[test]
    fn test_swap_requests_moves() {
        let mut board = primed_board(instant_config());
        let a = board.grid().get(Cell::new(4, 0)).unwrap().id;
        let b = board.grid().get(Cell::new(4, 1)).unwrap().id;

        board.on_cell_selected(Cell::new(4, 0));
        board.drain_events();
        board.on_cell_selected(Cell::new(4, 1));

        assert_eq!(board.phase(), GamePhase::Swapping);
        let batch = board.pending_batch().unwrap();
        let events = board.drain_events();
        assert!(events.contains(&BoardEvent::Highlight { token: a, on: false }));
        assert!(events.contains(&BoardEvent::Move {
            batch,
            token: a,
            from: Cell::new(4, 0).position(),
            to: Cell::new(4, 1).position(),
            duration: Duration::from_millis(300),
            easing: Easing::Linear,
        }));
        assert!(events.iter().any(|e| matches!(e, BoardEvent::Move { token, .. } if *token == b)));
        assert_eq!(events.last(), Some(&BoardEvent::AwaitBatch(batch)));

        // Grid is untouched until the animation completes
        assert_eq!(board.grid().get(Cell::new(4, 0)).unwrap().id, a);
    }

    #[test]
    fn test_matchless_swap_rolls_back() {
        let mut board = primed_board(instant_config());
        let before = board.grid().kinds();

        board.on_cell_selected(Cell::new(4, 0));
        board.on_cell_selected(Cell::new(4, 1));
        let swap = board.pending_batch().unwrap();
        board.on_animation_batch_complete(swap);

        assert_eq!(board.phase(), GamePhase::SwappingBack);
        let back = board.pending_batch().unwrap();
        assert_ne!(swap, back);

        // Selections are ignored mid swap-back
        board.on_cell_selected(Cell::new(2, 2));

        board.on_animation_batch_complete(back);
        assert_eq!(board.phase(), GamePhase::Ready);
        assert_eq!(board.swap_state(), SwapState::Idle);
        assert_eq!(board.grid().kinds(), before);
        assert!(!board.drain_events().contains(&BoardEvent::MoveConsumed));
    }

    #[test]
    fn test_stale_batch_ignored() {
        let mut board = primed_board(instant_config());
        board.on_cell_selected(Cell::new(4, 0));
        board.on_cell_selected(Cell::new(4, 1));
        let batch = board.pending_batch().unwrap();

        board.on_animation_batch_complete(BatchId(batch.0 + 100));
        assert_eq!(board.phase(), GamePhase::Swapping);
        assert_eq!(board.pending_batch(), Some(batch));
    }

    #[test]
    fn test_matching_swap_resolves() {
        let mut board = primed_board(instant_config().with_reshuffle_when_stuck(false));
        board.on_cell_selected(Cell::new(0, 2));
        board.on_cell_selected(Cell::new(1, 2));
        let swap = board.pending_batch().unwrap();
        board.drain_events();

        board.on_animation_batch_complete(swap);
        // Zero delay: removal and cascade happen immediately
        assert_eq!(board.phase(), GamePhase::Cascading);
        assert_eq!(board.swap_state(), SwapState::Idle);

        let events = board.drain_events();
        let first_score = events.iter().find_map(|e| match e {
            BoardEvent::Score(score) => Some(*score),
            _ => None,
        });
        let score = first_score.unwrap();
        assert_eq!(score.length, 3);
        assert_eq!(score.multiplier, 1);
        assert_eq!(score.kind, TokenType::Blue);
        assert_eq!((score.line, score.start), (0, 0));

        let explosions = events.iter().filter(|e| matches!(e, BoardEvent::Explosion { .. })).count();
        assert_eq!(explosions, 3);
        assert!(events.contains(&BoardEvent::Sound(SoundRequest::smash(SmashTier::Common, 1))));

        settle(&mut board);
        assert_eq!(board.phase(), GamePhase::Ready);
        assert_eq!(board.grid().token_count(), 25);
        assert!(MatchDetector::scan_board(board.grid()).is_empty());
        let consumed = board.drain_events().iter().filter(|e| **e == BoardEvent::MoveConsumed).count();
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_cascade_waits_for_delay() {
        let config = BoardConfig::new().with_cascade_delay(Duration::from_millis(200));
        let mut board = primed_board(config);
        board.on_cell_selected(Cell::new(0, 2));
        board.on_cell_selected(Cell::new(1, 2));
        let swap = board.pending_batch().unwrap();
        board.on_animation_batch_complete(swap);

        assert_eq!(board.phase(), GamePhase::Deleting);
        assert_eq!(board.pending_batch(), None);
        assert_eq!(board.grid().token_count(), 22);

        board.advance(Duration::from_millis(150));
        assert_eq!(board.phase(), GamePhase::Deleting);

        board.advance(Duration::from_millis(50));
        assert_eq!(board.phase(), GamePhase::Cascading);
        assert_eq!(board.grid().token_count(), 25);
    }

    #[test]
    fn test_advance_ignored_outside_deleting() {
        let mut board = primed_board(instant_config());
        board.advance(Duration::from_secs(10));
        assert_eq!(board.phase(), GamePhase::Ready);
        assert!(board.events().is_empty());
    }

    #[test]
    fn test_restart_with_effects_fades_first() {
        let mut board = Board::new(instant_config(), 5).unwrap();
        let old: Vec<TokenId> = board.grid().tokens().map(|t| t.id).collect();
        board.drain_events();

        board.restart_board(true);
        assert!(board.is_paused());
        let batch = board.pending_batch().unwrap();
        let events = board.drain_events();
        let fades = events.iter().filter(|e| matches!(e, BoardEvent::Fade { alpha, .. } if *alpha == 0.0)).count();
        assert_eq!(fades, 25);

        board.on_animation_batch_complete(batch);
        assert!(!board.is_paused());
        assert_eq!(board.phase(), GamePhase::Ready);

        let events = board.drain_events();
        for id in &old {
            assert!(events.contains(&BoardEvent::Destroy { token: *id }));
        }
        assert!(board.grid().tokens().all(|t| !old.contains(&t.id)));
        assert_eq!(events.last(), Some(&BoardEvent::GameStarted));
    }

    #[test]
    fn test_restarted_rounds_differ() {
        let mut board = Board::new(instant_config(), 5).unwrap();
        let first = board.grid().kinds();
        board.restart_board(false);
        assert_ne!(board.grid().kinds(), first);
    }

    #[test]
    fn test_request_restart_only_when_idle() {
        let mut board = primed_board(instant_config());
        board.pause_board(true);
        assert!(!board.request_restart());

        board.pause_board(false);
        board.on_cell_selected(Cell::new(4, 0));
        board.on_cell_selected(Cell::new(4, 1));
        assert!(!board.request_restart());

        settle(&mut board);
        assert!(board.request_restart());
        assert!(board.is_paused());
    }

    #[test]
    fn test_stuck_board_detection() {
        let grid = Grid::from_layout(&[
            "RGB",
            "BRG",
            "GBR",
        ]);
        let config = BoardConfig::new().with_board_size(3);
        let board = Board::from_grid(config, grid, 1).unwrap();
        assert!(!board.has_legal_move());
    }

    #[test]
    fn test_restart_during_cascade_delay() {
        let config = BoardConfig::new().with_cascade_delay(Duration::from_millis(200));
        let mut board = primed_board(config);
        board.on_cell_selected(Cell::new(0, 2));
        board.on_cell_selected(Cell::new(1, 2));
        let swap = board.pending_batch().unwrap();
        board.on_animation_batch_complete(swap);
        assert_eq!(board.phase(), GamePhase::Deleting);
        board.drain_events();

        board.restart_board(true);
        let fade = board.pending_batch().unwrap();
        assert_eq!(board.phase(), GamePhase::Clearing);

        // The abandoned cascade must not take over the pending batch
        board.advance(Duration::from_millis(200));
        assert_eq!(board.pending_batch(), Some(fade));
        assert_eq!(board.phase(), GamePhase::Clearing);

        board.on_animation_batch_complete(fade);
        assert_eq!(board.phase(), GamePhase::Ready);
        assert!(!board.is_paused());
        assert_eq!(board.grid().token_count(), 25);
        assert!(MatchDetector::scan_board(board.grid()).is_empty());
        assert_eq!(board.drain_events().last(), Some(&BoardEvent::GameStarted));
    }

    #[test]
    fn test_selection_blocked_while_clearing() {
        let mut board = primed_board(instant_config());
        board.on_cell_selected(Cell::new(4, 0));
        board.restart_board(true);
        let fade = board.pending_batch().unwrap();
        assert_eq!(board.swap_state(), SwapState::Idle);

        board.pause_board(false);
        board.on_cell_selected(Cell::new(4, 0));
        board.on_cell_selected(Cell::new(4, 1));
        assert_eq!(board.swap_state(), SwapState::Idle);
        assert_eq!(board.pending_batch(), Some(fade));
        assert!(!board.request_restart());

        board.on_animation_batch_complete(fade);
        assert_eq!(board.phase(), GamePhase::Ready);
    }

    #[test]
    fn test_combo_scores_at_rising_multiplier() {
        // Swapping (0,2) and (1,2) completes Blue along row 0. Once it is
        // cleared, the Reds at (2,1) and (2,2) drop next to the Red at (1,3).
        let grid = Grid::from_layout(&[
            "POGP",
            "ORRY",
            "GPBR",
            "BBYG",
        ]);
        let config = BoardConfig::new()
            .with_board_size(4)
            .with_cascade_delay(Duration::ZERO)
            .with_refill(RefillPolicy::Constrained)
            .with_reshuffle_when_stuck(false);
        let mut board = Board::from_grid(config, grid, 21).unwrap();

        board.on_cell_selected(Cell::new(0, 2));
        board.on_cell_selected(Cell::new(1, 2));
        let swap = board.pending_batch().unwrap();
        board.on_animation_batch_complete(swap);

        let first = board.drain_events();
        let scores: Vec<ScoreEvent> = first
            .iter()
            .filter_map(|e| match e {
                BoardEvent::Score(score) => Some(*score),
                _ => None,
            })
            .collect();
        assert_eq!(scores.len(), 1);
        assert_eq!((scores[0].kind, scores[0].multiplier, scores[0].line), (TokenType::Blue, 1, 0));
        assert!(first.contains(&BoardEvent::Sound(SoundRequest::smash(SmashTier::Common, 1))));

        let cascade = board.pending_batch().unwrap();
        board.on_animation_batch_complete(cascade);
        assert_eq!(board.multiplier(), 2);

        let second = board.drain_events();
        let combo = second.iter().find_map(|e| match e {
            BoardEvent::Score(score) => Some(*score),
            _ => None,
        });
        assert_eq!(
            combo,
            Some(ScoreEvent {
                length: 3,
                multiplier: 2,
                kind: TokenType::Red,
                axis: Axis::Horizontal,
                line: 1,
                start: 1,
            })
        );
        let smash = second.iter().find_map(|e| match e {
            BoardEvent::Sound(request) => Some(*request),
            _ => None,
        });
        let smash = smash.unwrap();
        assert_eq!(smash.clip, Sound::SmashCommon);
        assert_eq!(smash.pitch, 1.5);
        assert_eq!(smash.volume, 0.7);

        settle(&mut board);
        assert_eq!(board.phase(), GamePhase::Ready);
        assert!(MatchDetector::scan_board(board.grid()).is_empty());
    }

    #[test]
    fn test_stuck_board_reshuffles() {
        // Swapping (1,0) and (1,1) lines up Green in column 0. The rest of
        // the board is a Latin square of kinds the refill never produces, so
        // whatever Blue/Red mix refills the column leaves no legal swap.
        let grid = Grid::from_layout(&[
            "GOPY",
            "GGOP",
            "YGGO",
            "OPYG",
        ]);
        let config = BoardConfig::new()
            .with_board_size(4)
            .with_token_types([TokenType::Blue, TokenType::Red])
            .with_cascade_delay(Duration::ZERO);
        let mut board = Board::from_grid(config, grid, 4).unwrap();

        board.on_cell_selected(Cell::new(1, 0));
        board.on_cell_selected(Cell::new(1, 1));
        settle(&mut board);

        let events = board.drain_events();
        let consumed = events.iter().position(|e| *e == BoardEvent::MoveConsumed).unwrap();
        let reshuffled = events.iter().position(|e| *e == BoardEvent::Reshuffled).unwrap();
        assert!(consumed < reshuffled);

        assert_eq!(board.phase(), GamePhase::Ready);
        assert!(board.has_legal_move());
        assert!(MatchDetector::scan_board(board.grid()).is_empty());
        assert!(board
            .grid()
            .tokens()
            .all(|t| matches!(t.kind, TokenType::Blue | TokenType::Red)));
    }

    #[test]
    fn test_no_reshuffle_when_disabled() {
        let grid = Grid::from_layout(&[
            "GOPY",
            "GGOP",
            "YGGO",
            "OPYG",
        ]);
        let config = BoardConfig::new()
            .with_board_size(4)
            .with_token_types([TokenType::Blue, TokenType::Red])
            .with_cascade_delay(Duration::ZERO)
            .with_reshuffle_when_stuck(false);
        let mut board = Board::from_grid(config, grid, 4).unwrap();

        board.on_cell_selected(Cell::new(1, 0));
        board.on_cell_selected(Cell::new(1, 1));
        settle(&mut board);

        assert!(!board.drain_events().contains(&BoardEvent::Reshuffled));
        assert!(!board.has_legal_move());
    }
}
