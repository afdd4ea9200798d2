//! Game state module - the match state machine
//!
//! This module ties together the board, RNG, hint search and solvability
//! guard. Tile taps drive a two-state machine (nothing selected / one tile
//! selected); every tap yields a [`TapOutcome`] or `None`, never an error.

use crate::board::Board;
use crate::hint::{count_available_pairs, find_hint, has_valid_moves};
use crate::rng::SimpleRng;
use crate::shuffle::{ensure_playable, shuffle_remaining};
use crate::snapshot::{GameSnapshot, TileSnapshot};
use crate::tile::Tile;
use crate::types::{TapOutcome, TileId, SHUFFLE_RETRY_LIMIT};

/// Requests a front end or controller can make of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Tap(TileId),
    Hint,
    Shuffle,
    NewGame,
    Pause,
}

/// What a [`Command`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    Tap(Option<TapOutcome>),
    Hint(Option<(TileId, TileId)>),
    Shuffled { remaining: usize },
    NewGame { episode_id: u32, seed: u32 },
    Paused(bool),
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    selected: Option<TileId>,
    /// Successful pair removals.
    moves: u32,
    game_over: bool,
    paused: bool,
    rng: SimpleRng,
    seed: u32,
    /// Monotonic episode id (increments on new game).
    episode_id: u32,
    elapsed_ms: u64,
    hints_used: u32,
    shuffles_used: u32,
    /// Reshuffles the solvability guard needed when dealing.
    start_reshuffles: u32,
    last_outcome: Option<TapOutcome>,
}

impl GameState {
    /// Deal a new game from `seed`
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let mut board = Board::deal(&mut rng);
        let start_reshuffles = ensure_playable(&mut board, &mut rng, SHUFFLE_RETRY_LIMIT);
        log::info!(
            "dealt game seed={} reshuffles={} free_pairs={}",
            seed,
            start_reshuffles,
            count_available_pairs(&board)
        );
        let mut state = Self::from_board(board, seed);
        state.rng = rng;
        state.start_reshuffles = start_reshuffles;
        state
    }

    /// Wrap an existing board without dealing or reshuffling.
    pub fn from_board(board: Board, seed: u32) -> Self {
        Self {
            board,
            selected: None,
            moves: 0,
            game_over: false,
            paused: false,
            rng: SimpleRng::new(seed),
            seed,
            episode_id: 0,
            elapsed_ms: 0,
            hints_used: 0,
            shuffles_used: 0,
            start_reshuffles: 0,
            last_outcome: None,
        }
    }

    /// Replace this game with a fresh deal seeded from the current RNG stream.
    pub fn new_game(&mut self) {
        let seed = self.rng.next_u32();
        let next_episode = self.episode_id.wrapping_add(1);
        *self = Self::new(seed);
        self.episode_id = next_episode;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selected(&self) -> Option<TileId> {
        self.selected
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn shuffles_used(&self) -> u32 {
        self.shuffles_used
    }

    pub fn start_reshuffles(&self) -> u32 {
        self.start_reshuffles
    }

    pub fn last_outcome(&self) -> Option<TapOutcome> {
        self.last_outcome
    }

    /// Alive tiles in board order.
    pub fn remaining(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.board.alive()
    }

    pub fn remaining_count(&self) -> usize {
        self.board.alive_count()
    }

    pub fn is_free(&self, id: TileId) -> bool {
        self.board.is_free(id)
    }

    /// Tiles remain but no legal pair is available.
    ///
    /// The core never ends the game on this; the caller offers a shuffle or a
    /// new deal.
    pub fn is_stuck(&self) -> bool {
        !self.game_over && self.board.alive_count() > 0 && !has_valid_moves(&self.board)
    }

    pub fn has_valid_moves(&self) -> bool {
        has_valid_moves(&self.board)
    }

    /// Handle a tap on tile `id`.
    ///
    /// Blocked, removed and unknown tiles are ignored, as are all taps while
    /// paused or after the game is won.
    pub fn tap(&mut self, id: TileId) -> Option<TapOutcome> {
        if self.game_over || self.paused || !self.board.is_free(id) {
            return None;
        }

        let outcome = match self.selected {
            None => {
                self.selected = Some(id);
                TapOutcome::Select(id)
            }
            Some(prev) if prev == id => {
                self.selected = None;
                TapOutcome::Deselect(id)
            }
            Some(prev) => {
                if self.board.is_free(prev) && self.board.remove_pair(prev, id) {
                    self.selected = None;
                    self.moves += 1;
                    if self.board.alive_count() == 0 {
                        self.game_over = true;
                        log::info!(
                            "game won seed={} moves={} elapsed={}s",
                            self.seed,
                            self.moves,
                            self.elapsed_secs()
                        );
                        TapOutcome::Win(prev, id)
                    } else {
                        TapOutcome::Match(prev, id)
                    }
                } else {
                    self.selected = Some(id);
                    TapOutcome::Switch { prev, tile: id }
                }
            }
        };

        log::trace!("tap {} -> {:?}", id, outcome);
        self.last_outcome = Some(outcome);
        Some(outcome)
    }

    /// First legal pair in board order. Counts as a used hint when found.
    pub fn find_hint(&mut self) -> Option<(TileId, TileId)> {
        let hint = find_hint(&self.board);
        if hint.is_some() {
            self.hints_used += 1;
        }
        hint
    }

    /// Permute faces among the remaining tiles and clear the selection.
    ///
    /// Positions stay put. No-op once nothing remains.
    pub fn shuffle_remaining(&mut self) {
        if self.board.alive_count() == 0 {
            return;
        }
        shuffle_remaining(&mut self.board, &mut self.rng);
        self.selected = None;
        self.shuffles_used += 1;
        log::debug!(
            "shuffled {} tiles, free_pairs={}",
            self.board.alive_count(),
            count_available_pairs(&self.board)
        );
    }

    pub fn toggle_pause(&mut self) -> bool {
        if !self.game_over {
            self.paused = !self.paused;
        }
        self.paused
    }

    /// Advance the play timer. Stops while paused and after a win.
    pub fn tick(&mut self, elapsed_ms: u32) {
        if self.paused || self.game_over {
            return;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms as u64);
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms / 1000
    }

    /// Apply a command and report what happened.
    pub fn execute(&mut self, command: Command) -> CommandResult {
        match command {
            Command::Tap(id) => CommandResult::Tap(self.tap(id)),
            Command::Hint => CommandResult::Hint(self.find_hint()),
            Command::Shuffle => {
                self.shuffle_remaining();
                CommandResult::Shuffled {
                    remaining: self.remaining_count(),
                }
            }
            Command::NewGame => {
                self.new_game();
                CommandResult::NewGame {
                    episode_id: self.episode_id,
                    seed: self.seed,
                }
            }
            Command::Pause => CommandResult::Paused(self.toggle_pause()),
        }
    }

    /// Write a read-only view of the game into `out`, reusing its buffers.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.tiles.clear();
        let free = self.board.free_ids();
        for tile in self.board.alive() {
            out.tiles.push(TileSnapshot {
                id: tile.id(),
                face: tile.face(),
                pos: tile.pos(),
                free: free.contains(&tile.id()),
            });
        }
        out.selected = self.selected;
        out.moves = self.moves;
        out.remaining = self.board.alive_count();
        out.available_pairs = count_available_pairs(&self.board);
        out.game_over = self.game_over;
        out.stuck = !self.game_over && out.remaining > 0 && out.available_pairs == 0;
        out.paused = self.paused;
        out.elapsed_secs = self.elapsed_secs();
        out.episode_id = self.episode_id;
        out.seed = self.seed;
        out.hints_used = self.hints_used;
        out.shuffles_used = self.shuffles_used;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::{at, face};
    use crate::types::{Suit, DECK_SIZE};

    /// Two open matching tiles on top of a small pyramid, plus a covered tile.
    fn small_game() -> GameState {
        let board = Board::from_slots([
            (face(Suit::Bamboo, 4), at(0, 0, 0)),  // 0 covered by 3
            (face(Suit::Dragon, 0), at(4, 0, 0)),  // 1 covered by 4
            (face(Suit::Wind, 2), at(10, 0, 0)),   // 2 free, no partner alive
            (face(Suit::Chars, 7), at(0, 0, 1)),   // 3 top, free
            (face(Suit::Chars, 7), at(4, 0, 1)),   // 4 top, free
            (face(Suit::Season, 1), at(20, 0, 0)), // 5 free
        ]);
        GameState::from_board(board, 1)
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);
        assert_eq!(state.remaining_count(), DECK_SIZE);
        assert_eq!(state.moves(), 0);
        assert!(!state.game_over());
        assert!(!state.paused());
        assert_eq!(state.selected(), None);
        assert_eq!(state.episode_id(), 0);
        assert!(state.start_reshuffles() <= SHUFFLE_RETRY_LIMIT);
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = GameState::new(777);
        let b = GameState::new(777);
        assert_eq!(a.board(), b.board());
        assert_ne!(a.board(), GameState::new(778).board());
    }

    #[test]
    fn test_new_game_increments_episode() {
        let mut state = GameState::new(5);
        let first = state.board().clone();
        state.new_game();
        assert_eq!(state.episode_id(), 1);
        assert_ne!(state.board(), &first);
        state.new_game();
        assert_eq!(state.episode_id(), 2);
    }

    #[test]
    fn test_select_and_deselect() {
        let mut state = small_game();
        assert_eq!(state.tap(3), Some(TapOutcome::Select(3)));
        assert_eq!(state.selected(), Some(3));
        assert_eq!(state.tap(3), Some(TapOutcome::Deselect(3)));
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn test_tap_blocked_is_noop() {
        let mut state = small_game();
        assert_eq!(state.tap(0), None);
        assert_eq!(state.selected(), None);

        state.tap(3);
        assert_eq!(state.tap(1), None);
        assert_eq!(state.selected(), Some(3));
        assert_eq!(state.tap(99), None);
        assert_eq!(state.selected(), Some(3));
    }

    #[test]
    fn test_switch_on_mismatch() {
        let mut state = small_game();
        state.tap(3);
        assert_eq!(
            state.tap(2),
            Some(TapOutcome::Switch { prev: 3, tile: 2 })
        );
        assert_eq!(state.selected(), Some(2));
        assert_eq!(state.moves(), 0);
    }

    #[test]
    fn test_match_removes_pair() {
        let mut state = small_game();
        state.tap(3);
        assert_eq!(state.tap(4), Some(TapOutcome::Match(3, 4)));
        assert!(state.board().get(3).unwrap().removed());
        assert!(state.board().get(4).unwrap().removed());
        assert_eq!(state.remaining_count(), 4);
        assert_eq!(state.moves(), 1);
        assert_eq!(state.selected(), None);
        // Uncovered tiles became free.
        assert!(state.is_free(0));
        assert!(state.is_free(1));
        // Removed tiles cannot be tapped.
        assert_eq!(state.tap(3), None);
    }

    #[test]
    fn test_win_on_last_pair() {
        let board = Board::from_slots([
            (face(Suit::Flower, 0), at(0, 0, 0)),
            (face(Suit::Flower, 3), at(6, 0, 0)),
        ]);
        let mut state = GameState::from_board(board, 1);
        state.tick(1500);
        state.tap(0);
        assert_eq!(state.tap(1), Some(TapOutcome::Win(0, 1)));
        assert!(state.game_over());
        assert_eq!(state.remaining_count(), 0);
        assert_eq!(state.last_outcome(), Some(TapOutcome::Win(0, 1)));

        // Timer and taps stop after the win.
        state.tick(5000);
        assert_eq!(state.elapsed_secs(), 1);
        assert_eq!(state.tap(0), None);
    }

    #[test]
    fn test_stuck_does_not_end_game() {
        let board = Board::from_slots([
            (face(Suit::Bamboo, 0), at(0, 0, 0)),
            (face(Suit::Bamboo, 1), at(4, 0, 0)),
        ]);
        let mut state = GameState::from_board(board, 1);
        assert!(state.is_stuck());
        assert_eq!(state.find_hint(), None);
        assert_eq!(state.hints_used(), 0);
        assert!(!state.game_over());
    }

    #[test]
    fn test_hint_counts_usage() {
        let mut state = small_game();
        assert_eq!(state.find_hint(), Some((3, 4)));
        assert_eq!(state.hints_used(), 1);
    }

    #[test]
    fn test_shuffle_clears_selection() {
        let mut state = GameState::new(31);
        let free = state.board().free_ids();
        state.tap(free[0]);
        assert!(state.selected().is_some());
        state.shuffle_remaining();
        assert_eq!(state.selected(), None);
        assert_eq!(state.shuffles_used(), 1);
        assert_eq!(state.remaining_count(), DECK_SIZE);
    }

    #[test]
    fn test_pause_blocks_taps_and_timer() {
        let mut state = small_game();
        state.tick(2000);
        assert!(state.toggle_pause());
        assert_eq!(state.tap(3), None);
        state.tick(10_000);
        assert_eq!(state.elapsed_secs(), 2);
        assert!(!state.toggle_pause());
        assert_eq!(state.tap(3), Some(TapOutcome::Select(3)));
    }

    #[test]
    fn test_execute_dispatch() {
        let mut state = small_game();
        assert_eq!(
            state.execute(Command::Tap(3)),
            CommandResult::Tap(Some(TapOutcome::Select(3)))
        );
        assert_eq!(state.execute(Command::Hint), CommandResult::Hint(Some((3, 4))));
        assert_eq!(state.execute(Command::Pause), CommandResult::Paused(true));
        assert_eq!(state.execute(Command::Pause), CommandResult::Paused(false));
        assert_eq!(
            state.execute(Command::Shuffle),
            CommandResult::Shuffled { remaining: 6 }
        );
        match state.execute(Command::NewGame) {
            CommandResult::NewGame { episode_id, .. } => assert_eq!(episode_id, 1),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(state.remaining_count(), DECK_SIZE);
    }

    #[test]
    fn test_snapshot_reports_free_tiles() {
        let mut state = small_game();
        state.tap(3);
        let snap = state.snapshot();
        assert_eq!(snap.tiles.len(), 6);
        assert_eq!(snap.selected, Some(3));
        assert_eq!(snap.remaining, 6);
        assert_eq!(snap.available_pairs, 1);
        assert!(!snap.stuck);
        let free: Vec<TileId> = snap.tiles.iter().filter(|t| t.free).map(|t| t.id).collect();
        assert_eq!(free, vec![2, 3, 4, 5]);
    }
}
