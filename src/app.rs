//! Front-end session: the game plus cursor, hint display and cached snapshot.
//!
//! Everything here is terminal-free so it can be driven from tests.

use crate::core::{GameSnapshot, GameState};
use crate::input::BoardCursor;
use crate::term::Highlights;
use crate::types::{GameAction, TapOutcome, TileId, HINT_DISPLAY_MS};

pub struct App {
    game: GameState,
    cursor: BoardCursor,
    hint: Option<(TileId, TileId)>,
    hint_left_ms: u32,
    snapshot: GameSnapshot,
    was_stuck: bool,
}

impl App {
    pub fn new(seed: u32) -> Self {
        Self::from_game(GameState::new(seed))
    }

    pub fn from_game(game: GameState) -> Self {
        let mut app = Self {
            game,
            cursor: BoardCursor::new(),
            hint: None,
            hint_left_ms: 0,
            snapshot: GameSnapshot::default(),
            was_stuck: false,
        };
        app.refresh();
        app
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Mutable access for external controllers. Call [`App::refresh`] afterwards.
    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    pub fn cursor(&self) -> Option<TileId> {
        self.cursor.current()
    }

    pub fn hint(&self) -> Option<(TileId, TileId)> {
        self.hint
    }

    pub fn highlights(&self) -> Highlights {
        Highlights {
            cursor: self.cursor.current(),
            hint: self.hint,
        }
    }

    /// Rebuild the snapshot and drop highlights the board no longer supports.
    pub fn refresh(&mut self) {
        self.game.snapshot_into(&mut self.snapshot);
        self.cursor.sync(&self.snapshot.tiles);
        if let Some((a, b)) = self.hint {
            if !self.game.is_free(a) || !self.game.is_free(b) {
                self.clear_hint();
            }
        }
        if self.snapshot.stuck && !self.was_stuck {
            log::info!(
                "no moves left with {} tiles remaining",
                self.snapshot.remaining
            );
        }
        self.was_stuck = self.snapshot.stuck;
    }

    fn clear_hint(&mut self) {
        self.hint = None;
        self.hint_left_ms = 0;
    }

    /// Apply a key action. Returns true when the game itself changed.
    pub fn handle_action(&mut self, action: GameAction) -> bool {
        if self.cursor.apply(action, &self.snapshot.tiles) {
            return false;
        }
        let changed = match action {
            GameAction::Tap => match self.cursor.current() {
                Some(id) => self.tap(id).is_some(),
                None => false,
            },
            GameAction::Hint => {
                match self.game.find_hint() {
                    Some(pair) => {
                        self.hint = Some(pair);
                        self.hint_left_ms = HINT_DISPLAY_MS;
                        self.cursor.set(Some(pair.0));
                    }
                    None => self.clear_hint(),
                }
                false
            }
            GameAction::Shuffle => {
                self.game.shuffle_remaining();
                self.clear_hint();
                true
            }
            GameAction::NewGame => {
                self.game.new_game();
                self.clear_hint();
                self.cursor.set(None);
                true
            }
            GameAction::Pause => {
                self.game.toggle_pause();
                true
            }
            GameAction::CursorLeft
            | GameAction::CursorRight
            | GameAction::CursorUp
            | GameAction::CursorDown => false,
        };
        self.refresh();
        changed
    }

    /// Tap a tile directly (mouse click). The cursor follows the click.
    pub fn click(&mut self, id: TileId) -> Option<TapOutcome> {
        self.cursor.set(Some(id));
        let outcome = self.tap(id);
        self.refresh();
        outcome
    }

    fn tap(&mut self, id: TileId) -> Option<TapOutcome> {
        let outcome = self.game.tap(id);
        if let Some(TapOutcome::Match(..) | TapOutcome::Win(..)) = outcome {
            self.clear_hint();
        }
        outcome
    }

    /// Advance timers by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.game.tick(elapsed_ms);
        if self.hint.is_some() {
            self.hint_left_ms = self.hint_left_ms.saturating_sub(elapsed_ms);
            if self.hint_left_ms == 0 {
                self.clear_hint();
            }
        }
        self.snapshot.elapsed_secs = self.game.elapsed_secs();
    }
}
