//! Board cursor for keyboard play.
//!
//! The cursor rests on a *visible* tile (one that no higher alive tile
//! overlaps) and moves to the nearest visible tile in the pressed direction.

use arrayvec::ArrayVec;

use crate::core::TileSnapshot;
use crate::types::{GameAction, Position, TileId, DECK_SIZE};

/// Cursor movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn from_action(action: GameAction) -> Option<Self> {
        match action {
            GameAction::CursorLeft => Some(Direction::Left),
            GameAction::CursorRight => Some(Direction::Right),
            GameAction::CursorUp => Some(Direction::Up),
            GameAction::CursorDown => Some(Direction::Down),
            _ => None,
        }
    }
}

type VisibleList = ArrayVec<(TileId, Position, bool), DECK_SIZE>;

/// Collect `(id, pos, free)` of alive tiles not overlapped from above.
fn visible_tiles(tiles: &[TileSnapshot], out: &mut VisibleList) {
    out.clear();
    for t in tiles {
        let covered = tiles
            .iter()
            .any(|o| o.pos.layer > t.pos.layer && t.pos.overlaps(&o.pos));
        if !covered && !out.is_full() {
            out.push((t.id, t.pos, t.free));
        }
    }
}

/// Distance score for moving from `from` to `to` in `dir`, if `to` lies that way.
fn score(from: Position, to: Position, dir: Direction) -> Option<i32> {
    let dx = (to.col - from.col) as i32;
    let dy = (to.row - from.row) as i32;
    let (primary, secondary) = match dir {
        Direction::Left => (-dx, dy.abs()),
        Direction::Right => (dx, dy.abs()),
        Direction::Up => (-dy, dx.abs()),
        Direction::Down => (dy, dx.abs()),
    };
    if primary <= 0 {
        return None;
    }
    Some(primary + 2 * secondary)
}

/// Keyboard cursor over the board.
#[derive(Debug, Clone, Default)]
pub struct BoardCursor {
    current: Option<TileId>,
    scratch: VisibleList,
}

impl BoardCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<TileId> {
        self.current
    }

    pub fn set(&mut self, id: Option<TileId>) {
        self.current = id;
    }

    /// Keep the cursor on a visible tile after the board changed.
    ///
    /// Falls back to the first visible free tile, then the first visible tile.
    pub fn sync(&mut self, tiles: &[TileSnapshot]) -> Option<TileId> {
        visible_tiles(tiles, &mut self.scratch);
        let still_visible = self
            .current
            .is_some_and(|id| self.scratch.iter().any(|&(v, _, _)| v == id));
        if !still_visible {
            self.current = self
                .scratch
                .iter()
                .find(|&&(_, _, free)| free)
                .or_else(|| self.scratch.first())
                .map(|&(id, _, _)| id);
        }
        self.current
    }

    /// Move one step in `dir`. Stays put when nothing lies that way.
    pub fn move_dir(&mut self, dir: Direction, tiles: &[TileSnapshot]) -> Option<TileId> {
        self.sync(tiles);
        let Some(from) = self
            .current
            .and_then(|id| self.scratch.iter().find(|&&(v, _, _)| v == id))
            .map(|&(_, pos, _)| pos)
        else {
            return None;
        };

        let best = self
            .scratch
            .iter()
            .filter_map(|&(id, pos, _)| score(from, pos, dir).map(|s| (s, pos.layer, id)))
            .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(a.2.cmp(&b.2)));
        if let Some((_, _, id)) = best {
            self.current = Some(id);
        }
        self.current
    }

    /// Apply a cursor action. Returns false for actions the cursor ignores.
    pub fn apply(&mut self, action: GameAction, tiles: &[TileSnapshot]) -> bool {
        match Direction::from_action(action) {
            Some(dir) => {
                self.move_dir(dir, tiles);
                true
            }
            None => false,
        }
    }
}
