//! Board module - the tile arena and occlusion rules
//!
//! Tiles live in a flat arena indexed by [`TileId`]; a tile's id is its slot
//! index and never changes. A tile is *free* when nothing alive sits on a
//! higher layer over its footprint and at least one horizontal side is open.
//!
//! Removing tiles can only open sides and uncover footprints, so freedom is
//! monotone: a free tile stays free as the board empties.

use arrayvec::ArrayVec;

use crate::catalog::shuffled_deck;
use crate::layout::turtle_layout;
use crate::rng::SimpleRng;
use crate::tile::Tile;
use crate::types::{Position, TileFace, TileId, DECK_SIZE, TILE_SPAN};

/// Fixed-capacity list of tile ids, large enough for a whole deck.
pub type TileIdList = ArrayVec<TileId, DECK_SIZE>;

/// The tile arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    tiles: Vec<Tile>,
    alive: usize,
}

impl Board {
    /// Deal a shuffled deck onto the turtle layout.
    pub fn deal(rng: &mut SimpleRng) -> Self {
        let deck = shuffled_deck(rng);
        Self::from_slots(deck.into_iter().zip(turtle_layout().iter().copied()))
    }

    /// Build a board from explicit `(face, position)` slots.
    ///
    /// Ids are assigned in iteration order. At most [`DECK_SIZE`] slots are
    /// taken.
    pub fn from_slots<I>(slots: I) -> Self
    where
        I: IntoIterator<Item = (TileFace, Position)>,
    {
        let tiles: Vec<Tile> = slots
            .into_iter()
            .take(DECK_SIZE)
            .enumerate()
            .map(|(id, (face, pos))| Tile::new(id, face, pos))
            .collect();
        let alive = tiles.len();
        Self { tiles, alive }
    }

    /// Total number of tiles, removed ones included.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Alive tiles in board order.
    pub fn alive(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter().filter(|t| t.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive
    }

    pub fn is_alive(&self, id: TileId) -> bool {
        self.get(id).is_some_and(|t| t.is_alive())
    }

    /// Whether an alive tile on a higher layer overlaps the footprint.
    pub fn is_covered(&self, id: TileId) -> bool {
        let Some(tile) = self.get(id) else {
            return false;
        };
        let pos = tile.pos();
        self.alive()
            .any(|o| o.layer() > pos.layer && pos.overlaps(&o.pos()))
    }

    /// Whether both horizontal sides are blocked by alive same-layer tiles.
    pub fn is_pinned(&self, id: TileId) -> bool {
        let Some(tile) = self.get(id) else {
            return false;
        };
        let pos = tile.pos();
        let mut left = false;
        let mut right = false;
        for o in self.alive() {
            let op = o.pos();
            if op.layer != pos.layer || !pos.rows_overlap(&op) {
                continue;
            }
            if op.col + TILE_SPAN == pos.col {
                left = true;
            } else if op.col == pos.col + TILE_SPAN {
                right = true;
            }
            if left && right {
                return true;
            }
        }
        false
    }

    /// Whether the tile can be selected. Removed and unknown ids are never free.
    pub fn is_free(&self, id: TileId) -> bool {
        self.is_alive(id) && !self.is_covered(id) && !self.is_pinned(id)
    }

    /// Collect free tile ids in board order into `out` (cleared first).
    pub fn free_ids_into(&self, out: &mut TileIdList) {
        out.clear();
        for tile in self.alive() {
            if self.is_free(tile.id()) {
                out.push(tile.id());
            }
        }
    }

    pub fn free_ids(&self) -> TileIdList {
        let mut out = TileIdList::new();
        self.free_ids_into(&mut out);
        out
    }

    /// Topmost alive tile whose footprint contains grid unit `(col, row)`.
    ///
    /// Ties on the same layer resolve to the higher id, which is drawn last.
    pub fn tile_at(&self, col: i16, row: i16) -> Option<TileId> {
        self.alive()
            .filter(|t| {
                let p = t.pos();
                p.col <= col && col < p.col + TILE_SPAN && p.row <= row && row < p.row + TILE_SPAN
            })
            .max_by_key(|t| (t.layer(), t.id()))
            .map(|t| t.id())
    }

    /// Copy of the board with one extra tile removed, for what-if queries.
    pub fn without(&self, id: TileId) -> Board {
        let mut next = self.clone();
        if next.is_alive(id) {
            next.tiles[id].mark_removed();
            next.alive -= 1;
        }
        next
    }

    /// Remove a matching pair of distinct alive tiles.
    ///
    /// Returns false and leaves the board untouched otherwise.
    pub(crate) fn remove_pair(&mut self, a: TileId, b: TileId) -> bool {
        if a == b || !self.is_alive(a) || !self.is_alive(b) {
            return false;
        }
        if !self.tiles[a].face().matches(&self.tiles[b].face()) {
            return false;
        }
        self.tiles[a].mark_removed();
        self.tiles[b].mark_removed();
        self.alive -= 2;
        true
    }

    pub(crate) fn set_face(&mut self, id: TileId, face: TileFace) {
        if let Some(tile) = self.tiles.get_mut(id) {
            tile.set_face(face);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::deal(&mut SimpleRng::default())
    }
}
