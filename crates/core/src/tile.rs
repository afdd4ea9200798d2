//! Tile - one slot of the arena

use crate::types::{MatchGroup, Position, Suit, TileFace, TileId};

/// A tile on the board.
///
/// `id` and `pos` never change during a game. The face can be reassigned by a
/// reshuffle, and `removed` only ever goes from false to true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    face: TileFace,
    pos: Position,
    removed: bool,
}

impl Tile {
    pub(crate) fn new(id: TileId, face: TileFace, pos: Position) -> Self {
        Self {
            id,
            face,
            pos,
            removed: false,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn face(&self) -> TileFace {
        self.face
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn col(&self) -> i16 {
        self.pos.col
    }

    pub fn row(&self) -> i16 {
        self.pos.row
    }

    pub fn layer(&self) -> u8 {
        self.pos.layer
    }

    pub fn suit(&self) -> Suit {
        self.face.suit
    }

    pub fn rank(&self) -> u8 {
        self.face.rank
    }

    pub fn match_group(&self) -> MatchGroup {
        self.face.match_group()
    }

    pub fn icon(&self) -> char {
        self.face.icon()
    }

    pub fn label(&self) -> &'static str {
        self.face.label()
    }

    pub fn removed(&self) -> bool {
        self.removed
    }

    pub fn is_alive(&self) -> bool {
        !self.removed
    }

    pub(crate) fn set_face(&mut self, face: TileFace) {
        self.face = face;
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
    }
}
