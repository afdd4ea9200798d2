use crate::types::{Position, TileFace, TileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSnapshot {
    pub id: TileId,
    pub face: TileFace,
    pub pos: Position,
    pub free: bool,
}

/// Read-only view of a game, reused across frames.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    /// Alive tiles in board order.
    pub tiles: Vec<TileSnapshot>,
    pub selected: Option<TileId>,
    pub moves: u32,
    pub remaining: usize,
    pub available_pairs: usize,
    pub game_over: bool,
    pub stuck: bool,
    pub paused: bool,
    pub elapsed_secs: u64,
    pub episode_id: u32,
    pub seed: u32,
    pub hints_used: u32,
    pub shuffles_used: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.selected = None;
        self.moves = 0;
        self.remaining = 0;
        self.available_pairs = 0;
        self.game_over = false;
        self.stuck = false;
        self.paused = false;
        self.elapsed_secs = 0;
        self.episode_id = 0;
        self.seed = 0;
        self.hints_used = 0;
        self.shuffles_used = 0;
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    pub fn tile(&self, id: TileId) -> Option<&TileSnapshot> {
        self.tiles.iter().find(|t| t.id == id)
    }
}
