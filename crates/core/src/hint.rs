//! Hint search - first legal pair among the free tiles
//!
//! Free tiles are scanned in board order (outer `i`, inner `j > i`), so the
//! same board always yields the same hint.

use crate::board::{Board, TileIdList};
use crate::types::TileId;

/// First free pair with equal match groups, or `None` when stuck.
pub fn find_hint(board: &Board) -> Option<(TileId, TileId)> {
    let mut free = TileIdList::new();
    board.free_ids_into(&mut free);
    find_hint_in(board, &free)
}

/// Same scan over a precomputed free list.
pub fn find_hint_in(board: &Board, free: &[TileId]) -> Option<(TileId, TileId)> {
    for (i, &a) in free.iter().enumerate() {
        let Some(ta) = board.get(a) else { continue };
        let group = ta.match_group();
        for &b in &free[i + 1..] {
            if board.get(b).is_some_and(|tb| tb.match_group() == group) {
                return Some((a, b));
            }
        }
    }
    None
}

/// Whether any legal pair exists.
pub fn has_valid_moves(board: &Board) -> bool {
    find_hint(board).is_some()
}

/// Number of distinct legal pairs among the free tiles.
pub fn count_available_pairs(board: &Board) -> usize {
    let free = board.free_ids();
    let mut pairs = 0;
    for (i, &a) in free.iter().enumerate() {
        let group = board.tiles()[a].match_group();
        pairs += free[i + 1..]
            .iter()
            .filter(|&&b| board.tiles()[b].match_group() == group)
            .count();
    }
    pairs
}
