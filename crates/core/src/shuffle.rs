//! Solvability guard - reshuffle faces among the remaining tiles
//!
//! Positions never move; only faces are permuted across alive tiles. At
//! game start [`ensure_playable`] reshuffles until a legal pair exists or the
//! retry budget runs out. This is a best-effort guarantee of a first move,
//! not a proof that the deal can be cleared.

use crate::board::Board;
use crate::hint::has_valid_moves;
use crate::rng::SimpleRng;
use crate::types::{TileFace, TileId};

/// Permute the faces of all alive tiles. No-op when nothing is alive.
pub fn shuffle_remaining(board: &mut Board, rng: &mut SimpleRng) {
    let ids: Vec<TileId> = board.alive().map(|t| t.id()).collect();
    if ids.is_empty() {
        return;
    }
    let mut faces: Vec<TileFace> = board.alive().map(|t| t.face()).collect();
    rng.shuffle(&mut faces);
    for (id, face) in ids.into_iter().zip(faces) {
        board.set_face(id, face);
    }
}

/// Reshuffle until a legal pair exists, at most `max_attempts` times.
///
/// Returns the number of reshuffles performed.
pub fn ensure_playable(board: &mut Board, rng: &mut SimpleRng, max_attempts: u32) -> u32 {
    let mut attempts = 0;
    while attempts < max_attempts && !has_valid_moves(board) {
        shuffle_remaining(board, rng);
        attempts += 1;
    }
    if attempts > 0 {
        let playable = has_valid_moves(board);
        log::debug!("reshuffled starting board {} time(s), playable={}", attempts, playable);
        if !playable {
            log::warn!("starting board has no legal pair after {} reshuffles", attempts);
        }
    }
    attempts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::{at, face};
    use crate::types::{Position, Suit};

    fn sorted_positions(board: &Board) -> Vec<Position> {
        let mut v: Vec<Position> = board.alive().map(|t| t.pos()).collect();
        v.sort();
        v
    }

    #[test]
    fn test_shuffle_keeps_positions_and_count() {
        let mut rng = SimpleRng::new(8);
        let mut board = Board::deal(&mut rng);
        let before = sorted_positions(&board);
        shuffle_remaining(&mut board, &mut rng);
        assert_eq!(sorted_positions(&board), before);
        assert_eq!(board.alive_count(), 144);
        for (i, tile) in board.tiles().iter().enumerate() {
            assert_eq!(tile.id(), i);
        }
    }

    #[test]
    fn test_shuffle_keeps_face_multiset() {
        let mut rng = SimpleRng::new(9);
        let mut board = Board::deal(&mut rng);
        let mut before: Vec<_> = board.alive().map(|t| (t.suit(), t.rank())).collect();
        shuffle_remaining(&mut board, &mut rng);
        let mut after: Vec<_> = board.alive().map(|t| (t.suit(), t.rank())).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_shuffle_ignores_removed_tiles() {
        let mut board = Board::from_slots([
            (face(Suit::Bamboo, 0), at(0, 0, 0)),
            (face(Suit::Bamboo, 0), at(4, 0, 0)),
            (face(Suit::Dragon, 1), at(8, 0, 0)),
            (face(Suit::Wind, 2), at(12, 0, 0)),
        ]);
        assert!(board.remove_pair(0, 1));
        let mut rng = SimpleRng::new(1);
        for _ in 0..10 {
            shuffle_remaining(&mut board, &mut rng);
            assert_eq!(board.tiles()[0].face(), face(Suit::Bamboo, 0));
            assert_eq!(board.tiles()[1].face(), face(Suit::Bamboo, 0));
            assert!(board.tiles()[0].removed());
        }
        assert_eq!(board.alive_count(), 2);
    }

    #[test]
    fn test_shuffle_empty_board_is_noop() {
        let mut board = Board::from_slots([
            (face(Suit::Bamboo, 0), at(0, 0, 0)),
            (face(Suit::Bamboo, 0), at(4, 0, 0)),
        ]);
        assert!(board.remove_pair(0, 1));
        let snapshot = board.clone();
        shuffle_remaining(&mut board, &mut SimpleRng::new(3));
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_ensure_playable_stops_when_pair_exists() {
        let mut board = Board::from_slots([
            (face(Suit::Bamboo, 0), at(0, 0, 0)),
            (face(Suit::Bamboo, 0), at(4, 0, 0)),
        ]);
        assert_eq!(ensure_playable(&mut board, &mut SimpleRng::new(1), 20), 0);
    }

    #[test]
    fn test_ensure_playable_respects_retry_limit() {
        // No arrangement of these faces can ever pair.
        let mut board = Board::from_slots([
            (face(Suit::Bamboo, 0), at(0, 0, 0)),
            (face(Suit::Bamboo, 1), at(4, 0, 0)),
        ]);
        assert_eq!(ensure_playable(&mut board, &mut SimpleRng::new(1), 5), 5);
        assert_eq!(board.alive_count(), 2);
    }

    #[test]
    fn test_ensure_playable_repairs_stuck_start() {
        // C sits on top of D. The only pair is A+D, and D is covered.
        // Shuffling can move the pair onto two of the free tiles (A, B, C).
        let mut board = Board::from_slots([
            (face(Suit::Wind, 0), at(0, 0, 0)),
            (face(Suit::Dragon, 0), at(4, 0, 0)),
            (face(Suit::Dragon, 1), at(8, 0, 1)),
            (face(Suit::Wind, 0), at(8, 0, 0)),
        ]);
        assert!(!has_valid_moves(&board));
        let attempts = ensure_playable(&mut board, &mut SimpleRng::new(77), 200);
        assert!(attempts > 0);
        assert!(has_valid_moves(&board));
    }
}
