//! Board tests - dealing and occlusion on the real turtle

use mahjong_solitaire::core::{build_deck, turtle_layout, Board, SimpleRng};
use mahjong_solitaire::types::{Position, Suit, TileFace, DECK_SIZE, MAX_LAYER};

fn dealt(seed: u32) -> Board {
    Board::deal(&mut SimpleRng::new(seed))
}

fn capstone(board: &Board) -> usize {
    board
        .tiles()
        .iter()
        .find(|t| t.layer() == MAX_LAYER)
        .map(|t| t.id())
        .expect("turtle has a capstone")
}

#[test]
fn test_deal_places_every_tile_on_the_layout() {
    let board = dealt(5);
    assert_eq!(board.len(), DECK_SIZE);
    assert_eq!(board.alive_count(), DECK_SIZE);
    for (tile, slot) in board.tiles().iter().zip(turtle_layout()) {
        assert_eq!(tile.pos(), *slot);
    }
}

#[test]
fn test_deal_is_a_permutation_of_the_deck() {
    let board = dealt(77);
    let mut dealt: Vec<(Suit, u8)> = board.tiles().iter().map(|t| (t.suit(), t.rank())).collect();
    let mut deck: Vec<(Suit, u8)> = build_deck().iter().map(|f| (f.suit, f.rank)).collect();
    dealt.sort();
    deck.sort();
    assert_eq!(dealt, deck);
}

#[test]
fn test_different_seeds_deal_differently() {
    assert_ne!(dealt(1), dealt(2));
    assert_eq!(dealt(3), dealt(3));
}

#[test]
fn test_capstone_is_free_and_covers_layer_three() {
    let board = dealt(9);
    let cap = capstone(&board);
    assert!(board.is_free(cap));

    let under: Vec<usize> = board
        .tiles()
        .iter()
        .filter(|t| t.layer() == MAX_LAYER - 1)
        .map(|t| t.id())
        .collect();
    assert_eq!(under.len(), 2);
    for &id in &under {
        assert!(board.is_covered(id));
        assert!(!board.is_free(id));
    }

    let opened = board.without(cap);
    for &id in &under {
        assert!(opened.is_free(id), "tile {} should open once the capstone is gone", id);
    }
}

#[test]
fn test_tile_at_picks_the_topmost_tile() {
    let board = dealt(9);
    let cap = capstone(&board);
    let pos = board.tiles()[cap].pos();
    assert_eq!(board.tile_at(pos.col, pos.row), Some(cap));
    assert_eq!(board.tile_at(-10, -10), None);
}

#[test]
fn test_row_ends_free_row_middle_pinned() {
    let board = dealt(4);
    let top_row: Vec<_> = board
        .tiles()
        .iter()
        .filter(|t| t.layer() == 0 && t.row() == 0)
        .map(|t| (t.col(), t.id()))
        .collect();
    let min = top_row.iter().min().copied().unwrap();
    let max = top_row.iter().max().copied().unwrap();
    assert!(board.is_free(min.1));
    assert!(board.is_free(max.1));

    let middle = top_row
        .iter()
        .find(|(col, _)| *col > min.0 && *col < max.0)
        .map(|&(_, id)| id)
        .unwrap();
    assert!(board.is_pinned(middle));
    assert!(!board.is_free(middle));
}

#[test]
fn test_unknown_and_removed_ids_are_never_free() {
    let board = dealt(4);
    assert!(!board.is_free(DECK_SIZE));
    let cap = capstone(&board);
    assert!(!board.without(cap).is_free(cap));
}

#[test]
fn test_from_slots_caps_at_deck_size() {
    let face = TileFace::new(Suit::Wind, 0);
    let slots = (0..DECK_SIZE as i16 + 10).map(|i| (face, Position::new(i * 2, 0, 0)));
    let board = Board::from_slots(slots);
    assert_eq!(board.len(), DECK_SIZE);
    assert!(board.get(DECK_SIZE).is_none());
}
