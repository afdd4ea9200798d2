//! End-to-end rules checks through the facade crate.

use mahjong_solitaire::core::{build_deck, Board, GameState};
use mahjong_solitaire::types::{MatchGroup, Position, Suit, TapOutcome, TileFace, MAX_LAYER};

fn face(suit: Suit, rank: u8) -> TileFace {
    TileFace::new(suit, rank)
}

#[test]
fn test_deck_composition() {
    let deck = build_deck();
    let count = |pred: &dyn Fn(&TileFace) -> bool| deck.iter().filter(|f| pred(f)).count();

    let numbered = count(&|f| matches!(f.suit, Suit::Circles | Suit::Bamboo | Suit::Chars));
    assert_eq!(numbered, 108);
    assert_eq!(count(&|f| f.suit == Suit::Wind), 16);
    assert_eq!(count(&|f| f.suit == Suit::Dragon), 12);
    assert_eq!(count(&|f| f.suit == Suit::Flower), 4);
    assert_eq!(count(&|f| f.suit == Suit::Season), 4);
    assert_eq!(deck.len(), 144);

    assert!(deck.iter().filter(|f| f.suit == Suit::Flower).all(|f| f.match_group() == MatchGroup::Flower));
}

#[test]
fn test_top_layer_pair_select_then_match() {
    let board = Board::from_slots([
        (face(Suit::Dragon, 2), Position::new(0, 0, MAX_LAYER)),
        (face(Suit::Dragon, 2), Position::new(4, 0, MAX_LAYER)),
        (face(Suit::Bamboo, 0), Position::new(12, 0, 0)),
        (face(Suit::Bamboo, 0), Position::new(16, 0, 0)),
    ]);
    let mut game = GameState::from_board(board, 1);

    assert_eq!(game.tap(0), Some(TapOutcome::Select(0)));
    assert_eq!(game.tap(1), Some(TapOutcome::Match(0, 1)));
    assert!(game.board().get(0).unwrap().removed());
    assert!(game.board().get(1).unwrap().removed());
    assert!(!game.game_over());
}

#[test]
fn test_covered_tile_tap_is_ignored() {
    let board = Board::from_slots([
        (face(Suit::Chars, 3), Position::new(0, 0, 0)),
        (face(Suit::Chars, 5), Position::new(0, 0, 1)),
        (face(Suit::Wind, 1), Position::new(10, 0, 0)),
    ]);
    let mut game = GameState::from_board(board, 1);

    assert_eq!(game.tap(0), None);
    assert_eq!(game.selected(), None);

    game.tap(2);
    assert_eq!(game.tap(0), None);
    assert_eq!(game.selected(), Some(2));
}

#[test]
fn test_final_pair_wins() {
    let board = Board::from_slots([
        (face(Suit::Season, 0), Position::new(0, 0, 0)),
        (face(Suit::Season, 2), Position::new(6, 0, 0)),
        (face(Suit::Circles, 8), Position::new(12, 0, 0)),
        (face(Suit::Circles, 8), Position::new(16, 0, 0)),
    ]);
    let mut game = GameState::from_board(board, 1);

    game.tap(2);
    assert_eq!(game.tap(3), Some(TapOutcome::Match(2, 3)));
    assert!(!game.game_over());

    game.tap(0);
    assert_eq!(game.tap(1), Some(TapOutcome::Win(0, 1)));
    assert!(game.game_over());
    assert_eq!(game.remaining_count(), 0);
    assert_eq!(game.remaining().count(), 0);
    assert!(!game.is_stuck());
}

#[test]
fn test_stacked_last_pair_is_stuck() {
    let board = Board::from_slots([
        (face(Suit::Season, 0), Position::new(0, 0, 0)),
        (face(Suit::Season, 2), Position::new(0, 0, 1)),
    ]);
    let mut game = GameState::from_board(board, 1);
    assert_eq!(game.tap(1), Some(TapOutcome::Select(1)));
    assert_eq!(game.tap(0), None);
    assert!(game.is_stuck());
    assert!(!game.game_over());
}

#[test]
fn test_no_free_pairs_means_no_hint() {
    let board = Board::from_slots([
        (face(Suit::Wind, 0), Position::new(0, 0, 0)),
        (face(Suit::Wind, 1), Position::new(4, 0, 0)),
        (face(Suit::Wind, 0), Position::new(8, 0, 0)),
        (face(Suit::Dragon, 0), Position::new(8, 0, 1)),
    ]);
    let mut game = GameState::from_board(board, 1);
    assert_eq!(game.find_hint(), None);
    assert!(!game.has_valid_moves());
    assert!(game.is_stuck());
    assert!(game.snapshot().stuck);
}

#[test]
fn test_play_by_hints_until_stuck_or_won() {
    let mut game = GameState::new(2024);
    let mut matches = 0;
    while let Some((a, b)) = game.find_hint() {
        assert_eq!(game.tap(a), Some(TapOutcome::Select(a)));
        match game.tap(b) {
            Some(TapOutcome::Match(x, y)) | Some(TapOutcome::Win(x, y)) => {
                assert_eq!((x, y), (a, b));
            }
            other => panic!("hinted pair did not match: {:?}", other),
        }
        matches += 1;
    }
    assert_eq!(game.moves(), matches);
    assert_eq!(game.remaining_count(), 144 - 2 * matches as usize);
    assert_eq!(game.game_over(), game.remaining_count() == 0);
    if !game.game_over() {
        assert!(game.is_stuck());
    }
}

#[test]
fn test_manual_shuffle_keeps_game_going() {
    let mut game = GameState::new(5);
    let before: Vec<Position> = game.remaining().map(|t| t.pos()).collect();
    game.shuffle_remaining();
    let after: Vec<Position> = game.remaining().map(|t| t.pos()).collect();
    assert_eq!(before, after);
    assert_eq!(game.shuffles_used(), 1);
    assert!(!game.game_over());
}
