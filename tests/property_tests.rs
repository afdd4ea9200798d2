//! Property checks over random deals and random play.

use mahjong_solitaire::core::{Board, GameState, SimpleRng};
use mahjong_solitaire::types::{Position, TapOutcome, TileId, DECK_SIZE};
use proptest::prelude::*;

/// Deal from `seed` and clear `steps` hinted pairs.
fn played_game(seed: u32, steps: usize) -> GameState {
    let mut game = GameState::new(seed);
    for _ in 0..steps {
        let Some((a, b)) = game.find_hint() else { break };
        game.tap(a);
        game.tap(b);
    }
    game
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Removing any tile never makes a free tile blocked.
    #[test]
    fn freedom_is_monotone_under_removal(seed in any::<u32>(), picks in prop::collection::vec(0usize..DECK_SIZE, 1..60)) {
        let mut board = Board::deal(&mut SimpleRng::new(seed));
        for id in picks {
            let free_before = board.free_ids();
            board = board.without(id);
            for &f in free_before.iter().filter(|&&f| f != id) {
                prop_assert!(board.is_free(f), "tile {} lost freedom after removing {}", f, id);
            }
        }
    }

    /// A hint is two distinct free matching tiles, and absent only when no such pair exists.
    #[test]
    fn hint_is_sound_and_complete(seed in any::<u32>(), steps in 0usize..40) {
        let mut game = played_game(seed, steps);
        let free = game.board().free_ids();
        let brute = free.iter().enumerate().any(|(i, &a)| {
            free[i + 1..].iter().any(|&b| {
                game.board().tiles()[a].match_group() == game.board().tiles()[b].match_group()
            })
        });
        match game.find_hint() {
            Some((a, b)) => {
                prop_assert!(a < b);
                prop_assert!(game.is_free(a) && game.is_free(b));
                prop_assert_eq!(game.board().tiles()[a].match_group(), game.board().tiles()[b].match_group());
            }
            None => prop_assert!(!brute),
        }
    }

    /// Shuffling keeps every alive position and the face multiset.
    #[test]
    fn shuffle_preserves_structure(seed in any::<u32>(), steps in 0usize..30) {
        let mut game = played_game(seed, steps);
        let snapshot = |g: &GameState| {
            let mut pos: Vec<(TileId, Position)> = g.remaining().map(|t| (t.id(), t.pos())).collect();
            let mut faces: Vec<_> = g.remaining().map(|t| (t.suit(), t.rank())).collect();
            pos.sort();
            faces.sort();
            (pos, faces)
        };
        let before = snapshot(&game);
        let count = game.remaining_count();
        game.shuffle_remaining();
        prop_assert_eq!(snapshot(&game), before);
        prop_assert_eq!(game.remaining_count(), count);
        prop_assert_eq!(game.selected(), None);
    }

    /// Arbitrary taps keep the counters consistent with the board.
    #[test]
    fn random_taps_keep_invariants(seed in any::<u32>(), taps in prop::collection::vec(0usize..DECK_SIZE + 4, 0..400)) {
        let mut game = GameState::new(seed);
        for id in taps {
            let was_free = game.is_free(id);
            let outcome = game.tap(id);
            prop_assert_eq!(outcome.is_some(), was_free);
            if let Some(TapOutcome::Match(a, b) | TapOutcome::Win(a, b)) = outcome {
                prop_assert!(!game.board().is_alive(a) && !game.board().is_alive(b));
                prop_assert_eq!(game.board().tiles()[a].match_group(), game.board().tiles()[b].match_group());
            }
            if let Some(sel) = game.selected() {
                prop_assert!(game.is_free(sel));
            }
            prop_assert_eq!(game.remaining_count(), DECK_SIZE - 2 * game.moves() as usize);
            prop_assert_eq!(game.game_over(), game.remaining_count() == 0);
        }
    }

    /// Dealing is a pure function of the seed.
    #[test]
    fn same_seed_same_deal(seed in any::<u32>()) {
        let a = GameState::new(seed);
        let b = GameState::new(seed);
        prop_assert_eq!(a.board(), b.board());
        prop_assert_eq!(a.start_reshuffles(), b.start_reshuffles());
    }
}
