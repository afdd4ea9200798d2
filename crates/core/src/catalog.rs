//! Tile catalog - the fixed 144-tile deck
//!
//! Composition is fixed; only the order is random. Faces are built suit by
//! suit, rank by rank, copy by copy, then permuted before being dealt onto
//! layout slots.

use crate::rng::SimpleRng;
use crate::types::{Suit, TileFace, DECK_SIZE};

/// Build the unshuffled deck.
pub fn build_deck() -> Vec<TileFace> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in 0..suit.rank_count() {
            for _ in 0..suit.copies() {
                deck.push(TileFace::new(suit, rank));
            }
        }
    }
    debug_assert_eq!(deck.len(), DECK_SIZE);
    deck
}

/// Build the deck and apply a uniform shuffle.
pub fn shuffled_deck(rng: &mut SimpleRng) -> Vec<TileFace> {
    let mut deck = build_deck();
    rng.shuffle(&mut deck);
    deck
}
