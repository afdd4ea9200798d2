//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the Mahjong Solitaire rules: the deck, the turtle
//! layout, the occlusion test, the tap state machine, hint search and the
//! reshuffle guard. It has **no dependencies** on UI, networking, or I/O.
//!
//! - **Deterministic**: Same seed produces the identical deal
//! - **Testable**: Boards can be built from explicit slots
//!
//! # Module Structure
//!
//! - [`catalog`]: the 144-tile deck
//! - [`layout`]: turtle slot table normalized to 144 positions
//! - [`board`]: tile arena with cover/pin/free queries
//! - [`game_state`]: selection, matching, win detection, timer
//! - [`hint`]: first legal pair in board order
//! - [`shuffle`]: face permutation and start-of-game retry loop
//! - [`rng`]: seeded LCG used for all randomness
//!
//! # Rules
//!
//! - A tile is **free** when nothing alive covers its footprint from a higher
//!   layer and at least one horizontal side is open.
//! - Two free tiles match when their faces are identical, or both are
//!   flowers, or both are seasons.
//! - Clearing all 144 tiles wins. Running out of pairs does not end the game.
//!
//! # Example
//!
//! ```
//! use mahjong_core::GameState;
//! use mahjong_core::types::TapOutcome;
//!
//! let mut game = GameState::new(12345);
//! if let Some((a, b)) = game.find_hint() {
//!     assert_eq!(game.tap(a), Some(TapOutcome::Select(a)));
//!     assert_eq!(game.tap(b), Some(TapOutcome::Match(a, b)));
//!     assert_eq!(game.remaining_count(), 142);
//! }
//! ```

pub mod board;
pub mod catalog;
pub mod game_state;
pub mod hint;
pub mod layout;
pub mod rng;
pub mod shuffle;
pub mod snapshot;
pub mod tile;

pub use mahjong_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, TileIdList};
pub use catalog::{build_deck, shuffled_deck};
pub use game_state::{Command, CommandResult, GameState};
pub use hint::{count_available_pairs, find_hint, has_valid_moves};
pub use layout::{normalize_slots, raw_turtle, turtle_layout};
pub use rng::SimpleRng;
pub use shuffle::{ensure_playable, shuffle_remaining};
pub use snapshot::{GameSnapshot, TileSnapshot};
pub use tile::Tile;
