//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::GameAction`] and keeps a board
//! cursor that walks between visible tiles.

pub mod cursor;
pub mod map;

pub use mahjong_core as core;
pub use mahjong_types as types;

pub use cursor::{BoardCursor, Direction};
pub use map::{handle_key_event, should_quit};
