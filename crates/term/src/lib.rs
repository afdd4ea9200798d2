//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: the board is drawn into a plain
//! framebuffer which is then diffed and flushed to the terminal. No widget
//! toolkit is involved.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use mahjong_core as core;
pub use mahjong_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AdapterStatusView, AnchorY, GameView, Highlights, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
