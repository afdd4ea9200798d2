//! Mahjong Solitaire (workspace facade crate).
//!
//! Re-exports the member crates under `mahjong_solitaire::{core,adapter,term,input,types}`
//! and hosts the terminal binary's session, configuration and logging.

pub use mahjong_adapter as adapter;
pub use mahjong_core as core;
pub use mahjong_input as input;
pub use mahjong_term as term;
pub use mahjong_types as types;

pub mod app;
pub mod config;
pub mod logging;

pub use app::App;
pub use config::AppConfig;
