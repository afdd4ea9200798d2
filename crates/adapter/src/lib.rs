//! Adapter module - external control via TCP socket with a JSON protocol
//!
//! Lets a bot or test harness drive the game over a local socket.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Commanding**: Controller sends `command` messages; the game loop applies
//!    them between frames and replies with `ack` (or `observation` for `observe`)
//! 5. **Observation Streaming**: Clients that asked for it receive an
//!    `observation` whenever the game changes
//!
//! Commands: `tap` (with `tile`), `hint`, `shuffle`, `new_game`, `pause`,
//! `observe`. Rejections are `error` messages with one of `invalid_json`,
//! `unknown_type`, `handshake_required`, `protocol_mismatch`,
//! `not_controller`, `controller_active`, `invalid_command`, `backpressure`.
//!
//! # Environment Variables
//!
//! - `MAHJONG_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `MAHJONG_AI_PORT`: Port number (default: 7878)
//! - `MAHJONG_AI_MAX_PENDING`: Bounded command queue size (default: 16)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1700000000000,"protocol_version":"1.0.0","client_id":1,"role":"controller","controller_id":1,"game_id":"mahjong-solitaire"}
//! Client -> Server: {"type":"command","seq":2,"action":"tap","tile":42}
//! Server -> Client: {"type":"ack","seq":2,"ts":1700000000016,"status":"ok","action":"tap","outcome":"select","tiles":[42]}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use mahjong_core as core;
pub use mahjong_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{
    apply_inbound, Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage,
    ServerStatus,
};
pub use server::{run_server, ServerConfig};
