//! Protocol module - JSON message types for the control adapter
//!
//! Line-delimited JSON. Every message carries `type`, `seq` (sender sequence
//! number) and `ts` (milliseconds since the Unix epoch).

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::core::{GameSnapshot, TileSnapshot};
use crate::types::{TapOutcome, TileId};

pub const PROTOCOL_VERSION: &str = "1.0.0";
pub const GAME_ID: &str = "mahjong-solitaire";

// ============== Client -> Game Messages ==============

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    #[serde(default)]
    pub stream_observations: bool,
}

/// What a controller asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    Tap,
    Hint,
    Shuffle,
    NewGame,
    Pause,
    Observe,
}

/// Command message (controller only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub action: CommandAction,
    /// Target of a `tap`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile: Option<TileId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Claim,
    Release,
}

/// Control message (claim/release controller status)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlMessage {
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub action: ControlAction,
}

/// Any message a client may send.
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Control(ControlMessage),
}

/// Why a client line was rejected before reaching the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub seq: u64,
    pub message: String,
}

/// Parse one line from a client.
///
/// Unparseable JSON, unknown `type` values and malformed bodies map to
/// distinct error codes. The `seq` of the offending line is echoed when it
/// can be recovered.
pub fn parse_message(line: &str) -> Result<ParsedMessage, ParseError> {
    let value: serde_json::Value = serde_json::from_str(line).map_err(|e| ParseError {
        code: ErrorCode::InvalidJson,
        seq: 0,
        message: e.to_string(),
    })?;
    let seq = value.get("seq").and_then(|v| v.as_u64()).unwrap_or(0);
    let invalid = |e: serde_json::Error| ParseError {
        code: ErrorCode::InvalidCommand,
        seq,
        message: e.to_string(),
    };

    match value.get("type").and_then(|v| v.as_str()) {
        Some("hello") => serde_json::from_value(value)
            .map(ParsedMessage::Hello)
            .map_err(invalid),
        Some("command") => serde_json::from_value(value)
            .map(ParsedMessage::Command)
            .map_err(invalid),
        Some("control") => serde_json::from_value(value)
            .map(ParsedMessage::Control)
            .map_err(invalid),
        other => Err(ParseError {
            code: ErrorCode::UnknownType,
            seq,
            message: format!("unknown message type {:?}", other.unwrap_or("")),
        }),
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    UnknownType,
    HandshakeRequired,
    ProtocolMismatch,
    NotController,
    ControllerActive,
    InvalidCommand,
    Backpressure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignedRole {
    Controller,
    Observer,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: AssignedRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_id: Option<u64>,
    pub game_id: String,
}

/// Acknowledgment of an applied command.
///
/// Only the fields relevant to `action` are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<CommandAction>,
    /// Tap outcome kind; absent when the tap was ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    /// Tiles involved in the tap outcome.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<TileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<[TileId; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<u32>,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// One alive tile as seen by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileObservation {
    pub id: TileId,
    pub col: i16,
    pub row: i16,
    pub layer: u8,
    pub suit: String,
    pub rank: u8,
    pub group: String,
    pub free: bool,
}

impl From<&TileSnapshot> for TileObservation {
    fn from(t: &TileSnapshot) -> Self {
        Self {
            id: t.id,
            col: t.pos.col,
            row: t.pos.row,
            layer: t.pos.layer,
            suit: t.face.suit.as_str().to_string(),
            rank: t.face.rank,
            group: t.face.match_group().to_string(),
            free: t.free,
        }
    }
}

/// Game state observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub playable: bool,
    pub paused: bool,
    pub game_over: bool,
    pub stuck: bool,
    pub episode_id: u32,
    pub seed: u32,
    pub moves: u32,
    pub remaining: usize,
    pub available_pairs: usize,
    pub elapsed_secs: u64,
    pub hints_used: u32,
    pub shuffles_used: u32,
    pub selected: Option<TileId>,
    pub tiles: Vec<TileObservation>,
}

impl ObservationMessage {
    pub fn from_snapshot(seq: u64, snap: &GameSnapshot) -> Self {
        Self {
            msg_type: ObservationType::Observation,
            seq,
            ts: now_ms(),
            playable: snap.playable(),
            paused: snap.paused,
            game_over: snap.game_over,
            stuck: snap.stuck,
            episode_id: snap.episode_id,
            seed: snap.seed,
            moves: snap.moves,
            remaining: snap.remaining,
            available_pairs: snap.available_pairs,
            elapsed_secs: snap.elapsed_secs,
            hints_used: snap.hints_used,
            shuffles_used: snap.shuffles_used,
            selected: snap.selected,
            tiles: snap.tiles.iter().map(TileObservation::from).collect(),
        }
    }
}

// ============== Builders ==============

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn create_welcome(
    seq: u64,
    client_id: usize,
    role: AssignedRole,
    controller_id: Option<usize>,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: now_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        client_id: client_id as u64,
        role,
        controller_id: controller_id.map(|id| id as u64),
        game_id: GAME_ID.to_string(),
    }
}

pub fn create_ack(seq: u64, action: Option<CommandAction>) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: now_ms(),
        status: AckStatus::Ok,
        action,
        outcome: None,
        tiles: Vec::new(),
        hint: None,
        paused: None,
        episode_id: None,
    }
}

impl AckMessage {
    /// Attach a tap outcome.
    pub fn with_outcome(mut self, outcome: Option<TapOutcome>) -> Self {
        if let Some(o) = outcome {
            self.outcome = Some(o.kind().to_string());
            self.tiles = match o {
                TapOutcome::Select(id) | TapOutcome::Deselect(id) => vec![id],
                TapOutcome::Switch { prev, tile } => vec![prev, tile],
                TapOutcome::Match(a, b) | TapOutcome::Win(a, b) => vec![a, b],
            };
        }
        self
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: now_ms(),
        code,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;

    #[test]
    fn test_parse_hello() {
        let line = r#"{"type":"hello","seq":1,"ts":5,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}"#;
        match parse_message(line) {
            Ok(ParsedMessage::Hello(h)) => {
                assert_eq!(h.seq, 1);
                assert_eq!(h.client.name, "bot");
                assert!(h.requested.stream_observations);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_command() {
        let line = r#"{"type":"command","seq":2,"action":"tap","tile":17}"#;
        match parse_message(line) {
            Ok(ParsedMessage::Command(c)) => {
                assert_eq!(c.action, CommandAction::Tap);
                assert_eq!(c.tile, Some(17));
            }
            other => panic!("unexpected {:?}", other),
        }
        let line = r#"{"type":"command","seq":3,"action":"new_game"}"#;
        assert!(matches!(
            parse_message(line),
            Ok(ParsedMessage::Command(CommandMessage {
                action: CommandAction::NewGame,
                tile: None,
                ..
            }))
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_message("{nope").unwrap_err().code, ErrorCode::InvalidJson);

        let err = parse_message(r#"{"type":"dance","seq":9}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownType);
        assert_eq!(err.seq, 9);

        let err = parse_message(r#"{"type":"command","seq":4,"action":"fly"}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCommand);
        assert_eq!(err.seq, 4);
    }

    #[test]
    fn test_error_code_wire_names() {
        let e = create_error(3, ErrorCode::HandshakeRequired, "hello first");
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["type"], "error");
        assert_eq!(v["code"], "handshake_required");
    }

    #[test]
    fn test_ack_with_outcome() {
        let ack = create_ack(5, Some(CommandAction::Tap)).with_outcome(Some(TapOutcome::Match(3, 9)));
        let v = serde_json::to_value(&ack).unwrap();
        assert_eq!(v["type"], "ack");
        assert_eq!(v["action"], "tap");
        assert_eq!(v["outcome"], "match");
        assert_eq!(v["tiles"], serde_json::json!([3, 9]));
        assert!(v.get("hint").is_none());

        let ignored = create_ack(6, Some(CommandAction::Tap)).with_outcome(None);
        let v = serde_json::to_value(&ignored).unwrap();
        assert!(v.get("outcome").is_none());
    }

    #[test]
    fn test_observation_from_snapshot() {
        let snap = GameState::new(21).snapshot();
        let obs = ObservationMessage::from_snapshot(1, &snap);
        assert_eq!(obs.tiles.len(), 144);
        assert_eq!(obs.remaining, 144);
        assert!(obs.playable);
        let v = serde_json::to_value(&obs).unwrap();
        assert_eq!(v["type"], "observation");
        assert!(v["tiles"][0]["group"].is_string());
        assert_eq!(v["seed"], 21);
    }
}
