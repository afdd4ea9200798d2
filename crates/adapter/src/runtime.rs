//! Adapter runtime integration.
//!
//! Bridges the synchronous game loop with the async TCP server. The server
//! only validates and forwards; commands are applied to the [`GameState`]
//! by the game loop between frames.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::core::{Command, CommandResult, GameSnapshot, GameState};
use crate::protocol::{create_ack, create_error, CommandAction, ErrorCode, ObservationMessage};
use crate::server::{run_server, ServerConfig};
use crate::types::TileId;

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone)]
pub enum InboundPayload {
    Command(ClientCommand),
    /// A client asked for an observation right after its hello.
    SnapshotRequest,
}

/// Validated command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientCommand {
    pub action: CommandAction,
    pub tile: Option<TileId>,
}

impl ClientCommand {
    /// Core command for this request. `observe` has none.
    pub fn to_core(self) -> Option<Command> {
        match self.action {
            CommandAction::Tap => self.tile.map(Command::Tap),
            CommandAction::Hint => Some(Command::Hint),
            CommandAction::Shuffle => Some(Command::Shuffle),
            CommandAction::NewGame => Some(Command::NewGame),
            CommandAction::Pause => Some(Command::Pause),
            CommandAction::Observe => None,
        }
    }
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    Broadcast { line: String },
}

/// Connection counters shared with the server tasks.
#[derive(Debug, Default)]
pub struct ServerStatus {
    clients: AtomicUsize,
    /// Controller client id, 0 when none.
    controller: AtomicUsize,
}

impl ServerStatus {
    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::Relaxed)
    }

    pub fn controller_id(&self) -> Option<usize> {
        match self.controller.load(Ordering::Relaxed) {
            0 => None,
            id => Some(id),
        }
    }

    pub(crate) fn set_client_count(&self, n: usize) {
        self.clients.store(n, Ordering::Relaxed);
    }

    pub(crate) fn set_controller(&self, id: Option<usize>) {
        self.controller.store(id.unwrap_or(0), Ordering::Relaxed);
    }
}

/// Apply one inbound command to `game` and build the reply line.
///
/// Returns the reply and whether the game state changed.
pub fn apply_inbound(game: &mut GameState, cmd: &InboundCommand) -> (String, bool) {
    let command = match cmd.payload {
        InboundPayload::SnapshotRequest => {
            return (observation_line(cmd.seq, &game.snapshot()), false);
        }
        InboundPayload::Command(c) => c,
    };

    if command.action == CommandAction::Observe {
        return (observation_line(cmd.seq, &game.snapshot()), false);
    }
    let Some(core_cmd) = command.to_core() else {
        let err = create_error(cmd.seq, ErrorCode::InvalidCommand, "tap requires a tile id");
        return (to_line(&err), false);
    };

    let mut ack = create_ack(cmd.seq, Some(command.action));
    let changed = match game.execute(core_cmd) {
        CommandResult::Tap(outcome) => {
            ack = ack.with_outcome(outcome);
            outcome.is_some()
        }
        CommandResult::Hint(hint) => {
            ack.hint = hint.map(|(a, b)| [a, b]);
            false
        }
        CommandResult::Shuffled { .. } => true,
        CommandResult::NewGame { episode_id, .. } => {
            ack.episode_id = Some(episode_id);
            true
        }
        CommandResult::Paused(paused) => {
            ack.paused = Some(paused);
            true
        }
    };
    log::debug!(
        "client {} seq {} {:?} -> changed={}",
        cmd.client_id,
        cmd.seq,
        command.action,
        changed
    );
    (to_line(&ack), changed)
}

fn observation_line(seq: u64, snap: &GameSnapshot) -> String {
    to_line(&ObservationMessage::from_snapshot(seq, snap))
}

fn to_line<T: Serialize>(msg: &T) -> String {
    serde_json::to_string(msg).unwrap_or_else(|e| {
        log::error!("failed to encode adapter message: {}", e);
        String::from("{}")
    })
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    status: Arc<ServerStatus>,
    observation_seq: u64,
}

impl Adapter {
    /// Start the server on a background tokio runtime.
    pub fn start(config: ServerConfig) -> Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let status = Arc::new(ServerStatus::default());

        let rt = Runtime::new()?;
        let server_status = Arc::clone(&status);
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, server_status, None).await {
                log::error!("adapter server stopped: {:#}", e);
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            status,
            observation_seq: 0,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    pub fn status(&self) -> &ServerStatus {
        &self.status
    }

    /// Apply every queued command. Returns true when the game changed.
    pub fn pump(&mut self, game: &mut GameState) -> bool {
        let mut changed = false;
        while let Some(cmd) = self.try_recv() {
            let (line, c) = apply_inbound(game, &cmd);
            self.send(OutboundMessage::ToClient {
                client_id: cmd.client_id,
                line,
            });
            changed |= c;
        }
        if changed {
            self.broadcast_observation(&game.snapshot());
        }
        changed
    }

    /// Send an observation to every streaming client.
    pub fn broadcast_observation(&mut self, snap: &GameSnapshot) {
        self.observation_seq += 1;
        self.send(OutboundMessage::Broadcast {
            line: observation_line(self.observation_seq, snap),
        });
    }
}
