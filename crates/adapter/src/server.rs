//! TCP server for the control adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage, ServerStatus};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            max_pending_commands: 16,
        }
    }
}

impl ServerConfig {
    /// Read `MAHJONG_AI_HOST`, `MAHJONG_AI_PORT` and `MAHJONG_AI_MAX_PENDING`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall back
    /// to the defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let host = get("MAHJONG_AI_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = get("MAHJONG_AI_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = get("MAHJONG_AI_MAX_PENDING")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending_commands);
        Self {
            host,
            port,
            max_pending_commands,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid adapter address {}:{}", self.host, self.port))
    }
}

/// Handle to a connected client
struct ClientHandle {
    id: usize,
    stream_observations: bool,
    handshaken: bool,
    last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<String>,
}

/// Shared server state
struct ServerState {
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
    status: Arc<ServerStatus>,
}

impl ServerState {
    async fn is_handshaken(&self, client_id: usize) -> bool {
        self.clients
            .read()
            .await
            .iter()
            .any(|c| c.id == client_id && c.handshaken)
    }

    /// Enforce strictly increasing `seq` per client.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn is_controller(&self, client_id: usize) -> bool {
        *self.controller.read().await == Some(client_id)
    }

    /// Become controller if the seat is free.
    async fn try_claim(&self, client_id: usize) -> bool {
        let mut controller = self.controller.write().await;
        match *controller {
            None => {
                *controller = Some(client_id);
                self.status.set_controller(Some(client_id));
                log::info!("adapter client {} is now controller", client_id);
                true
            }
            Some(id) => id == client_id,
        }
    }

    async fn release(&self, client_id: usize) -> bool {
        let mut controller = self.controller.write().await;
        if *controller == Some(client_id) {
            *controller = None;
            self.status.set_controller(None);
            true
        } else {
            false
        }
    }

    async fn remove(&self, client_id: usize) {
        let mut clients = self.clients.write().await;
        clients.retain(|c| c.id != client_id);
        self.status.set_client_count(clients.len());
        drop(clients);
        self.release(client_id).await;
    }
}

/// Start the TCP server
///
/// `ready_tx` receives the bound address, which tests use with port 0.
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    status: Arc<ServerStatus>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind adapter on {}", addr))?;
    let bound = listener.local_addr()?;
    log::info!("adapter listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState {
        clients: RwLock::new(Vec::new()),
        controller: RwLock::new(None),
        status,
    });

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let clients = state.clients.read().await;
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                            let _ = c.tx.send(line);
                        }
                    }
                    OutboundMessage::Broadcast { line } => {
                        for c in clients.iter().filter(|c| c.stream_observations) {
                            let _ = c.tx.send(line.clone());
                        }
                    }
                }
            }
        });
    }

    let mut client_id_counter = 0usize;
    loop {
        let (socket, peer) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        log::info!("adapter client {} connected from {}", client_id, peer);

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, Arc::clone(&state), command_tx).await {
                log::warn!("adapter client {} error: {:#}", client_id, e);
            }
            state.remove(client_id).await;
            log::info!("adapter client {} disconnected", client_id);
        });
    }
}

fn encode<T: serde::Serialize>(msg: &T) -> String {
    serde_json::to_string(msg).unwrap_or_default()
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            stream_observations: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
        state.status.set_client_count(clients.len());
    }

    let write_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            log::trace!("adapter -> {}: {}", client_id, line);
            if writer.write_all(line.as_bytes()).await.is_err()
                || writer.write_all(b"\n").await.is_err()
                || writer.flush().await.is_err()
            {
                break;
            }
        }
    });

    let reply_error = |seq: u64, code: ErrorCode, message: &str| {
        let _ = tx.send(encode(&create_error(seq, code, message)));
    };

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        log::trace!("adapter <- {}: {}", client_id, trimmed);

        let msg = match parse_message(trimmed) {
            Ok(msg) => msg,
            Err(e) => {
                reply_error(e.seq, e.code, &e.message);
                continue;
            }
        };

        match msg {
            ParsedMessage::Hello(hello) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, hello.seq).await
                {
                    reply_error(hello.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                if !hello.protocol_version.starts_with("1.") {
                    reply_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("protocol version {} not supported", hello.protocol_version),
                    );
                    break;
                }
                {
                    let mut clients = state.clients.write().await;
                    if let Some(c) = clients.iter_mut().find(|c| c.id == client_id) {
                        c.handshaken = true;
                        c.last_seq = Some(hello.seq);
                        c.stream_observations = hello.requested.stream_observations;
                    }
                }

                // First client to hello becomes controller.
                let role = if state.try_claim(client_id).await {
                    AssignedRole::Controller
                } else {
                    AssignedRole::Observer
                };
                let controller_id = *state.controller.read().await;
                let welcome = create_welcome(hello.seq, client_id, role, controller_id);
                let _ = tx.send(encode(&welcome));

                if hello.requested.stream_observations {
                    let _ = command_tx.try_send(InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::SnapshotRequest,
                    });
                }
            }
            ParsedMessage::Command(cmd) => {
                if !state.is_handshaken(client_id).await {
                    reply_error(cmd.seq, ErrorCode::HandshakeRequired, "send hello before command");
                    continue;
                }
                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    reply_error(cmd.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                // Observers may still ask for an observation.
                if cmd.action != CommandAction::Observe && !state.is_controller(client_id).await {
                    reply_error(cmd.seq, ErrorCode::NotController, "only the controller may send commands");
                    continue;
                }
                if cmd.action == CommandAction::Tap && cmd.tile.is_none() {
                    reply_error(cmd.seq, ErrorCode::InvalidCommand, "tap requires a tile id");
                    continue;
                }

                let inbound = InboundCommand {
                    client_id,
                    seq: cmd.seq,
                    payload: InboundPayload::Command(ClientCommand {
                        action: cmd.action,
                        tile: cmd.tile,
                    }),
                };
                // The game loop acks once the command is applied.
                if command_tx.try_send(inbound).is_err() {
                    reply_error(cmd.seq, ErrorCode::Backpressure, "command queue is full");
                }
            }
            ParsedMessage::Control(ctrl) => {
                if !state.is_handshaken(client_id).await {
                    reply_error(ctrl.seq, ErrorCode::HandshakeRequired, "send hello before control");
                    continue;
                }
                if !state.check_and_update_seq(client_id, ctrl.seq).await {
                    reply_error(ctrl.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                let ok = match ctrl.action {
                    ControlAction::Claim => state.try_claim(client_id).await,
                    ControlAction::Release => state.release(client_id).await,
                };
                if ok {
                    let _ = tx.send(encode(&create_ack(ctrl.seq, None)));
                } else {
                    let (code, message) = match ctrl.action {
                        ControlAction::Claim => (ErrorCode::ControllerActive, "controller already assigned"),
                        ControlAction::Release => (ErrorCode::NotController, "not the controller"),
                    };
                    reply_error(ctrl.seq, code, message);
                }
            }
        }
    }

    // The writer drains once every sender is gone.
    drop(tx);
    {
        let mut clients = state.clients.write().await;
        clients.retain(|c| c.id != client_id);
        state.status.set_client_count(clients.len());
    }
    let _ = write_task.await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 7878);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:7878");
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("MAHJONG_AI_HOST", "0.0.0.0"),
            ("MAHJONG_AI_PORT", "9000"),
            ("MAHJONG_AI_MAX_PENDING", "bogus"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_pending_commands, 16);
    }

    #[test]
    fn test_bad_host_is_an_error() {
        let config = ServerConfig {
            host: "not a host".into(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
