//! The lobby actor: one task that owns the [`Lobby`] and applies commands
//! strictly in arrival order.
//!
//! Connection handlers never touch lobby state. They hold a cheap
//! [`LobbyHandle`] and send it commands; the actor handles each command to
//! completion before reading the next, so no two mutations interleave.
//!
//! ```text
//!  handler ─┐
//!  handler ─┼──► mpsc<LobbyCommand> ──► run_lobby(Lobby)
//!  handler ─┘                              │
//!       ▲                                  │ ServerMessage
//!       └──── per-connection unbounded ◄───┘
//! ```

use pairlink_protocol::ClientMessage;
use pairlink_session::{ConnectionId, PeerSender};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use crate::{Lobby, LobbyStats, PairlinkError};

/// A request for the lobby actor.
#[derive(Debug)]
pub(crate) enum LobbyCommand {
    Connect {
        outbound: PeerSender,
        reply: oneshot::Sender<ConnectionId>,
    },
    Message {
        conn: ConnectionId,
        msg: ClientMessage,
    },
    Disconnect {
        conn: ConnectionId,
    },
    Stats {
        reply: oneshot::Sender<LobbyStats>,
    },
}

/// Cloneable handle for sending commands to a running lobby.
#[derive(Debug, Clone)]
pub struct LobbyHandle {
    sender: mpsc::Sender<LobbyCommand>,
}

impl LobbyHandle {
    /// Registers a connection whose outbound messages go to `outbound`.
    pub async fn connect(&self, outbound: PeerSender) -> Result<ConnectionId, PairlinkError> {
        let (reply, rx) = oneshot::channel();
        self.send(LobbyCommand::Connect { outbound, reply }).await?;
        rx.await.map_err(|_| PairlinkError::LobbyUnavailable)
    }

    /// Queues a decoded client message for `conn`.
    pub async fn dispatch(
        &self,
        conn: ConnectionId,
        msg: ClientMessage,
    ) -> Result<(), PairlinkError> {
        self.send(LobbyCommand::Message { conn, msg }).await
    }

    /// Queues cleanup for `conn`.
    pub async fn disconnect(&self, conn: ConnectionId) -> Result<(), PairlinkError> {
        self.send(LobbyCommand::Disconnect { conn }).await
    }

    /// Queues cleanup for `conn` without awaiting.
    ///
    /// Used from `Drop`. When the channel is full the command is handed to a
    /// spawned task so it still arrives; when the lobby is gone there is
    /// nothing left to clean up.
    pub(crate) fn disconnect_now(&self, conn: ConnectionId) {
        match self.sender.try_send(LobbyCommand::Disconnect { conn }) {
            Ok(()) => {}
            Err(TrySendError::Full(cmd)) => {
                let sender = self.sender.clone();
                tokio::spawn(async move {
                    let _ = sender.send(cmd).await;
                });
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(conn_id = %conn, "lobby stopped before disconnect");
            }
        }
    }

    /// Returns current occupancy counts.
    pub async fn stats(&self) -> Result<LobbyStats, PairlinkError> {
        let (reply, rx) = oneshot::channel();
        self.send(LobbyCommand::Stats { reply }).await?;
        rx.await.map_err(|_| PairlinkError::LobbyUnavailable)
    }

    async fn send(&self, cmd: LobbyCommand) -> Result<(), PairlinkError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| PairlinkError::LobbyUnavailable)
    }
}

/// Starts the lobby actor on the current runtime.
///
/// The actor runs until every [`LobbyHandle`] has been dropped.
pub fn spawn_lobby(lobby: Lobby, command_buffer: usize) -> LobbyHandle {
    let (sender, receiver) = mpsc::channel(command_buffer.max(1));
    tokio::spawn(run_lobby(lobby, receiver));
    LobbyHandle { sender }
}

async fn run_lobby(mut lobby: Lobby, mut receiver: mpsc::Receiver<LobbyCommand>) {
    tracing::debug!("lobby actor started");

    while let Some(cmd) = receiver.recv().await {
        match cmd {
            LobbyCommand::Connect { outbound, reply } => {
                let conn = lobby.connect(outbound);
                if reply.send(conn).is_err() {
                    // The handler gave up before hearing its id.
                    lobby.disconnect(conn);
                }
            }
            LobbyCommand::Message { conn, msg } => lobby.dispatch(conn, msg),
            LobbyCommand::Disconnect { conn } => lobby.disconnect(conn),
            LobbyCommand::Stats { reply } => {
                let _ = reply.send(lobby.stats());
            }
        }
    }

    tracing::debug!("lobby actor stopped");
}
