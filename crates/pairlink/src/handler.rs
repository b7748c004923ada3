//! Per-connection handler: framing, decoding and outbound delivery.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   0. Finish the WebSocket upgrade, bounded by the handshake timeout
//!   1. Register with the lobby → get a `ConnectionId`
//!   2. Loop: either read a frame and dispatch it, or write a queued
//!      outbound message
//!   3. On exit, the drop guard tells the lobby the connection is gone

use std::sync::Arc;

use pairlink_protocol::{ClientMessage, Codec};
use pairlink_session::ConnectionId;
use pairlink_transport::{Connection, Incoming, IncomingWebSocket, TransportError};
use tokio::sync::mpsc;

use crate::actor::LobbyHandle;
use crate::server::ServerState;
use crate::PairlinkError;

/// Drop guard that reports the connection's disconnect to the lobby.
///
/// Fires exactly once, whether the handler returns normally, bails out
/// with an error, or panics.
struct DisconnectGuard {
    conn_id: ConnectionId,
    lobby: LobbyHandle,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        self.lobby.disconnect_now(self.conn_id);
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    incoming: IncomingWebSocket,
    state: Arc<ServerState<C>>,
) -> Result<(), PairlinkError> {
    let peer = incoming.peer_addr();
    let after = state.handshake_timeout;
    let conn = tokio::time::timeout(after, incoming.upgrade())
        .await
        .map_err(|_| TransportError::UpgradeTimedOut { peer, after })??;
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();

    let conn_id = state.lobby.connect(outbound_tx).await?;
    let _guard = DisconnectGuard {
        conn_id,
        lobby: state.lobby.clone(),
    };
    tracing::info!(%conn_id, %peer, "client connected");

    loop {
        tokio::select! {
            inbound = conn.recv() => {
                let frame = match inbound {
                    Ok(Some(frame)) => frame,
                    Ok(None) => {
                        tracing::info!(%conn_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "recv error");
                        break;
                    }
                };

                let msg: ClientMessage = match state.codec.decode(&frame) {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "malformed frame dropped");
                        continue;
                    }
                };

                tracing::trace!(%conn_id, kind = msg.kind(), "inbound message");
                state.lobby.dispatch(conn_id, msg).await?;
            }

            Some(outbound) = outbound_rx.recv() => {
                let frame = state.codec.encode(&outbound)?;
                if let Err(e) = conn.send(&frame).await {
                    tracing::debug!(%conn_id, error = %e, "send failed");
                    break;
                }
            }
        }
    }

    // Close the outbound side first so the lobby sees this connection as
    // closed before its disconnect is processed.
    drop(outbound_rx);
    let _ = conn.close().await;
    tracing::info!(%conn_id, "client disconnected");

    // _guard drops here → lobby disconnect fires.
    Ok(())
}
