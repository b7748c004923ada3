//! `PairlinkServer` builder and accept loop.
//!
//! This is the entry point for running a Pairlink relay. It ties together
//! all the layers: transport → protocol → lobby actor.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pairlink_protocol::{Codec, JsonCodec};
use pairlink_transport::{Transport, WebSocketTransport};

use crate::actor::{LobbyHandle, spawn_lobby};
use crate::handler::handle_connection;
use crate::{Lobby, LobbyConfig, PairlinkError};

/// How long a client may take to finish the WebSocket upgrade.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after an accept failure that isn't tied to one client, such as
/// running out of file descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Shared state passed to each connection handler task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) lobby: LobbyHandle,
    pub(crate) codec: C,
    pub(crate) handshake_timeout: Duration,
}

/// Builder for configuring and starting a Pairlink server.
///
/// # Example
///
/// ```rust,no_run
/// use pairlink::prelude::*;
///
/// # async fn start() -> Result<(), PairlinkError> {
/// let server = PairlinkServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ServerBuilder {
    bind_addr: String,
    lobby_config: LobbyConfig,
    handshake_timeout: Duration,
}

impl ServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            lobby_config: LobbyConfig::default(),
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the lobby configuration.
    pub fn lobby_config(mut self, config: LobbyConfig) -> Self {
        self.lobby_config = config;
        self
    }

    /// Sets how long a client may take to finish the WebSocket upgrade
    /// before its socket is dropped.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Binds the listener and starts the lobby actor.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`. Must be called inside a
    /// Tokio runtime.
    pub async fn build(self) -> Result<PairlinkServer<JsonCodec>, PairlinkError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let lobby = spawn_lobby(
            Lobby::new(&self.lobby_config),
            self.lobby_config.command_buffer,
        );

        let state = Arc::new(ServerState {
            lobby,
            codec: JsonCodec,
            handshake_timeout: self.handshake_timeout,
        });

        Ok(PairlinkServer { transport, state })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Pairlink server.
///
/// Call [`run()`](Self::run) or [`run_until()`](Self::run_until) to start
/// accepting connections.
pub struct PairlinkServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl PairlinkServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }
}

impl<C: Codec> PairlinkServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, PairlinkError> {
        Ok(self.transport.local_addr()?)
    }

    /// Returns a handle to the server's lobby.
    pub fn lobby(&self) -> LobbyHandle {
        self.state.lobby.clone()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), PairlinkError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the accept loop until `shutdown` resolves.
    ///
    /// Accepts incoming connections and spawns a handler task for each one.
    /// The WebSocket upgrade runs inside that task, so a client that stalls
    /// its handshake only costs its own task. A failed or timed-out upgrade
    /// is logged and the task ends. Connections already handed to a task
    /// keep running after shutdown.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<(), PairlinkError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(addr = %self.local_addr()?, "pairlink server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested, no longer accepting");
                    break;
                }
                accepted = self.transport.accept() => match accepted {
                    Ok(incoming) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            match handle_connection(incoming, state).await {
                                Ok(()) => {}
                                Err(PairlinkError::Transport(e)) if e.is_per_connection() => {
                                    tracing::warn!(error = %e, "dropping connection");
                                }
                                Err(e) => {
                                    tracing::debug!(error = %e, "connection ended with error");
                                }
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = ServerBuilder::new();
        assert_eq!(builder.bind_addr, "127.0.0.1:3000");
        assert_eq!(builder.handshake_timeout, DEFAULT_HANDSHAKE_TIMEOUT);
        assert_eq!(builder.lobby_config, LobbyConfig::default());
    }

    #[test]
    fn test_builder_handshake_timeout() {
        let builder = ServerBuilder::new().handshake_timeout(Duration::from_millis(200));
        assert_eq!(builder.handshake_timeout, Duration::from_millis(200));
    }

    #[test]
    fn test_accept_backoff_pauses_without_stalling() {
        assert!(!ACCEPT_BACKOFF.is_zero());
        assert!(ACCEPT_BACKOFF < Duration::from_secs(1));
    }
}
