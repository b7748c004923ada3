//! # Pairlink
//!
//! Pairing and move relay for two-player turn-based web games.
//!
//! Pairlink matches anonymous WebSocket connections into pairs, either by
//! automatic matchmaking per game id or by a shareable six-character room
//! code, and forwards each player's moves to their opponent verbatim. It
//! never looks inside a move.
//!
//! ## Architecture
//!
//! ```text
//! WebSocketTransport ─► handler task (one per connection)
//!                            │  ClientMessage
//!                            ▼
//!                       lobby actor ─► Lobby { registry, queue, rooms }
//!                            │  ServerMessage
//!                            ▼
//!                    per-connection outbound channel
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pairlink::prelude::*;
//!
//! # async fn start() -> Result<(), PairlinkError> {
//! let server = PairlinkServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .lobby_config(LobbyConfig::default())
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod actor;
mod config;
mod error;
mod handler;
mod lobby;
mod logging;
mod server;

pub use actor::{LobbyHandle, spawn_lobby};
pub use config::{LobbyConfig, ServerEnv};
pub use error::PairlinkError;
pub use lobby::{Lobby, LobbyStats};
pub use logging::{DEFAULT_LOG_FILTER, init_tracing};
pub use server::{DEFAULT_HANDSHAKE_TIMEOUT, PairlinkServer, ServerBuilder};

pub mod prelude {
    pub use crate::{
        Lobby, LobbyConfig, LobbyHandle, LobbyStats, PairlinkError, PairlinkServer,
        ServerBuilder,
    };
    pub use pairlink_protocol::{ClientMessage, GameId, RoomCode, ServerMessage, Side};
    pub use pairlink_session::ConnectionId;
}
