//! Server and lobby settings.

use std::time::Duration;

use envconfig::Envconfig;
use pairlink_room::RoomConfig;

/// Tuning for the lobby actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyConfig {
    /// How many random room codes to try before giving up on a room.
    pub room_code_attempts: usize,
    /// Capacity of the lobby's command channel. Handlers wait when it is
    /// full.
    pub command_buffer: usize,
}

impl LobbyConfig {
    /// The room-manager part of this configuration.
    pub fn room_config(&self) -> RoomConfig {
        RoomConfig {
            code_attempts: self.room_code_attempts,
        }
    }
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            room_code_attempts: RoomConfig::default().code_attempts,
            command_buffer: 1024,
        }
    }
}

/// Settings for the `pairlink-server` binary, read from the environment.
#[derive(Debug, Envconfig)]
pub struct ServerEnv {
    #[envconfig(from = "HOST", default = "0.0.0.0")]
    pub host: String,

    #[envconfig(from = "PORT", default = "3000")]
    pub port: u16,

    #[envconfig(from = "ROOM_CODE_ATTEMPTS", default = "32")]
    pub room_code_attempts: usize,

    #[envconfig(from = "HANDSHAKE_TIMEOUT_SECS", default = "10")]
    pub handshake_timeout_secs: u64,
}

impl ServerEnv {
    /// The `host:port` string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// How long a client may take to finish the WebSocket upgrade.
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    /// Lobby settings derived from the environment.
    pub fn lobby_config(&self) -> LobbyConfig {
        LobbyConfig {
            room_code_attempts: self.room_code_attempts,
            ..LobbyConfig::default()
        }
    }
}
