//! Unified error type for the Pairlink server.

use pairlink_protocol::ProtocolError;
use pairlink_room::RoomError;
use pairlink_session::RegistryError;
use pairlink_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum PairlinkError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A registry error (unknown connection).
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A room-level error (not found, full, wrong game).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// Reading settings from the environment failed.
    #[error(transparent)]
    Config(#[from] envconfig::Error),

    /// The lobby actor has stopped and can't take commands.
    #[error("lobby is no longer running")]
    LobbyUnavailable,
}
