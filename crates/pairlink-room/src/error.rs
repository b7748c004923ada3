//! Error types for the room layer.
//!
//! The `Display` text of these errors is what players read in `error`
//! replies, so it is written for them.

use pairlink_protocol::{GameId, RoomCode};
use pairlink_session::ConnectionId;

/// Errors that can occur during room and matchmaking operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room has this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The room already has two participants.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The room was created for a different game.
    #[error("room {room} is for {expected}, not {requested}")]
    GameMismatch {
        room: RoomCode,
        expected: GameId,
        requested: GameId,
    },

    /// The connection is already seated in a room or waiting in the queue.
    /// The id is kept for logs and left out of the message.
    #[error("you are already in a room or waiting for a match")]
    AlreadySeated(ConnectionId),

    /// Every generated room code collided with an existing room.
    #[error("could not allocate a free room code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },
}
