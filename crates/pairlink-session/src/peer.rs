//! Peer types: what the relay knows about one live connection.
//!
//! A "peer" is the server's record of a connected browser tab. It tracks:
//! - WHO it is (`ConnectionId`, an opaque per-process number)
//! - HOW to reach it (a `PeerSender`, the capability to queue messages)
//! - WHERE it sits (the code of its room, if any)

use std::fmt;

use pairlink_protocol::{RoomCode, ServerMessage};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// ConnectionId
// ---------------------------------------------------------------------------

/// Opaque identifier for a registered connection.
///
/// Handed out by [`ConnectionRegistry::register`](crate::ConnectionRegistry::register)
/// and never reused within a process. It is not sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PeerSender
// ---------------------------------------------------------------------------

/// Channel sender for delivering outbound messages to one connection.
///
/// The connection's handler task owns the receiving half and writes
/// whatever arrives to the socket. When that task ends, the receiver is
/// dropped and the sender reports closed, which is exactly what "the
/// transport is no longer open" means to the lobby.
pub type PeerSender = mpsc::UnboundedSender<ServerMessage>;

// ---------------------------------------------------------------------------
// Peer
// ---------------------------------------------------------------------------

/// A registered connection: id, send capability, and room hint.
///
/// `room` is a lookup hint, not ownership. The room manager is the
/// source of truth for who sits where; the hint is cleared whenever the
/// room closes.
#[derive(Debug)]
pub struct Peer {
    id: ConnectionId,
    outbound: PeerSender,
    room: Option<RoomCode>,
}

impl Peer {
    pub(crate) fn new(id: ConnectionId, outbound: PeerSender) -> Self {
        Self {
            id,
            outbound,
            room: None,
        }
    }

    /// Returns the connection's id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns the room this connection is associated with, if any.
    pub fn room(&self) -> Option<&RoomCode> {
        self.room.as_ref()
    }

    pub(crate) fn set_room(&mut self, room: Option<RoomCode>) -> Option<RoomCode> {
        std::mem::replace(&mut self.room, room)
    }

    /// Returns `true` while the connection's handler is still reading
    /// from its outbound queue.
    pub fn is_live(&self) -> bool {
        !self.outbound.is_closed()
    }

    /// Queues a message for this connection.
    ///
    /// Returns `false` if the message was dropped because the connection
    /// is gone. The handler can still close between this check and the
    /// socket write; that message is lost too.
    pub fn send(&self, msg: ServerMessage) -> bool {
        if !self.is_live() {
            return false;
        }
        self.outbound.send(msg).is_ok()
    }
}
