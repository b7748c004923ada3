//! The connection registry: every live connection and its room hint.
//!
//! Responsibilities:
//! - Handing out a fresh [`ConnectionId`] to each accepted connection
//! - Holding each connection's send capability ([`PeerSender`])
//! - Tracking which room, if any, each connection is associated with
//! - Answering "is this connection still open?" before every relay send
//!
//! # Concurrency note
//!
//! `ConnectionRegistry` is NOT thread-safe by itself. It uses a plain
//! `HashMap`. It is owned by the lobby actor, which processes one command
//! at a time, so every mutation runs to completion before the next one
//! starts.

use std::collections::HashMap;

use pairlink_protocol::{RoomCode, ServerMessage};

use crate::{ConnectionId, Peer, PeerSender, RegistryError};

/// Tracks every registered connection.
///
/// ## Lifecycle
///
/// ```text
/// register() ──→ associate(room) ──→ clear_association() ──→ unregister()
///     │                                                          ▲
///     └──────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    peers: HashMap<ConnectionId, Peer>,

    /// Next id to hand out. Ids start at 1 and only go up, so an id
    /// that has been unregistered can't come back and alias a newcomer.
    next_id: u64,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection and returns its id.
    ///
    /// The connection starts with no room association.
    pub fn register(&mut self, outbound: PeerSender) -> ConnectionId {
        self.next_id += 1;
        let id = ConnectionId::new(self.next_id);
        self.peers.insert(id, Peer::new(id, outbound));
        tracing::debug!(conn_id = %id, "connection registered");
        id
    }

    /// Removes a connection, returning its final record.
    ///
    /// Returns `None` if the id is unknown (e.g. already unregistered).
    pub fn unregister(&mut self, id: ConnectionId) -> Option<Peer> {
        let peer = self.peers.remove(&id);
        if peer.is_some() {
            tracing::debug!(conn_id = %id, "connection unregistered");
        }
        peer
    }

    /// Records that `id` now sits in `room`.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownConnection`] if `id` isn't registered.
    pub fn associate(
        &mut self,
        id: ConnectionId,
        room: RoomCode,
    ) -> Result<(), RegistryError> {
        let peer = self
            .peers
            .get_mut(&id)
            .ok_or(RegistryError::UnknownConnection(id))?;
        peer.set_room(Some(room));
        Ok(())
    }

    /// Clears `id`'s room association, returning the room it pointed at.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownConnection`] if `id` isn't registered.
    pub fn clear_association(
        &mut self,
        id: ConnectionId,
    ) -> Result<Option<RoomCode>, RegistryError> {
        let peer = self
            .peers
            .get_mut(&id)
            .ok_or(RegistryError::UnknownConnection(id))?;
        Ok(peer.set_room(None))
    }

    /// Returns the room `id` is associated with, if any.
    pub fn room_of(&self, id: ConnectionId) -> Option<&RoomCode> {
        self.peers.get(&id).and_then(Peer::room)
    }

    /// Returns `true` iff `id` is registered and its transport is open.
    pub fn is_live(&self, id: ConnectionId) -> bool {
        self.peers.get(&id).is_some_and(Peer::is_live)
    }

    /// Sends `msg` to `id` if it is registered and live.
    ///
    /// Returns `false` when the message was dropped. Callers treat that
    /// as normal: a peer that closed mid-send simply misses the message.
    pub fn send(&self, id: ConnectionId, msg: ServerMessage) -> bool {
        match self.peers.get(&id) {
            Some(peer) => peer.send(msg),
            None => false,
        }
    }

    /// Looks up a connection's record.
    pub fn get(&self, id: ConnectionId) -> Option<&Peer> {
        self.peers.get(&id)
    }

    /// Returns `true` if `id` is currently registered.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.peers.contains_key(&id)
    }

    /// Returns the number of registered connections.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Returns `true` if there are no registered connections.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
